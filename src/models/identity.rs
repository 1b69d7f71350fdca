use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
}

/// The signed-in user as reported by the identity provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Option<Uuid>,
    pub email: Option<String>,
    pub roles: Vec<Role>,
}

impl Identity {
    pub fn new(user_id: Option<Uuid>, email: Option<String>, admin: bool) -> Self {
        Self {
            user_id,
            email,
            roles: if admin { vec![Role::Admin] } else { Vec::new() },
        }
    }

    /// Process owner when no identity was supplied on the command line.
    pub fn local_operator() -> Self {
        Self::new(None, None, true)
    }

    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }
}
