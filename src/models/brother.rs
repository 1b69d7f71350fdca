use chrono::Local;
use serde::Serialize;
use uuid::Uuid;

/// A lodge member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Brother {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub active: bool,
    pub created_at: String,
}

impl Brother {
    pub fn new(name: &str, email: Option<&str>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            email: email.map(|e| e.trim().to_lowercase()),
            active: true,
            created_at: Local::now().to_rfc3339(),
        }
    }
}
