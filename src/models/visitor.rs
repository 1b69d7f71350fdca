use serde::Serialize;
use uuid::Uuid;

/// Raw visitor input as typed by the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitorDraft {
    pub name: String,
    pub degree: String,
    pub lodge: String,
    pub lodge_number: String,
    pub obedience: String,
    pub masonic_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisitorAttendance {
    pub id: Uuid,
    pub session_record_id: Uuid,
    pub name: String,
    pub degree: String,
    pub lodge: String,
    pub lodge_number: String,
    pub obedience: String,
    pub masonic_number: Option<String>,
}

impl VisitorAttendance {
    /// Build an accepted record from an already normalized draft.
    pub fn from_draft(session_record_id: Uuid, draft: VisitorDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_record_id,
            name: draft.name,
            degree: draft.degree,
            lodge: draft.lodge,
            lodge_number: draft.lodge_number,
            obedience: draft.obedience,
            masonic_number: draft.masonic_number,
        }
    }
}
