use chrono::{Local, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionStatus {
    Pendente,
    Finalizada,
}

impl SessionStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            SessionStatus::Pendente => "Pendente",
            SessionStatus::Finalizada => "Finalizada",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "Pendente" => Some(SessionStatus::Pendente),
            "Finalizada" => Some(SessionStatus::Finalizada),
            _ => None,
        }
    }
}

/// Attendance session of one calendar event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRecord {
    pub id: Uuid,
    pub event_id: String, // external calendar key, unique
    pub date: NaiveDate,
    pub status: SessionStatus,
    pub charity_collection: Option<f64>,
    pub observations: Option<String>,
    pub created_at: String,
}

impl SessionRecord {
    pub fn new(event_id: &str, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id: event_id.to_string(),
            date,
            status: SessionStatus::Pendente,
            charity_collection: None,
            observations: None,
            created_at: Local::now().to_rfc3339(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == SessionStatus::Pendente
    }
}
