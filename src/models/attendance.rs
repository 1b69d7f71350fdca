use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttendanceStatus {
    Presente,
    Ausente,
    Justificado,
}

impl AttendanceStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Presente => "Presente",
            AttendanceStatus::Ausente => "Ausente",
            AttendanceStatus::Justificado => "Justificado",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "Presente" => Some(AttendanceStatus::Presente),
            "Ausente" => Some(AttendanceStatus::Ausente),
            "Justificado" => Some(AttendanceStatus::Justificado),
            _ => None,
        }
    }

    /// Justified absences count toward quorum.
    pub fn counts_as_present(&self) -> bool {
        matches!(self, AttendanceStatus::Presente | AttendanceStatus::Justificado)
    }

    /// Next status for the presence toggle; only ever Presente or Ausente.
    pub fn toggled(&self) -> Self {
        match self {
            AttendanceStatus::Presente => AttendanceStatus::Ausente,
            AttendanceStatus::Ausente => AttendanceStatus::Presente,
            AttendanceStatus::Justificado => AttendanceStatus::Ausente,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub session_record_id: Uuid,
    pub brother_id: Uuid,
    pub status: AttendanceStatus,
}

impl AttendanceRecord {
    pub fn new(session_record_id: Uuid, brother_id: Uuid, status: AttendanceStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_record_id,
            brother_id,
            status,
        }
    }
}
