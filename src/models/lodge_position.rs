use super::position_type::PositionType;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

/// An office assignment. `user_id = None` marks a vacant office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LodgePosition {
    pub id: Uuid,
    pub position_type: PositionType,
    pub user_id: Option<Uuid>,
    pub start_date: NaiveDate, // stored as TEXT "YYYY-MM-DD"
    pub end_date: NaiveDate,   // inclusive
}

impl LodgePosition {
    pub fn new(
        position_type: PositionType,
        user_id: Option<Uuid>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            position_type,
            user_id,
            start_date,
            end_date,
        }
    }

    /// True when `date` falls inside `[start_date, end_date]`.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    pub fn is_held_by(&self, user_id: Uuid) -> bool {
        self.user_id == Some(user_id)
    }

    /// Snapshot of this tenure for the append-only history log.
    pub fn to_history(&self) -> PositionHistoryEntry {
        PositionHistoryEntry {
            id: Uuid::new_v4(),
            position_id: self.id,
            position_type: self.position_type,
            user_id: self.user_id,
            start_date: self.start_date,
            end_date: self.end_date,
            archived_at: Local::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionHistoryEntry {
    pub id: Uuid,
    pub position_id: Uuid,
    pub position_type: PositionType,
    pub user_id: Option<Uuid>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub archived_at: String, // ISO8601
}
