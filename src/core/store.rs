//! Persistence seams used by the resolver and the attendance engine.
//!
//! Every write method is all-or-nothing: an implementation either applies the
//! whole change or returns an error and leaves stored data as it was.

use crate::errors::AppResult;
use crate::models::attendance::AttendanceRecord;
use crate::models::lodge_position::{LodgePosition, PositionHistoryEntry};
use crate::models::session::SessionRecord;
use crate::models::visitor::VisitorAttendance;
use uuid::Uuid;

pub trait PositionStore {
    fn load_active_positions(&mut self) -> AppResult<Vec<LodgePosition>>;

    fn load_position_history(&mut self) -> AppResult<Vec<PositionHistoryEntry>>;

    /// Archive every active record of `new.position_type` into history,
    /// delete them and insert `new`, as one unit. Returns the archived records.
    fn assign_position(&mut self, new: &LodgePosition) -> AppResult<Vec<LodgePosition>>;

    /// Archive then delete, as one unit. `Ok(None)` when the id is unknown.
    fn remove_position(&mut self, position_id: Uuid) -> AppResult<Option<LodgePosition>>;
}

pub trait AttendanceStore {
    fn load_sessions(&mut self) -> AppResult<Vec<SessionRecord>>;

    fn load_attendance(&mut self) -> AppResult<Vec<AttendanceRecord>>;

    fn load_visitors(&mut self) -> AppResult<Vec<VisitorAttendance>>;

    fn insert_session(&mut self, session: &SessionRecord) -> AppResult<()>;

    fn update_session(&mut self, session: &SessionRecord) -> AppResult<()>;

    /// Insert or update keyed by `(session_record_id, brother_id)`.
    fn upsert_attendance(&mut self, record: &AttendanceRecord) -> AppResult<()>;

    /// Stored visitors of the session become exactly `visitors`.
    fn replace_visitors(
        &mut self,
        session_record_id: Uuid,
        visitors: &[VisitorAttendance],
    ) -> AppResult<()>;
}
