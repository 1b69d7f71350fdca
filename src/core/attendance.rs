//! Attendance sessions: start, presence toggling, visitors and quorum.
//!
//! `AttendanceEngine` owns an explicit [`AttendanceState`] and a store. Reads
//! are served from the state; every write goes to the store first and the
//! state changes only once the store has accepted it.

use crate::core::store::AttendanceStore;
use crate::core::visitor_rules;
use crate::errors::{AppError, AppResult};
use crate::models::attendance::{AttendanceRecord, AttendanceStatus};
use crate::models::session::{SessionRecord, SessionStatus};
use crate::models::visitor::{VisitorAttendance, VisitorDraft};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct AttendanceState {
    pub sessions: Vec<SessionRecord>,
    pub attendance: Vec<AttendanceRecord>,
    pub visitors: Vec<VisitorAttendance>,
}

/// Presence ratio of a session, computed on read and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quorum {
    pub present_count: usize,
    pub active_member_count: usize,
    pub percentage: f64,
}

pub struct AttendanceEngine<S> {
    store: S,
    state: AttendanceState,
}

impl<S: AttendanceStore> AttendanceEngine<S> {
    pub fn new(store: S, state: AttendanceState) -> Self {
        Self { store, state }
    }

    /// Build an engine holding everything currently stored.
    pub fn load(mut store: S) -> AppResult<Self> {
        let state = AttendanceState {
            sessions: store.load_sessions()?,
            attendance: store.load_attendance()?,
            visitors: store.load_visitors()?,
        };
        debug!(
            sessions = state.sessions.len(),
            attendance = state.attendance.len(),
            visitors = state.visitors.len(),
            "attendance state loaded"
        );
        Ok(Self::new(store, state))
    }

    pub fn sessions(&self) -> &[SessionRecord] {
        &self.state.sessions
    }

    pub fn session(&self, session_id: Uuid) -> Option<&SessionRecord> {
        self.state.sessions.iter().find(|s| s.id == session_id)
    }

    pub fn session_for_event(&self, event_id: &str) -> Option<&SessionRecord> {
        let event_id = event_id.trim();
        self.state.sessions.iter().find(|s| s.event_id == event_id)
    }

    fn open_session(&self, session_id: Uuid) -> AppResult<&SessionRecord> {
        let session = self
            .session(session_id)
            .ok_or_else(|| AppError::NotFound(format!("Session {session_id}")))?;
        if !session.is_open() {
            return Err(AppError::SessionClosed(session_id.to_string()));
        }
        Ok(session)
    }

    /// Start the attendance list of an event. A second call for the same event
    /// returns the existing session.
    pub fn start_session(&mut self, event_id: &str, date: NaiveDate) -> AppResult<SessionRecord> {
        let event_id = event_id.trim();
        if event_id.is_empty() {
            return Err(AppError::InvalidId("empty event id".into()));
        }

        if let Some(existing) = self.session_for_event(event_id) {
            info!(event_id, session = %existing.id, "session already started");
            return Ok(existing.clone());
        }

        let session = SessionRecord::new(event_id, date);
        self.store.insert_session(&session)?;
        self.state.sessions.push(session.clone());

        info!(event_id, session = %session.id, "session started");
        Ok(session)
    }

    /// Status of a brother in a session; no record means `Ausente`.
    pub fn status_of(&self, session_id: Uuid, brother_id: Uuid) -> AttendanceStatus {
        self.record(session_id, brother_id)
            .map(|r| r.status)
            .unwrap_or(AttendanceStatus::Ausente)
    }

    fn record(&self, session_id: Uuid, brother_id: Uuid) -> Option<&AttendanceRecord> {
        self.state
            .attendance
            .iter()
            .find(|r| r.session_record_id == session_id && r.brother_id == brother_id)
    }

    pub fn attendance_for(&self, session_id: Uuid) -> Vec<&AttendanceRecord> {
        self.state
            .attendance
            .iter()
            .filter(|r| r.session_record_id == session_id)
            .collect()
    }

    fn set_status(
        &mut self,
        session_id: Uuid,
        brother_id: Uuid,
        next: impl FnOnce(Option<AttendanceStatus>) -> AttendanceStatus,
    ) -> AppResult<AttendanceStatus> {
        self.open_session(session_id)?;

        let record = match self.record(session_id, brother_id) {
            Some(existing) => AttendanceRecord {
                status: next(Some(existing.status)),
                ..existing.clone()
            },
            None => AttendanceRecord::new(session_id, brother_id, next(None)),
        };

        self.store.upsert_attendance(&record)?;

        match self
            .state
            .attendance
            .iter_mut()
            .find(|r| r.session_record_id == session_id && r.brother_id == brother_id)
        {
            Some(slot) => slot.status = record.status,
            None => self.state.attendance.push(record.clone()),
        }

        debug!(session = %session_id, brother = %brother_id, status = record.status.to_db_str(), "attendance updated");
        Ok(record.status)
    }

    /// First call marks `Presente`; later calls flip between `Presente` and
    /// `Ausente`. A justified absence toggles to `Ausente`.
    pub fn toggle_attendance(
        &mut self,
        session_id: Uuid,
        brother_id: Uuid,
    ) -> AppResult<AttendanceStatus> {
        self.set_status(session_id, brother_id, |current| match current {
            Some(status) => status.toggled(),
            None => AttendanceStatus::Presente,
        })
    }

    pub fn justify_absence(
        &mut self,
        session_id: Uuid,
        brother_id: Uuid,
    ) -> AppResult<AttendanceStatus> {
        self.set_status(session_id, brother_id, |_| AttendanceStatus::Justificado)
    }

    pub fn compute_quorum(&self, session_id: Uuid, active_member_count: usize) -> Quorum {
        let present_count = self
            .attendance_for(session_id)
            .iter()
            .filter(|r| r.status.counts_as_present())
            .count();

        let percentage = if active_member_count == 0 {
            0.0
        } else {
            present_count as f64 / active_member_count as f64 * 100.0
        };

        Quorum {
            present_count,
            active_member_count,
            percentage,
        }
    }

    /// Validate a visitor and hold it in memory. Nothing is stored until
    /// [`save_visitor_attendances`](Self::save_visitor_attendances).
    pub fn add_visitor(
        &mut self,
        session_id: Uuid,
        draft: &VisitorDraft,
    ) -> AppResult<VisitorAttendance> {
        self.open_session(session_id)?;

        let normalized = visitor_rules::normalize(draft);
        let errors = visitor_rules::validate(&normalized);
        if !errors.is_empty() {
            debug!(session = %session_id, errors = errors.len(), "visitor rejected");
            return Err(AppError::Validation(errors));
        }

        let visitor = VisitorAttendance::from_draft(session_id, normalized);
        self.state.visitors.push(visitor.clone());
        Ok(visitor)
    }

    pub fn remove_visitor(&mut self, visitor_id: Uuid) -> Option<VisitorAttendance> {
        let idx = self.state.visitors.iter().position(|v| v.id == visitor_id)?;
        Some(self.state.visitors.remove(idx))
    }

    pub fn visitors_for(&self, session_id: Uuid) -> Vec<&VisitorAttendance> {
        self.state
            .visitors
            .iter()
            .filter(|v| v.session_record_id == session_id)
            .collect()
    }

    /// Replace the stored visitors of a session with exactly `visitors`.
    /// Visitors left out of the list are deleted.
    pub fn save_visitor_attendances(
        &mut self,
        session_id: Uuid,
        visitors: Vec<VisitorAttendance>,
    ) -> AppResult<()> {
        if self.session(session_id).is_none() {
            return Err(AppError::NotFound(format!("Session {session_id}")));
        }
        if let Some(stray) = visitors.iter().find(|v| v.session_record_id != session_id) {
            return Err(AppError::InvariantViolation(format!(
                "visitor {} belongs to session {}, not {session_id}",
                stray.id, stray.session_record_id
            )));
        }

        self.store
            .replace_visitors(session_id, &visitors)
            .inspect_err(|e| warn!(session = %session_id, error = %e, "saving visitors failed"))?;

        self.state.visitors.retain(|v| v.session_record_id != session_id);
        let count = visitors.len();
        self.state.visitors.extend(visitors);

        info!(session = %session_id, count, "visitors saved");
        Ok(())
    }

    /// Persist the in-memory visitor list of a session.
    pub fn save_session_visitors(&mut self, session_id: Uuid) -> AppResult<usize> {
        let visitors: Vec<VisitorAttendance> =
            self.visitors_for(session_id).into_iter().cloned().collect();
        let count = visitors.len();
        self.save_visitor_attendances(session_id, visitors)?;
        Ok(count)
    }

    /// Close the attendance list. Finalizing twice returns the record unchanged.
    pub fn finalize_session(
        &mut self,
        session_id: Uuid,
        charity_collection: Option<f64>,
        observations: Option<String>,
    ) -> AppResult<SessionRecord> {
        let current = self
            .session(session_id)
            .ok_or_else(|| AppError::NotFound(format!("Session {session_id}")))?;

        if current.status == SessionStatus::Finalizada {
            return Ok(current.clone());
        }

        let updated = SessionRecord {
            status: SessionStatus::Finalizada,
            charity_collection: charity_collection.or(current.charity_collection),
            observations: observations
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .or_else(|| current.observations.clone()),
            ..current.clone()
        };

        self.store.update_session(&updated)?;

        if let Some(slot) = self.state.sessions.iter_mut().find(|s| s.id == session_id) {
            *slot = updated.clone();
        }

        info!(session = %session_id, "session finalized");
        Ok(updated)
    }
}
