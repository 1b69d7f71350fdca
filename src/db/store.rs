//! SQLite implementation of the persistence seams.

use crate::core::store::{AttendanceStore, PositionStore};
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::AppResult;
use crate::models::attendance::AttendanceRecord;
use crate::models::lodge_position::{LodgePosition, PositionHistoryEntry};
use crate::models::session::SessionRecord;
use crate::models::visitor::VisitorAttendance;
use rusqlite::Connection;
use uuid::Uuid;

pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    /// Wrap an open pool, bringing its schema up to date first.
    pub fn new(pool: DbPool) -> AppResult<Self> {
        run_pending_migrations(&pool.conn)?;
        Ok(Self { pool })
    }

    pub fn open(path: &str) -> AppResult<Self> {
        Self::new(DbPool::new(path)?)
    }

    pub fn conn(&self) -> &Connection {
        &self.pool.conn
    }
}

impl PositionStore for SqliteStore {
    fn load_active_positions(&mut self) -> AppResult<Vec<LodgePosition>> {
        Ok(queries::load_active_positions(&self.pool.conn)?)
    }

    fn load_position_history(&mut self) -> AppResult<Vec<PositionHistoryEntry>> {
        Ok(queries::load_position_history(&self.pool.conn)?)
    }

    fn assign_position(&mut self, new: &LodgePosition) -> AppResult<Vec<LodgePosition>> {
        let tx = self.pool.conn.transaction()?;

        let previous = queries::positions_of_type(&tx, new.position_type)?;
        for p in &previous {
            queries::insert_history(&tx, &p.to_history())?;
            queries::delete_position(&tx, p.id)?;
        }
        queries::insert_position(&tx, new)?;

        tx.commit()?;
        Ok(previous)
    }

    fn remove_position(&mut self, position_id: Uuid) -> AppResult<Option<LodgePosition>> {
        let tx = self.pool.conn.transaction()?;

        let Some(existing) = queries::find_position(&tx, position_id)? else {
            return Ok(None);
        };
        queries::insert_history(&tx, &existing.to_history())?;
        queries::delete_position(&tx, existing.id)?;

        tx.commit()?;
        Ok(Some(existing))
    }
}

impl AttendanceStore for SqliteStore {
    fn load_sessions(&mut self) -> AppResult<Vec<SessionRecord>> {
        Ok(queries::load_sessions(&self.pool.conn)?)
    }

    fn load_attendance(&mut self) -> AppResult<Vec<AttendanceRecord>> {
        Ok(queries::load_attendance(&self.pool.conn)?)
    }

    fn load_visitors(&mut self) -> AppResult<Vec<VisitorAttendance>> {
        Ok(queries::load_visitors(&self.pool.conn)?)
    }

    fn insert_session(&mut self, session: &SessionRecord) -> AppResult<()> {
        Ok(queries::insert_session(&self.pool.conn, session)?)
    }

    fn update_session(&mut self, session: &SessionRecord) -> AppResult<()> {
        Ok(queries::update_session(&self.pool.conn, session)?)
    }

    fn upsert_attendance(&mut self, record: &AttendanceRecord) -> AppResult<()> {
        Ok(queries::upsert_attendance(&self.pool.conn, record)?)
    }

    fn replace_visitors(
        &mut self,
        session_record_id: Uuid,
        visitors: &[VisitorAttendance],
    ) -> AppResult<()> {
        let tx = self.pool.conn.transaction()?;

        queries::delete_visitors_for_session(&tx, session_record_id)?;
        for v in visitors {
            queries::insert_visitor(&tx, v)?;
        }

        tx.commit()?;
        Ok(())
    }
}
