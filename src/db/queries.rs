use crate::errors::AppError;
use crate::models::attendance::{AttendanceRecord, AttendanceStatus};
use crate::models::brother::Brother;
use crate::models::lodge_position::{LodgePosition, PositionHistoryEntry};
use crate::models::position_type::PositionType;
use crate::models::session::{SessionRecord, SessionStatus};
use crate::models::visitor::VisitorAttendance;
use crate::utils::date::to_db_str;
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};
use uuid::Uuid;

fn conversion_error(err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(err))
}

fn get_uuid(row: &Row, col: &str) -> Result<Uuid> {
    let raw: String = row.get(col)?;
    Uuid::parse_str(&raw).map_err(|_| conversion_error(AppError::InvalidId(raw)))
}

fn get_opt_uuid(row: &Row, col: &str) -> Result<Option<Uuid>> {
    let raw: Option<String> = row.get(col)?;
    raw.map(|r| Uuid::parse_str(&r).map_err(|_| conversion_error(AppError::InvalidId(r))))
        .transpose()
}

fn get_date(row: &Row, col: &str) -> Result<NaiveDate> {
    let raw: String = row.get(col)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .map_err(|_| conversion_error(AppError::InvalidDate(raw)))
}

fn get_position_type(row: &Row) -> Result<PositionType> {
    let raw: String = row.get("position_type")?;
    PositionType::from_db_str(&raw).ok_or_else(|| conversion_error(AppError::InvalidPosition(raw)))
}

fn collect<T>(rows: impl Iterator<Item = Result<T>>) -> Result<Vec<T>> {
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ---------------------------
// Brothers
// ---------------------------

fn map_brother(row: &Row) -> Result<Brother> {
    Ok(Brother {
        id: get_uuid(row, "id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        active: row.get::<_, i32>("active")? == 1,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_brother(conn: &Connection, b: &Brother) -> Result<()> {
    conn.execute(
        "INSERT INTO brothers (id, name, email, active, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            b.id.to_string(),
            b.name,
            b.email,
            if b.active { 1 } else { 0 },
            b.created_at
        ],
    )?;
    Ok(())
}

pub fn load_brothers(conn: &Connection, include_inactive: bool) -> Result<Vec<Brother>> {
    let sql = if include_inactive {
        "SELECT * FROM brothers ORDER BY name COLLATE NOCASE ASC"
    } else {
        "SELECT * FROM brothers WHERE active = 1 ORDER BY name COLLATE NOCASE ASC"
    };
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], map_brother)?;
    collect(rows)
}

pub fn find_brother(conn: &Connection, id: Uuid) -> Result<Option<Brother>> {
    conn.query_row(
        "SELECT * FROM brothers WHERE id = ?1",
        [id.to_string()],
        map_brother,
    )
    .optional()
}

pub fn find_brother_by_email(conn: &Connection, email: &str) -> Result<Option<Brother>> {
    conn.query_row(
        "SELECT * FROM brothers WHERE lower(email) = lower(?1) LIMIT 1",
        [email.trim()],
        map_brother,
    )
    .optional()
}

/// Returns false when no brother has that id.
pub fn set_brother_active(conn: &Connection, id: Uuid, active: bool) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE brothers SET active = ?1 WHERE id = ?2",
        params![if active { 1 } else { 0 }, id.to_string()],
    )?;
    Ok(changed > 0)
}

pub fn count_active_brothers(conn: &Connection) -> Result<usize> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM brothers WHERE active = 1", [], |row| {
        row.get(0)
    })?;
    Ok(n as usize)
}

// ---------------------------
// Lodge positions
// ---------------------------

fn map_position(row: &Row) -> Result<LodgePosition> {
    Ok(LodgePosition {
        id: get_uuid(row, "id")?,
        position_type: get_position_type(row)?,
        user_id: get_opt_uuid(row, "user_id")?,
        start_date: get_date(row, "start_date")?,
        end_date: get_date(row, "end_date")?,
    })
}

fn map_history(row: &Row) -> Result<PositionHistoryEntry> {
    Ok(PositionHistoryEntry {
        id: get_uuid(row, "id")?,
        position_id: get_uuid(row, "position_id")?,
        position_type: get_position_type(row)?,
        user_id: get_opt_uuid(row, "user_id")?,
        start_date: get_date(row, "start_date")?,
        end_date: get_date(row, "end_date")?,
        archived_at: row.get("archived_at")?,
    })
}

pub fn load_active_positions(conn: &Connection) -> Result<Vec<LodgePosition>> {
    let mut stmt = conn.prepare("SELECT * FROM lodge_positions ORDER BY start_date ASC")?;
    let rows = stmt.query_map([], map_position)?;
    collect(rows)
}

pub fn positions_of_type(conn: &Connection, pt: PositionType) -> Result<Vec<LodgePosition>> {
    let mut stmt = conn.prepare("SELECT * FROM lodge_positions WHERE position_type = ?1")?;
    let rows = stmt.query_map([pt.to_db_str()], map_position)?;
    collect(rows)
}

pub fn find_position(conn: &Connection, id: Uuid) -> Result<Option<LodgePosition>> {
    conn.query_row(
        "SELECT * FROM lodge_positions WHERE id = ?1",
        [id.to_string()],
        map_position,
    )
    .optional()
}

pub fn insert_position(conn: &Connection, p: &LodgePosition) -> Result<()> {
    conn.execute(
        "INSERT INTO lodge_positions (id, position_type, user_id, start_date, end_date)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            p.id.to_string(),
            p.position_type.to_db_str(),
            p.user_id.map(|u| u.to_string()),
            to_db_str(&p.start_date),
            to_db_str(&p.end_date),
        ],
    )?;
    Ok(())
}

pub fn delete_position(conn: &Connection, id: Uuid) -> Result<()> {
    conn.execute("DELETE FROM lodge_positions WHERE id = ?1", [id.to_string()])?;
    Ok(())
}

pub fn insert_history(conn: &Connection, h: &PositionHistoryEntry) -> Result<()> {
    conn.execute(
        "INSERT INTO lodge_position_history
            (id, position_id, position_type, user_id, start_date, end_date, archived_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            h.id.to_string(),
            h.position_id.to_string(),
            h.position_type.to_db_str(),
            h.user_id.map(|u| u.to_string()),
            to_db_str(&h.start_date),
            to_db_str(&h.end_date),
            h.archived_at,
        ],
    )?;
    Ok(())
}

pub fn load_position_history(conn: &Connection) -> Result<Vec<PositionHistoryEntry>> {
    let mut stmt = conn.prepare("SELECT * FROM lodge_position_history ORDER BY archived_at DESC")?;
    let rows = stmt.query_map([], map_history)?;
    collect(rows)
}

// ---------------------------
// Sessions and attendance
// ---------------------------

fn map_session(row: &Row) -> Result<SessionRecord> {
    let status_str: String = row.get("status")?;
    let status = SessionStatus::from_db_str(&status_str).ok_or_else(|| {
        conversion_error(AppError::Other(format!("Invalid session status: {status_str}")))
    })?;

    Ok(SessionRecord {
        id: get_uuid(row, "id")?,
        event_id: row.get("event_id")?,
        date: get_date(row, "date")?,
        status,
        charity_collection: row.get("charity_collection")?,
        observations: row.get("observations")?,
        created_at: row.get("created_at")?,
    })
}

fn map_attendance(row: &Row) -> Result<AttendanceRecord> {
    let status_str: String = row.get("status")?;
    let status = AttendanceStatus::from_db_str(&status_str).ok_or_else(|| {
        conversion_error(AppError::Other(format!("Invalid attendance status: {status_str}")))
    })?;

    Ok(AttendanceRecord {
        id: get_uuid(row, "id")?,
        session_record_id: get_uuid(row, "session_record_id")?,
        brother_id: get_uuid(row, "brother_id")?,
        status,
    })
}

fn map_visitor(row: &Row) -> Result<VisitorAttendance> {
    Ok(VisitorAttendance {
        id: get_uuid(row, "id")?,
        session_record_id: get_uuid(row, "session_record_id")?,
        name: row.get("name")?,
        degree: row.get("degree")?,
        lodge: row.get("lodge")?,
        lodge_number: row.get("lodge_number")?,
        obedience: row.get("obedience")?,
        masonic_number: row.get("masonic_number")?,
    })
}

pub fn load_sessions(conn: &Connection) -> Result<Vec<SessionRecord>> {
    let mut stmt = conn.prepare("SELECT * FROM session_records ORDER BY date ASC, created_at ASC")?;
    let rows = stmt.query_map([], map_session)?;
    collect(rows)
}

pub fn insert_session(conn: &Connection, s: &SessionRecord) -> Result<()> {
    conn.execute(
        "INSERT INTO session_records
            (id, event_id, date, status, charity_collection, observations, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            s.id.to_string(),
            s.event_id,
            to_db_str(&s.date),
            s.status.to_db_str(),
            s.charity_collection,
            s.observations,
            s.created_at,
        ],
    )?;
    Ok(())
}

/// Update a session (all fields except id and event)
pub fn update_session(conn: &Connection, s: &SessionRecord) -> Result<()> {
    conn.execute(
        "UPDATE session_records
         SET date = ?1, status = ?2, charity_collection = ?3, observations = ?4
         WHERE id = ?5",
        params![
            to_db_str(&s.date),
            s.status.to_db_str(),
            s.charity_collection,
            s.observations,
            s.id.to_string(),
        ],
    )?;
    Ok(())
}

pub fn load_attendance(conn: &Connection) -> Result<Vec<AttendanceRecord>> {
    let mut stmt = conn.prepare("SELECT * FROM attendance_records")?;
    let rows = stmt.query_map([], map_attendance)?;
    collect(rows)
}

pub fn upsert_attendance(conn: &Connection, r: &AttendanceRecord) -> Result<()> {
    conn.execute(
        "INSERT INTO attendance_records (id, session_record_id, brother_id, status)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(session_record_id, brother_id) DO UPDATE SET status = excluded.status",
        params![
            r.id.to_string(),
            r.session_record_id.to_string(),
            r.brother_id.to_string(),
            r.status.to_db_str(),
        ],
    )?;
    Ok(())
}

pub fn load_visitors(conn: &Connection) -> Result<Vec<VisitorAttendance>> {
    let mut stmt = conn.prepare("SELECT * FROM visitor_attendances ORDER BY rowid ASC")?;
    let rows = stmt.query_map([], map_visitor)?;
    collect(rows)
}

pub fn delete_visitors_for_session(conn: &Connection, session_id: Uuid) -> Result<usize> {
    conn.execute(
        "DELETE FROM visitor_attendances WHERE session_record_id = ?1",
        [session_id.to_string()],
    )
}

pub fn insert_visitor(conn: &Connection, v: &VisitorAttendance) -> Result<()> {
    conn.execute(
        "INSERT INTO visitor_attendances
            (id, session_record_id, name, degree, lodge, lodge_number, obedience, masonic_number)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            v.id.to_string(),
            v.session_record_id.to_string(),
            v.name,
            v.degree,
            v.lodge,
            v.lodge_number,
            v.obedience,
            v.masonic_number,
        ],
    )?;
    Ok(())
}
