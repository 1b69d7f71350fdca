//! Versioned schema migrations.
//!
//! Each migration runs once, inside its own transaction, and is recorded in the
//! `log` table as `migration_applied` with its version as target.

use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, OptionalExtension, Result};
use tracing::{error, info};

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250301_0001_create_lodge_tables",
        description: "Created brothers, positions, sessions, attendance and visitor tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS brothers (
            id          TEXT PRIMARY KEY,
            name        TEXT NOT NULL,
            email       TEXT,
            active      INTEGER NOT NULL DEFAULT 1,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS lodge_positions (
            id             TEXT PRIMARY KEY,
            position_type  TEXT NOT NULL,
            user_id        TEXT,
            start_date     TEXT NOT NULL,
            end_date       TEXT NOT NULL,
            CHECK (end_date >= start_date)
        );

        CREATE TABLE IF NOT EXISTS lodge_position_history (
            id             TEXT PRIMARY KEY,
            position_id    TEXT NOT NULL,
            position_type  TEXT NOT NULL,
            user_id        TEXT,
            start_date     TEXT NOT NULL,
            end_date       TEXT NOT NULL,
            archived_at    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS session_records (
            id                  TEXT PRIMARY KEY,
            event_id            TEXT NOT NULL UNIQUE,
            date                TEXT NOT NULL,
            status              TEXT NOT NULL DEFAULT 'Pendente'
                                CHECK (status IN ('Pendente', 'Finalizada')),
            charity_collection  REAL,
            observations        TEXT,
            created_at          TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS attendance_records (
            id                 TEXT PRIMARY KEY,
            session_record_id  TEXT NOT NULL REFERENCES session_records(id),
            brother_id         TEXT NOT NULL,
            status             TEXT NOT NULL
                               CHECK (status IN ('Presente', 'Ausente', 'Justificado')),
            UNIQUE (session_record_id, brother_id)
        );

        CREATE TABLE IF NOT EXISTS visitor_attendances (
            id                 TEXT PRIMARY KEY,
            session_record_id  TEXT NOT NULL REFERENCES session_records(id),
            name               TEXT NOT NULL,
            degree             TEXT NOT NULL DEFAULT '',
            lodge              TEXT NOT NULL,
            lodge_number       TEXT NOT NULL,
            obedience          TEXT NOT NULL,
            masonic_number     TEXT
        );
        "#,
    },
    Migration {
        version: "20250315_0002_add_lookup_indexes",
        description: "Added indexes on position type and session foreign keys",
        sql: r#"
        CREATE INDEX IF NOT EXISTS idx_positions_type ON lodge_positions(position_type);
        CREATE INDEX IF NOT EXISTS idx_positions_user ON lodge_positions(user_id);
        CREATE INDEX IF NOT EXISTS idx_history_type ON lodge_position_history(position_type);
        CREATE INDEX IF NOT EXISTS idx_visitors_session ON visitor_attendances(session_record_id);
        "#,
    },
];

/// Ensure that the `log` table exists; it also stores migration markers.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare_cached(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(m.sql)?;
    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [m.version, m.description],
    )?;
    tx.commit()
}

/// Public entry point: run all pending migrations, oldest first.
/// Returns the versions applied by this call.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    run_migrations(conn, MIGRATIONS)
}

/// A failing migration is rolled back and reported as `AppError::Migration`;
/// the ones before it stay applied.
fn run_migrations(
    conn: &Connection,
    migrations: &[Migration],
) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;

    let mut applied = Vec::new();
    for m in migrations {
        if is_applied(conn, m.version)? {
            continue;
        }
        apply(conn, m).map_err(|e| {
            error!(version = m.version, error = %e, "migration failed");
            AppError::Migration(format!("{} ({}): {e}", m.version, m.description))
        })?;
        info!(version = m.version, "migration applied");
        applied.push(m.version);
    }

    Ok(applied)
}
