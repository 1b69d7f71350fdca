pub mod access;
pub mod attendance;
pub mod backup;
pub mod brother;
pub mod config;
pub mod db;
pub mod init;
pub mod log;
pub mod position;
pub mod session;
pub mod visitor;

use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::attendance::AttendanceEngine;
use crate::core::permissions::Module;
use crate::core::resolver::{AccessPolicy, PositionResolver};
use crate::db::queries;
use crate::db::store::SqliteStore;
use crate::errors::{AppError, AppResult};
use crate::models::brother::Brother;
use crate::models::identity::Identity;
use crate::models::session::SessionRecord;
use crate::utils::date::today;
use rusqlite::Connection;
use tracing::warn;
use uuid::Uuid;

/// What every lodge command needs: who is asking and what they may do.
pub struct Context<'a> {
    pub cfg: &'a Config,
    pub identity: Identity,
    pub resolver: PositionResolver<SqliteStore>,
}

impl<'a> Context<'a> {
    pub fn open(cli: &Cli, cfg: &'a Config) -> AppResult<Self> {
        let store = SqliteStore::open(&cfg.database)?;
        let resolver = PositionResolver::load(
            store,
            AccessPolicy::new(&cfg.master_admin_emails),
            cfg.cache_ttl(),
        )?;
        let identity = identity_from_cli(cli, resolver.store().conn())?;

        Ok(Self {
            cfg,
            identity,
            resolver,
        })
    }

    pub fn conn(&self) -> &Connection {
        self.resolver.store().conn()
    }

    /// Fail with `Forbidden` unless the identity may open `module` today.
    /// Positions older than the configured cache TTL are fetched again first.
    pub fn guard(&mut self, module: Module) -> AppResult<()> {
        self.resolver.refresh_if_stale()?;
        self.resolver
            .require(&self.identity, module, today())
            .inspect_err(|_| {
                warn!(
                    module = module.code(),
                    user = ?self.identity.user_id,
                    email = ?self.identity.email,
                    "access denied"
                );
            })
    }

    pub fn attendance_engine(&self) -> AppResult<AttendanceEngine<SqliteStore>> {
        AttendanceEngine::load(SqliteStore::open(&self.cfg.database)?)
    }
}

/// `--user` accepts a brother id or an e-mail. Without `--user` and
/// `--admin` the process runs as the local operator.
fn identity_from_cli(cli: &Cli, conn: &Connection) -> AppResult<Identity> {
    let Some(raw) = cli.user.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(if cli.admin {
            Identity::new(None, None, true)
        } else {
            Identity::local_operator()
        });
    };

    if let Ok(id) = Uuid::parse_str(raw) {
        let email = queries::find_brother(conn, id)?.and_then(|b| b.email);
        return Ok(Identity::new(Some(id), email, cli.admin));
    }

    if raw.contains('@') {
        let email = raw.to_lowercase();
        let user_id = queries::find_brother_by_email(conn, &email)?.map(|b| b.id);
        return Ok(Identity::new(user_id, Some(email), cli.admin));
    }

    Err(AppError::InvalidId(raw.to_string()))
}

pub fn parse_uuid(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::InvalidId(raw.to_string()))
}

/// Look a brother up by id or e-mail.
pub fn resolve_brother(conn: &Connection, key: &str) -> AppResult<Brother> {
    let found = match Uuid::parse_str(key.trim()) {
        Ok(id) => queries::find_brother(conn, id)?,
        Err(_) => queries::find_brother_by_email(conn, key)?,
    };
    found.ok_or_else(|| AppError::NotFound(format!("Brother '{key}'")))
}

/// Look a session up by id or by event id.
pub fn resolve_session(engine: &AttendanceEngine<SqliteStore>, key: &str) -> AppResult<SessionRecord> {
    let found = match Uuid::parse_str(key.trim()) {
        Ok(id) => engine.session(id),
        Err(_) => engine.session_for_event(key),
    };
    found
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Session '{key}'")))
}
