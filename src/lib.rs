//! rLodge library root.
//! Exposes the CLI parser, the high-level run() function and the internal modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod ui;
pub mod utils;

use crate::cli::commands::{self as cmd, Context};
use crate::cli::parser::{Cli, Commands, PositionAction};
use crate::config::Config;
use crate::core::permissions::Module;
use crate::errors::AppResult;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Module a command needs; `None` for commands anyone may run.
fn required_module(command: &Commands) -> Option<Module> {
    match command {
        Commands::Brother { .. } => Some(Module::Irmaos),
        Commands::Position { action } => match action {
            PositionAction::Whoami { .. } => None,
            _ => Some(Module::Cargos),
        },
        Commands::Session { .. } | Commands::Attendance { .. } | Commands::Visitor { .. } => {
            Some(Module::Chancelaria)
        }
        _ => None,
    }
}

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => return cmd::init::handle(cli),
        Commands::Config { .. } => return cmd::config::handle(&cli.command, cfg),
        Commands::Db { .. } => return cmd::db::handle(&cli.command, cfg),
        Commands::Log { .. } => return cmd::log::handle(&cli.command, cfg),
        Commands::Backup { .. } => return cmd::backup::handle(&cli.command, cfg),
        _ => {}
    }

    let mut ctx = Context::open(cli, cfg)?;
    if let Some(module) = required_module(&cli.command) {
        ctx.guard(module)?;
    }

    match &cli.command {
        Commands::Brother { action } => cmd::brother::handle(action, &ctx),
        Commands::Position { action } => cmd::position::handle(action, &mut ctx),
        Commands::Access { module, date } => cmd::access::handle(module, date.as_ref(), &ctx),
        Commands::Session { action } => cmd::session::handle(action, &ctx),
        Commands::Attendance { action } => cmd::attendance::handle(action, &ctx),
        Commands::Visitor { action } => cmd::visitor::handle(action, &ctx),
        _ => Ok(()),
    }
}

/// Diagnostics go to stderr so command output stays clean.
/// `RUST_LOG` wins over the configured filter.
pub fn init_tracing(default_filter: &str) {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Entry point used by main.rs
pub fn run(cli: Cli) -> AppResult<()> {
    let mut cfg = Config::load()?;
    init_tracing(&cfg.log_filter);

    if let Some(custom_db) = &cli.db {
        cfg.database = Config::resolve_database(custom_db)
            .to_string_lossy()
            .to_string();
    }

    tracing::debug!(database = %cfg.database, "configuration loaded");
    dispatch(&cli, &cfg)
}
