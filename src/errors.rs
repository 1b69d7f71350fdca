//! Unified application error type.
//! Every layer (db, core, cli, utils) returns AppError so failures reach the
//! caller as a typed value instead of a panic.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Persistence
    // ---------------------------
    #[error("Database error: {0}")]
    Persistence(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid position type: {0}")]
    InvalidPosition(String),

    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    #[error("Invalid module: {0}")]
    InvalidModule(String),

    // ---------------------------
    // Domain errors
    // ---------------------------
    #[error("Invalid input: {}", .0.join(" "))]
    Validation(Vec<String>),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Session {0} is finalized and can no longer change")]
    SessionClosed(String),

    #[error("Access denied to module '{0}'")]
    Forbidden(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// Rule violations carried by a rejected visitor draft.
    pub fn validation_messages(&self) -> &[String] {
        match self {
            AppError::Validation(errors) => errors,
            _ => &[],
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
