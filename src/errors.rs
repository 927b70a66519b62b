//! Unified application error type.
//! All modules (store, core, auth, server, cli) return AppError to keep the
//! error handling consistent and easy to manage.

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
    // Document store
    // ---------------------------
    #[error("Document error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("User not found: {0}")]
    UserNotFound(String),

    // ---------------------------
    // Time provider
    // ---------------------------
    #[error("Time provider error: {0}")]
    TimeProvider(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration serialization error: {0}")]
    ConfigFormat(#[from] serde_yaml::Error),

    // ---------------------------
    // Backup errors
    // ---------------------------
    #[error("Backup error: {0}")]
    Backup(String),
}

pub type AppResult<T> = Result<T, AppError>;
