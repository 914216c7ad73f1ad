use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while setting up a sync session or running the CLI.
///
/// The sync operations themselves never return these: backend failures are
/// reported as [`crate::OperationResult`] values instead.
#[derive(Error, Debug)]
pub enum SyncError {
    // Config Errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid secrets file: {0}")]
    Secrets(String),

    // Repository Errors
    #[error("Repository path not found: {0}")]
    PathNotFound(PathBuf),

    // File/IO Errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // User cancelled
    #[error("Operation cancelled by user")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, SyncError>;
