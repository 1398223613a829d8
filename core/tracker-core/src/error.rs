//! Error types for tracker-core operations.

use std::path::PathBuf;

/// All errors that can occur in tracker-core operations.
///
/// None of these are fatal to a running tracker: callback boundaries turn
/// them into log records (and, for commands and saves, notifications).
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    // ─────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Configuration file malformed: {path}: {details}")]
    ConfigMalformed { path: PathBuf, details: String },

    #[error("Home directory not found")]
    HomeDirNotFound,

    // ─────────────────────────────────────────────────────────────────────
    // I/O Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    // ─────────────────────────────────────────────────────────────────────
    // Host Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Notification failed: {0}")]
    Notify(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Event loop is no longer running")]
    SchedulerClosed,
}

/// Convenience type alias for Results using TrackerError.
pub type Result<T> = std::result::Result<T, TrackerError>;

impl From<TrackerError> for String {
    fn from(err: TrackerError) -> String {
        err.to_string()
    }
}
