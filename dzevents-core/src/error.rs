//! Error types for calendar export.

use thiserror::Error;

/// Errors that can occur while exporting events.
///
/// Every variant is raised before any output is assembled, so a failed
/// export never leaves a partially written calendar behind.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Invalid event id: '{0}'")]
    InvalidId(String),

    #[error("Event {0} not found")]
    NotFound(u64),

    #[error("Event {id} cannot be exported: {reason}")]
    NotExportable { id: u64, reason: String },

    #[error("Event {0} has no start date")]
    MissingStart(u64),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid time '{0}'. Expected HH:MM or HH:MM:SS")]
    InvalidTime(String),

    #[error("Unknown timezone '{0}'")]
    InvalidTimezone(String),

    #[error("Too many events requested ({requested}), the limit is {limit}")]
    TooManyEvents { requested: usize, limit: usize },

    #[error("No events selected")]
    NoEvents,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Event store error: {0}")]
    Store(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for export operations.
pub type ExportResult<T> = Result<T, ExportError>;
