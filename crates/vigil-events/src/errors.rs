//! Error types for the event sink subsystem.

use thiserror::Error;
use vigil_core::SinkError;

/// Errors that can occur during event store operations.
#[derive(Debug, Error)]
pub enum EventStoreError {
    /// `SQLite` database error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error.
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// Schema migration failed.
    #[error("migration error: {message}")]
    Migration {
        /// Describes which migration failed and why.
        message: String,
    },

    /// A stored row could not be mapped back to a typed record.
    #[error("invalid stored record: {0}")]
    InvalidRecord(String),
}

/// Convenience type alias for event store results.
pub type Result<T> = std::result::Result<T, EventStoreError>;

impl From<EventStoreError> for SinkError {
    fn from(err: EventStoreError) -> Self {
        SinkError::Storage(err.to_string())
    }
}
