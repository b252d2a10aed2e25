//! Durable event sink — the collaborator interface the pipeline writes to.

use thiserror::Error;

use crate::event::{FlaggedEvent, StoredFlaggedEvent};

/// Error surfaced by sink operations.
///
/// The pipeline treats appends as fire-and-forget: it logs this error and
/// moves on. The reporting surface propagates it as a 500.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The backing store failed.
    #[error("event sink storage error: {0}")]
    Storage(String),
}

/// Append-only store of flagged events.
///
/// Implemented by the SQLite-backed `EventStore` in `vigil-events`; tests
/// substitute in-memory recorders.
pub trait EventSink: Send + Sync {
    /// Append one flagged event, returning its sink-assigned ID.
    fn append(&self, event: &FlaggedEvent) -> Result<i64, SinkError>;

    /// All flagged events for an exam, oldest first.
    fn list_events(&self, exam_id: &str) -> Result<Vec<StoredFlaggedEvent>, SinkError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_error_display() {
        let err = SinkError::Storage("disk full".into());
        assert_eq!(err.to_string(), "event sink storage error: disk full");
    }
}
