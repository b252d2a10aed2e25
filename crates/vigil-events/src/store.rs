//! Pool-owning store facade implementing the `EventSink` collaborator trait.

use tracing::debug;
use vigil_core::{EventSink, FlaggedEvent, SinkError, StoredFlaggedEvent};

use crate::connection::ConnectionPool;
use crate::errors::Result;
use crate::repo::EventRepo;

/// SQLite-backed durable sink for flagged events.
///
/// Cheap to clone via the internal pool; every operation checks out a pooled
/// connection for its duration only.
#[derive(Clone)]
pub struct EventStore {
    pool: ConnectionPool,
}

impl EventStore {
    /// Create a store over an existing pool (migrations already run).
    #[must_use]
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    /// Append one flagged event, returning its row ID.
    pub fn append_event(&self, event: &FlaggedEvent) -> Result<i64> {
        let conn = self.pool.get()?;
        let id = EventRepo::insert(&conn, event)?;
        debug!(
            exam_id = %event.exam_id,
            student = %event.student_name,
            kind = %event.event_type,
            score = event.suspicion_score,
            "flagged event persisted"
        );
        Ok(id)
    }

    /// All flagged events for an exam, oldest first.
    pub fn events_for_exam(&self, exam_id: &str) -> Result<Vec<StoredFlaggedEvent>> {
        let conn = self.pool.get()?;
        EventRepo::list_by_exam(&conn, exam_id)
    }

    /// Number of flagged events recorded for an exam.
    pub fn event_count(&self, exam_id: &str) -> Result<i64> {
        let conn = self.pool.get()?;
        EventRepo::count_by_exam(&conn, exam_id)
    }
}

impl EventSink for EventStore {
    fn append(&self, event: &FlaggedEvent) -> std::result::Result<i64, SinkError> {
        Ok(self.append_event(event)?)
    }

    fn list_events(&self, exam_id: &str) -> std::result::Result<Vec<StoredFlaggedEvent>, SinkError> {
        Ok(self.events_for_exam(exam_id)?)
    }
}
