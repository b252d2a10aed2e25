//! Event repository — stateless, every method takes `&Connection`.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use vigil_core::{FlaggedEvent, StoredFlaggedEvent};

use crate::errors::{EventStoreError, Result};

/// Repository for the `proctoring_events` table.
pub struct EventRepo;

impl EventRepo {
    /// Insert a single flagged event, returning its row ID.
    pub fn insert(conn: &Connection, event: &FlaggedEvent) -> Result<i64> {
        let _ = conn.execute(
            "INSERT INTO proctoring_events
             (exam_id, student_name, event_type, status, suspicion_level, suspicion_score, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                event.exam_id,
                event.student_name,
                event.event_type.as_str(),
                event.status.as_str(),
                event.suspicion_level.as_str(),
                event.suspicion_score,
                event.timestamp.to_rfc3339(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// All flagged events for an exam, oldest first.
    pub fn list_by_exam(conn: &Connection, exam_id: &str) -> Result<Vec<StoredFlaggedEvent>> {
        let mut stmt = conn.prepare(
            "SELECT id, exam_id, student_name, event_type, status,
                    suspicion_level, suspicion_score, timestamp
             FROM proctoring_events
             WHERE exam_id = ?1
             ORDER BY timestamp ASC, id ASC",
        )?;
        let rows = stmt
            .query_map(params![exam_id], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.into_iter().collect()
    }

    /// Number of flagged events recorded for an exam.
    pub fn count_by_exam(conn: &Connection, exam_id: &str) -> Result<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM proctoring_events WHERE exam_id = ?1",
            params![exam_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Map one row; string columns parse back into their typed forms.
    fn map_row(row: &Row<'_>) -> rusqlite::Result<Result<StoredFlaggedEvent>> {
        let id: i64 = row.get(0)?;
        let exam_id: String = row.get(1)?;
        let student_name: String = row.get(2)?;
        let event_type: String = row.get(3)?;
        let status: String = row.get(4)?;
        let suspicion_level: String = row.get(5)?;
        let suspicion_score: u32 = row.get(6)?;
        let timestamp: String = row.get(7)?;

        Ok(Self::assemble(
            id,
            exam_id,
            student_name,
            &event_type,
            &status,
            &suspicion_level,
            suspicion_score,
            &timestamp,
        ))
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble(
        id: i64,
        exam_id: String,
        student_name: String,
        event_type: &str,
        status: &str,
        suspicion_level: &str,
        suspicion_score: u32,
        timestamp: &str,
    ) -> Result<StoredFlaggedEvent> {
        let event_type = vigil_core::EventKind::parse(event_type)
            .ok_or_else(|| EventStoreError::InvalidRecord(format!("bad event_type: {event_type}")))?;
        let status = status
            .parse()
            .map_err(|e| EventStoreError::InvalidRecord(format!("bad status: {e}")))?;
        let suspicion_level = suspicion_level
            .parse()
            .map_err(|e| EventStoreError::InvalidRecord(format!("bad suspicion_level: {e}")))?;
        let timestamp: DateTime<Utc> = DateTime::parse_from_rfc3339(timestamp)
            .map_err(|e| EventStoreError::InvalidRecord(format!("bad timestamp: {e}")))?
            .with_timezone(&Utc);

        Ok(StoredFlaggedEvent {
            id,
            event: FlaggedEvent {
                exam_id,
                student_name,
                event_type,
                status,
                suspicion_level,
                suspicion_score,
                timestamp,
            },
        })
    }
}
