//! Session registry: the authoritative mapping of live exam sessions.
//!
//! One mutex serializes every registry mutation and every scoring update —
//! this is the sole synchronization primitive in the real-time core. The
//! lock is held only for map mutation and O(1) score arithmetic, never
//! across a network send: broadcasts snapshot the recipient set under the
//! lock and deliver outside it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use metrics::counter;
use parking_lot::Mutex;
use tracing::{debug, trace};
use vigil_analysis::scoring::{self, ParticipantState};
use vigil_core::Label;

use crate::metrics::{BROADCASTS_TOTAL, BROADCAST_DROPS_TOTAL};
use crate::websocket::connection::SupervisorConnection;
use crate::websocket::protocol::StatusUpdate;

/// Presence handle for a connected participant.
///
/// The server never writes to the participant channel, so the handle only
/// records identity. Re-registering a name replaces the handle without
/// closing the previous socket — the old reader task fails on its own.
#[derive(Clone, Debug)]
pub struct ParticipantHandle {
    /// Connection ID of the socket currently bound to this name.
    pub connection_id: String,
    /// When the socket connected.
    pub connected_at: Instant,
}

impl ParticipantHandle {
    /// Handle for a socket connecting now.
    #[must_use]
    pub fn new(connection_id: String) -> Self {
        Self {
            connection_id,
            connected_at: Instant::now(),
        }
    }
}

/// Live state for one exam session.
#[derive(Default)]
struct ExamSession {
    participants: HashMap<String, ParticipantHandle>,
    supervisors: HashMap<String, Arc<SupervisorConnection>>,
    states: HashMap<String, ParticipantState>,
}

impl ExamSession {
    fn is_empty(&self) -> bool {
        self.participants.is_empty() && self.supervisors.is_empty() && self.states.is_empty()
    }
}

/// Registry of all live exam sessions.
///
/// Explicitly constructed and shared by `Arc` — never a process-global.
/// Sessions are created implicitly on first connection and garbage-collected
/// when their last connection closes and their state map empties.
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, ExamSession>>,
}

impl SessionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Register a participant connection, overwriting any existing mapping
    /// for the name, and initialize a zero-score state if none exists.
    pub fn register_participant(&self, exam_id: &str, student_name: &str, handle: ParticipantHandle) {
        let mut sessions = self.sessions.lock();
        let session = sessions.entry(exam_id.to_string()).or_default();
        let _ = session
            .participants
            .insert(student_name.to_string(), handle);
        let _ = session
            .states
            .entry(student_name.to_string())
            .or_insert_with(|| ParticipantState::new(Instant::now()));
        debug!(exam_id, student_name, "participant registered");
    }

    /// Remove a participant's connection mapping and scoring state.
    ///
    /// The accumulated score is discarded — a reconnect under the same name
    /// starts from zero.
    pub fn unregister_participant(&self, exam_id: &str, student_name: &str) {
        let mut sessions = self.sessions.lock();
        if let Some(session) = sessions.get_mut(exam_id) {
            let _ = session.participants.remove(student_name);
            let _ = session.states.remove(student_name);
            if session.is_empty() {
                let _ = sessions.remove(exam_id);
                debug!(exam_id, "empty session removed");
            }
        }
    }

    /// Add a supervisor connection to a session's observer set.
    pub fn register_supervisor(&self, exam_id: &str, conn: Arc<SupervisorConnection>) {
        let mut sessions = self.sessions.lock();
        let session = sessions.entry(exam_id.to_string()).or_default();
        let _ = session.supervisors.insert(conn.id.clone(), conn);
        debug!(exam_id, "supervisor registered");
    }

    /// Remove a supervisor connection. No-op if it is not present.
    pub fn unregister_supervisor(&self, exam_id: &str, connection_id: &str) {
        let mut sessions = self.sessions.lock();
        if let Some(session) = sessions.get_mut(exam_id) {
            let _ = session.supervisors.remove(connection_id);
            if session.is_empty() {
                let _ = sessions.remove(exam_id);
                debug!(exam_id, "empty session removed");
            }
        }
    }

    /// Apply a classification label to a participant's score, creating the
    /// state at zero if this is the first event for the pair.
    pub fn apply_label(&self, exam_id: &str, student_name: &str, label: Label, now: Instant) -> u32 {
        let mut sessions = self.sessions.lock();
        let state = sessions
            .entry(exam_id.to_string())
            .or_default()
            .states
            .entry(student_name.to_string())
            .or_insert_with(|| ParticipantState::new(now));
        scoring::apply_label(state, label, now)
    }

    /// Add a discrete penalty to a participant's score.
    pub fn apply_penalty(&self, exam_id: &str, student_name: &str, points: u32) -> u32 {
        let mut sessions = self.sessions.lock();
        let state = sessions
            .entry(exam_id.to_string())
            .or_default()
            .states
            .entry(student_name.to_string())
            .or_insert_with(|| ParticipantState::new(Instant::now()));
        scoring::apply_penalty(state, points)
    }

    /// Current score for a participant, if state exists.
    #[must_use]
    pub fn score(&self, exam_id: &str, student_name: &str) -> Option<u32> {
        let sessions = self.sessions.lock();
        sessions
            .get(exam_id)
            .and_then(|s| s.states.get(student_name))
            .map(ParticipantState::score)
    }

    /// Broadcast a status update to every supervisor of a session.
    ///
    /// Serializes once, snapshots the supervisor set under the lock, then
    /// delivers outside it. Per-connection failures are counted and dropped
    /// deliberately — one dead supervisor never blocks the others or the
    /// caller. Returns the number of successful deliveries.
    pub fn broadcast_to_supervisors(&self, exam_id: &str, update: &StatusUpdate) -> usize {
        let json = match serde_json::to_string(update) {
            Ok(j) => Arc::new(j),
            Err(e) => {
                tracing::warn!(exam_id, error = %e, "failed to serialize status update");
                return 0;
            }
        };

        let recipients: Vec<Arc<SupervisorConnection>> = {
            let sessions = self.sessions.lock();
            sessions
                .get(exam_id)
                .map(|s| s.supervisors.values().cloned().collect())
                .unwrap_or_default()
        };

        let mut delivered = 0;
        for conn in &recipients {
            if conn.send(json.clone()) {
                delivered += 1;
            } else {
                counter!(BROADCAST_DROPS_TOTAL).increment(1);
                trace!(exam_id, conn_id = %conn.id, "status update dropped for supervisor");
            }
        }
        counter!(BROADCASTS_TOTAL).increment(1);
        debug!(
            exam_id,
            recipients = recipients.len(),
            delivered,
            "status update broadcast"
        );
        delivered
    }

    /// Connected participants across all sessions.
    #[must_use]
    pub fn participant_count(&self) -> usize {
        self.sessions
            .lock()
            .values()
            .map(|s| s.participants.len())
            .sum()
    }

    /// Connected supervisors across all sessions.
    #[must_use]
    pub fn supervisor_count(&self) -> usize {
        self.sessions
            .lock()
            .values()
            .map(|s| s.supervisors.len())
            .sum()
    }

    /// Sessions currently tracked.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.lock().len()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
