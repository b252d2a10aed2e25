//! `/health` endpoint.

use serde::Serialize;
use std::time::Instant;

/// Health check response body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the server is running.
    pub status: String,
    /// Seconds since the server started.
    pub uptime_secs: u64,
    /// Connected participants across all sessions.
    pub participants: usize,
    /// Connected supervisors across all sessions.
    pub supervisors: usize,
    /// Exam sessions with at least one live connection.
    pub active_sessions: usize,
}

/// Build a health response from live registry counters.
#[must_use]
pub fn health_check(
    start_time: Instant,
    participants: usize,
    supervisors: usize,
    sessions: usize,
) -> HealthResponse {
    HealthResponse {
        status: "ok".into(),
        uptime_secs: start_time.elapsed().as_secs(),
        participants,
        supervisors,
        active_sessions: sessions,
    }
}
