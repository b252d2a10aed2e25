//! Prometheus metrics recorder and `/metrics` endpoint handler.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::info;

/// Install the Prometheus metrics recorder (global).
///
/// Returns the `PrometheusHandle` used to render the `/metrics` endpoint.
/// Must be called once at server startup before any metrics are recorded.
pub fn install_recorder() -> PrometheusHandle {
    let builder = PrometheusBuilder::new();
    let handle = builder
        .install_recorder()
        .expect("failed to install metrics recorder");
    info!("prometheus metrics recorder installed");
    handle
}

// Metric name constants to avoid typos across modules.

/// Participant WebSocket connections opened (counter).
pub const WS_PARTICIPANT_CONNECTIONS_TOTAL: &str = "ws_participant_connections_total";
/// Supervisor WebSocket connections opened (counter).
pub const WS_SUPERVISOR_CONNECTIONS_TOTAL: &str = "ws_supervisor_connections_total";
/// Active participant connections (gauge).
pub const WS_PARTICIPANTS_ACTIVE: &str = "ws_participants_active";
/// Active supervisor connections (gauge).
pub const WS_SUPERVISORS_ACTIVE: &str = "ws_supervisors_active";
/// Behavioral events processed (counter, labels: kind).
pub const EVENTS_PROCESSED_TOTAL: &str = "events_processed_total";
/// Status updates broadcast to supervisors (counter).
pub const BROADCASTS_TOTAL: &str = "broadcasts_total";
/// Broadcast messages dropped on full or closed channels (counter).
pub const BROADCAST_DROPS_TOTAL: &str = "broadcast_drops_total";
/// Flagged events persisted to the sink (counter, labels: kind).
pub const FLAGGED_EVENTS_TOTAL: &str = "flagged_events_total";
