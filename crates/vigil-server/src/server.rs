//! `VigilServer` — Axum HTTP + WebSocket server for exam proctoring.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use vigil_core::{EventSink, StoredFlaggedEvent};

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::health::{self, HealthResponse};
use crate::registry::SessionRegistry;
use crate::shutdown::ShutdownCoordinator;
use crate::websocket::session::{run_participant_session, run_supervisor_session};

/// Shared state accessible from Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Connection registry for all live sessions.
    pub registry: Arc<SessionRegistry>,
    /// Durable sink for flagged events.
    pub sink: Arc<dyn EventSink>,
    /// Shutdown coordinator.
    pub shutdown: Arc<ShutdownCoordinator>,
    /// When the server started.
    pub start_time: Instant,
    /// Prometheus render handle.
    pub metrics: PrometheusHandle,
    /// Outbound buffer per supervisor connection.
    pub supervisor_buffer: usize,
    /// Ping interval for supervisor channels.
    pub ping_interval: Duration,
}

/// The main vigil server.
pub struct VigilServer {
    config: ServerConfig,
    registry: Arc<SessionRegistry>,
    sink: Arc<dyn EventSink>,
    shutdown: Arc<ShutdownCoordinator>,
    start_time: Instant,
    metrics: PrometheusHandle,
}

impl VigilServer {
    /// Create a new server over a durable sink.
    #[must_use]
    pub fn new(config: ServerConfig, sink: Arc<dyn EventSink>, metrics: PrometheusHandle) -> Self {
        Self {
            config,
            registry: Arc::new(SessionRegistry::new()),
            sink,
            shutdown: Arc::new(ShutdownCoordinator::new()),
            start_time: Instant::now(),
            metrics,
        }
    }

    /// Build the Axum router with all routes.
    #[must_use]
    pub fn router(&self) -> Router {
        let state = AppState {
            registry: self.registry.clone(),
            sink: self.sink.clone(),
            shutdown: self.shutdown.clone(),
            start_time: self.start_time,
            metrics: self.metrics.clone(),
            supervisor_buffer: self.config.supervisor_buffer,
            ping_interval: Duration::from_secs(self.config.ping_interval_secs),
        };

        Router::new()
            .route("/health", get(health_handler))
            .route("/metrics", get(metrics_handler))
            .route("/api/proctoring-report/{exam_id}", get(report_handler))
            .route("/ws/proctor/{exam_id}/{student_name}", get(participant_ws_handler))
            .route("/ws/supervisor/{exam_id}", get(supervisor_ws_handler))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Bind and serve until the shutdown token fires.
    pub async fn serve(self) -> Result<(), ServerError> {
        let listener =
            tokio::net::TcpListener::bind((self.config.host.as_str(), self.config.port)).await?;
        info!(addr = %listener.local_addr()?, "vigil server listening");
        let token = self.shutdown.token();
        let router = self.router();
        axum::serve(listener, router)
            .with_graceful_shutdown(async move { token.cancelled().await })
            .await?;
        Ok(())
    }

    /// Get the connection registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Get the shutdown coordinator.
    #[must_use]
    pub fn shutdown(&self) -> &Arc<ShutdownCoordinator> {
        &self.shutdown
    }

    /// Get the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let resp = health::health_check(
        state.start_time,
        state.registry.participant_count(),
        state.registry.supervisor_count(),
        state.registry.session_count(),
    );
    Json(resp)
}

/// GET /metrics
async fn metrics_handler(State(state): State<AppState>) -> String {
    state.metrics.render()
}

/// GET /api/proctoring-report/{exam_id} — flagged events, oldest first.
async fn report_handler(
    State(state): State<AppState>,
    Path(exam_id): Path<String>,
) -> Result<Json<Vec<StoredFlaggedEvent>>, ServerError> {
    let events = state.sink.list_events(&exam_id)?;
    Ok(Json(events))
}

/// GET /ws/proctor/{exam_id}/{student_name} — participant channel upgrade.
async fn participant_ws_handler(
    State(state): State<AppState>,
    Path((exam_id, student_name)): Path<(String, String)>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| {
        run_participant_session(socket, exam_id, student_name, state.registry, state.sink)
    })
    .into_response()
}

/// GET /ws/supervisor/{exam_id} — supervisor channel upgrade.
async fn supervisor_ws_handler(
    State(state): State<AppState>,
    Path(exam_id): Path<String>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| {
        run_supervisor_session(
            socket,
            exam_id,
            state.registry,
            state.supervisor_buffer,
            state.ping_interval,
        )
    })
    .into_response()
}
