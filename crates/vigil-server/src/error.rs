//! Server error type and HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use vigil_core::SinkError;

/// Errors surfaced by server operations.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The durable event sink failed.
    #[error(transparent)]
    Sink(#[from] SinkError),

    /// Socket bind or accept failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::Sink(_) | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_error_maps_to_500() {
        let err = ServerError::Sink(SinkError::Storage("boom".into()));
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn sink_error_display_passes_through() {
        let err = ServerError::Sink(SinkError::Storage("boom".into()));
        assert_eq!(err.to_string(), "event sink storage error: boom");
    }
}
