//! # vigil-server
//!
//! Axum HTTP + `WebSocket` server for real-time exam proctoring.
//!
//! - `WebSocket` surfaces: participant event ingest and supervisor fan-out
//! - Connection registry: live sessions, participants, supervisors, and
//!   scoring state behind a single lock
//! - Broadcast pipeline: classify → score → categorize → fan out → persist
//! - HTTP endpoints: health check, Prometheus metrics, proctoring report
//! - Graceful shutdown via `tokio::signal` + `CancellationToken`

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod health;
pub mod metrics;
pub mod registry;
pub mod server;
pub mod shutdown;
pub mod websocket;
