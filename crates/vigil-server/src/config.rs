//! Server configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the vigil server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind (default `"127.0.0.1"`).
    pub host: String,
    /// Port to bind (default `0` for auto-assign).
    pub port: u16,
    /// Outbound buffer per supervisor connection (messages).
    pub supervisor_buffer: usize,
    /// Interval between server-initiated Ping frames on supervisor
    /// channels, in seconds.
    pub ping_interval_secs: u64,
    /// How long graceful shutdown waits for tasks before giving up.
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            supervisor_buffer: 256,
            ping_interval_secs: 30,
            shutdown_timeout_secs: 30,
        }
    }
}
