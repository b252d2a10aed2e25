//! # vigil-daemon
//!
//! `vigild` — wires the event store, connection registry, and server
//! together and runs until interrupted.

#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vigil_events::{ConnectionConfig, EventStore};
use vigil_server::config::ServerConfig;
use vigil_server::server::VigilServer;

/// Vigil exam proctoring server.
#[derive(Parser, Debug)]
#[command(name = "vigild", about = "Real-time exam proctoring server")]
struct Cli {
    /// Host to bind.
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to bind (0 for auto-assign).
    #[arg(long, default_value = "8090")]
    port: u16,

    /// Path to the `SQLite` database holding flagged events.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

impl Cli {
    fn default_db_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
        PathBuf::from(home).join(".vigil").join("proctoring.db")
    }
}

fn ensure_parent_dir(path: &std::path::Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Event database before anything else — the sink must be ready when the
    // first flagged event arrives.
    let db_path = args.db_path.unwrap_or_else(Cli::default_db_path);
    ensure_parent_dir(&db_path)?;
    let pool = vigil_events::new_file(&db_path.to_string_lossy(), &ConnectionConfig::default())
        .context("Failed to open event database")?;
    {
        let conn = pool.get().context("Failed to get DB connection")?;
        let _ = vigil_events::run_migrations(&conn).context("Failed to run migrations")?;
    }
    let store = Arc::new(EventStore::new(pool));
    tracing::info!(path = %db_path.display(), "event store ready");

    let metrics = vigil_server::metrics::install_recorder();
    let config = ServerConfig {
        host: args.host,
        port: args.port,
        ..ServerConfig::default()
    };
    let server = VigilServer::new(config, store, metrics);

    // Ctrl-C triggers the graceful shutdown token; the serve loop drains
    // and returns.
    let shutdown = server.shutdown().clone();
    let _ = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("ctrl-c received, shutting down");
            shutdown.shutdown();
        }
    });

    server.serve().await.context("server error")?;
    tracing::info!("vigild stopped");
    Ok(())
}
