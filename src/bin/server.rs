//! bookcore HTTP Server Binary
//!
//! This is the main entry point for the booking REST API server. It
//! initializes the repository, starts the background sweeper, sets up the
//! HTTP router, and serves requests.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin bookcore-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (overrides bookcore.toml; default: 0.0.0.0)
//! - `PORT`: Server port (overrides bookcore.toml; default: 8080)
//! - `REPOSITORY_TYPE`: Storage backend ("local")
//! - `RUST_LOG`: Log filter (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::EnvFilter;

use bookcore::config::AppConfig;
use bookcore::db;
use bookcore::http::{create_router, AppState};
use bookcore::services::{Sweeper, SystemClock, TracingNotifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting bookcore HTTP server");

    let config = AppConfig::from_default_location();

    // Initialize global repository once and reuse it across the app
    db::init_repository().map_err(|e| anyhow::anyhow!(e))?;
    let repository = Arc::clone(db::get_repository()?);
    info!("Repository initialized successfully");

    // Background sweep: reminders and subscription expiry. One instance per
    // process; multi-replica deployments need external leader election.
    let sweeper = Arc::new(Sweeper::new(
        Arc::clone(&repository),
        Arc::new(TracingNotifier),
        Arc::new(SystemClock),
        Duration::from_secs(config.scheduling.sweep_interval_secs),
        config.scheduling.reminder_lead_minutes,
    ));
    sweeper.start();
    info!(
        interval_secs = config.scheduling.sweep_interval_secs,
        "Background sweeper started"
    );

    // Create application state and router
    let state = AppState::with_defaults(repository, config.clone());
    let app = create_router(state);

    // Determine bind address; env vars override the config file
    let host = env::var("HOST").unwrap_or_else(|_| config.server.host.clone());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    sweeper.stop().await;
    Ok(())
}
