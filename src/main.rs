//! sensor-relay server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints and the
//! background liveness sweep.

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use sensor_relay::api;
use sensor_relay::app_state::AppState;
use sensor_relay::config::{LogFormat, RelayConfig};
use sensor_relay::service::spawn_liveness_sweeper;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = RelayConfig::from_env().context("invalid configuration")?;

    // Initialize tracing
    init_tracing(config.log_format);

    tracing::info!(
        addr = %config.listen_addr,
        relay_mode = ?config.relay_mode,
        auth_mode = ?config.auth_mode,
        "starting sensor-relay"
    );
    if config.uses_default_session_secret() {
        tracing::warn!("SESSION_SECRET is not set; using the built-in development secret");
    }

    // Build services and application state
    let sweep_interval = config.sweep_interval;
    let listen_addr = config.listen_addr;
    let app_state = AppState::from_config(config).await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = spawn_liveness_sweeper(
        Arc::clone(&app_state.relay_service),
        sweep_interval,
        shutdown_rx,
    );

    // Build router
    let app = api::build_app(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("failed to bind {listen_addr}"))?;
    tracing::info!(addr = %listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = shutdown_tx.send(true);
    let _ = sweeper.await;
    tracing::info!("sensor-relay stopped");

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
