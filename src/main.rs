// main.rs
mod cloud;
mod commands;
mod config;
mod devices;
mod docs;
mod error;
mod extract;
mod handlers;
mod metrics;
mod models;
mod session;
mod utils;

#[cfg(test)]
mod testing;

use anyhow::Context;
use cloud::SimulatedCloud;
use commands::CommandExecutor;
use models::AppState;
use session::SessionEstablisher;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = config::Settings::new()
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    if settings.metrics.enabled {
        metrics::setup_metrics(settings.metrics.port)?;
    }

    let client = Arc::new(SimulatedCloud::from_settings(
        &settings.cloud.account,
        &settings.simulator,
    ));
    let timeout = settings.device.command_timeout();
    let state = Arc::new(AppState {
        establisher: SessionEstablisher::new(
            client,
            settings.cloud.account.clone(),
            settings.cloud.device_type.clone(),
            timeout,
        ),
        executor: CommandExecutor::new(timeout),
        max_hold_secs: settings.device.max_hold_secs,
    });

    let app = handlers::router(state);

    let listener = tokio::net::TcpListener::bind(&settings.server.address)
        .await
        .with_context(|| format!("Failed to bind address {}", settings.server.address))?;

    tracing::info!(
        account = %settings.cloud.account,
        model = %settings.cloud.device_type,
        "Server started on {}",
        settings.server.address
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(utils::shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
