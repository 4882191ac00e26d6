mod avatar;
mod config;
mod http;
mod models;
mod presence;
mod render;
mod state;
mod steam;

use std::sync::Arc;

use crate::config::CardConfig;
use crate::render::CardRenderer;
use crate::state::AppState;
use crate::steam::SteamClient;
use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let config = CardConfig::load().context("Failed to load configuration")?;
    if config.api_key().is_none() {
        warn!(
            "{} is not set; card requests will fail until it is configured",
            crate::config::API_KEY_ENV
        );
    }

    let steam = SteamClient::new(&config.steam).context("Failed to initialize Steam client")?;
    let renderer = CardRenderer::with_system_fonts();
    let address = config.server.address();
    let app_state = AppState::new(Arc::new(config), steam, renderer);

    let listener = TcpListener::bind(address)
        .await
        .context("Failed to bind HTTP listener")?;
    let local_addr = listener
        .local_addr()
        .context("Failed to obtain listener address")?;
    info!("Steam card listening on {local_addr}");

    let router: Router = http::router(app_state);
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server exited with error")?;

    Ok(())
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .compact()
        .init();
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {err}");
        return;
    }
    info!("Shutdown signal received");
}
