// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use anyhow::Context;
use axum::{
    routing::{get, put},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use crate::infrastructure::api_repository::ApiRepository;
use crate::infrastructure::config::load_dashboard_config;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    health_check, list_locales, render_card_page, resize_card, select_category, stream_card,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_dashboard_config().context("Failed to load dashboard configuration")?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(ApiRepository::new(
        config.api.base_url.clone(),
        config.api.timeout(),
    )?);

    // Mount one card per chart variant (application layer)
    let state = Arc::new(AppState::new(
        repository,
        config.locales.clone(),
        config.cards.initial_width,
        config.cards.ready_timeout(),
    ));

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/locales", get(list_locales))
        .route("/cards/:kind", get(render_card_page))
        .route("/cards/:kind/category", put(select_category))
        .route("/cards/:kind/width", put(resize_card))
        .route("/cards/:kind/stream", get(stream_card))
        .layer(CompressionLayer::new().br(true).gzip(true))
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    // Start server
    let addr: SocketAddr = config
        .server
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address {}", config.server.listen))?;
    tracing::info!("Starting voice-stats service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.teardown().await;
    tracing::info!("voice-stats service stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
