//! Server initialization and run loop

use super::config::AppConfig;
use super::loader::load_config;
use super::providers::resolve_providers;
use crate::api::{self, AppState};
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use toplus_core::ReviewService;
use tracing::{info, warn};

/// Resolve providers and build the review service
pub fn build_service(config: &AppConfig) -> AppState {
    let registry = resolve_providers(&config.llm);
    let providers = registry
        .list_providers()
        .into_iter()
        .map(str::to_string)
        .collect();
    let grammar_checker = registry.grammar_checker().is_some();
    let service = ReviewService::from_registry(&registry, config.review.clone());

    AppState {
        service: Arc::new(service),
        providers: Arc::new(providers),
        grammar_checker,
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Load configuration and serve the HTTP API until interrupted
pub async fn run() -> Result<()> {
    let config = load_config()?;
    let state = build_service(&config);
    let app = api::router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    info!("HTTP server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("TOPLUS shutdown complete");
    Ok(())
}
