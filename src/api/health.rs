//! Health check endpoint

use super::AppState;
use axum::extract::State;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::Serialize;

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    /// Registered generative providers
    pub providers: Vec<String>,
    pub grammar_checker: bool,
}

/// Simple health check; healthy even with no provider, since every operation degrades to echo
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "toplus",
        version: env!("CARGO_PKG_VERSION"),
        providers: state.providers.as_ref().clone(),
        grammar_checker: state.grammar_checker,
    })
}

/// Create health routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}
