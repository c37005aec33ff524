//! Web API module for TOPLUS
//!
//! Provides REST API endpoints for:
//! - Health and configured providers
//! - Six-stage single-edit passthrough
//! - Diagnosis, workflows and recycling checks

pub mod health;
pub mod process;
pub mod review;

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use toplus_core::ReviewService;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

pub use health::health_routes;
pub use process::process_routes;
pub use review::review_routes;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ReviewService>,
    /// Registered generative providers, sorted
    pub providers: Arc<Vec<String>>,
    pub grammar_checker: bool,
}

/// API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Handler error rendered as an [`ApiResponse`]
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<toplus_core::Error> for ApiError {
    fn from(e: toplus_core::Error) -> Self {
        if e.is_validation() {
            Self::bad_request(e.to_string())
        } else {
            error!("Review request failed: {}", e);
            Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "Internal error".to_string(),
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::<()>::error(self.message))).into_response()
    }
}

/// JSON body extractor whose rejections use the [`ApiResponse`] envelope
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Result type for JSON handlers
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Create the application router with all endpoints
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(process_routes())
        .merge(review_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
