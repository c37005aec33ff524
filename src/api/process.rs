//! Six-stage passthrough endpoint

use super::{ApiError, ApiJson, ApiResponse, ApiResult, AppState};
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use toplus_core::StageResult;

#[derive(Debug, Deserialize)]
pub struct ProcessTextRequest {
    pub text: String,
    pub step: i64,
}

/// Run one stage (1-6) on the text
async fn process_text(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ProcessTextRequest>,
) -> ApiResult<StageResult> {
    let step = u8::try_from(request.step).map_err(|_| {
        ApiError::bad_request(format!("step must be between 1 and 6, got {}", request.step))
    })?;
    let result = state.service.process_stage(&request.text, step).await?;
    Ok(Json(ApiResponse::success(result)))
}

/// Create passthrough routes
pub fn process_routes() -> Router<AppState> {
    Router::new().route("/api/process-text", post(process_text))
}
