//! Diagnosis, workflow and recycling endpoints

use super::{ApiJson, ApiResponse, ApiResult, AppState};
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use toplus_core::{DiagnosisResult, RecyclingResult, ScenarioCase, TextType, WorkflowReport};

#[derive(Debug, Deserialize)]
pub struct DiagnoseRequest {
    pub text: String,
    #[serde(default)]
    pub text_type: Option<String>,
    #[serde(default)]
    pub target_grade: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WorkflowRequest {
    pub text: String,
    #[serde(default)]
    pub text_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CaseWorkflowRequest {
    pub text: String,
    pub case: String,
}

#[derive(Debug, Deserialize)]
pub struct RecyclingRequest {
    pub text: String,
    #[serde(default)]
    pub target_grade: Option<String>,
}

fn parse_text_type(label: Option<&str>) -> toplus_core::Result<Option<TextType>> {
    label.map(str::parse).transpose()
}

async fn diagnose(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<DiagnoseRequest>,
) -> ApiResult<DiagnosisResult> {
    let text_type = parse_text_type(request.text_type.as_deref())?;
    let result = state
        .service
        .diagnose(&request.text, text_type, request.target_grade.as_deref())
        .await?;
    Ok(Json(ApiResponse::success(result)))
}

async fn workflow(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<WorkflowRequest>,
) -> ApiResult<WorkflowReport> {
    let text_type = parse_text_type(request.text_type.as_deref())?;
    let report = state.service.run_workflow(&request.text, text_type).await?;
    Ok(Json(ApiResponse::success(report)))
}

async fn case_workflow(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CaseWorkflowRequest>,
) -> ApiResult<WorkflowReport> {
    let case: ScenarioCase = request.case.parse()?;
    let report = state.service.run_case_workflow(&request.text, case).await?;
    Ok(Json(ApiResponse::success(report)))
}

async fn recycling(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RecyclingRequest>,
) -> ApiResult<RecyclingResult> {
    let result = state
        .service
        .recycling_check(&request.text, request.target_grade.as_deref())
        .await?;
    Ok(Json(ApiResponse::success(result)))
}

/// Create review routes
pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/diagnose", post(diagnose))
        .route("/api/v1/workflow", post(workflow))
        .route("/api/v1/workflow/case", post(case_workflow))
        .route("/api/v1/recycling", post(recycling))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_type() {
        assert_eq!(parse_text_type(None).unwrap(), None);
        assert_eq!(
            parse_text_type(Some("casual")).unwrap(),
            Some(TextType::Casual)
        );
        assert!(parse_text_type(Some("poetry")).is_err());
    }

    #[test]
    fn test_request_optional_fields() {
        let request: DiagnoseRequest = serde_json::from_str(r#"{"text": "hi"}"#).unwrap();
        assert!(request.text_type.is_none());
        assert!(request.target_grade.is_none());
    }
}
