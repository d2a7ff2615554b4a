use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::reports::dtos::SubmissionResponseDto;
use crate::features::reports::services::ReportService;
use crate::shared::types::ApiResponse;

/// Current stage of a submission session
#[utoipa::path(
    get,
    path = "/api/submissions/{id}",
    params(
        ("id" = Uuid, Path, description = "Submission session ID")
    ),
    responses(
        (status = 200, description = "Submission session", body = ApiResponse<SubmissionResponseDto>),
        (status = 404, description = "Session not found or expired")
    ),
    tag = "submissions"
)]
pub async fn get_submission(
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SubmissionResponseDto>>> {
    let submission = service.submission(id).await?;
    Ok(Json(ApiResponse::success(Some(submission), None, None)))
}

/// Acknowledge the drafted email (`confirm` -> `done`)
#[utoipa::path(
    post,
    path = "/api/submissions/{id}/confirm",
    params(
        ("id" = Uuid, Path, description = "Submission session ID")
    ),
    responses(
        (status = 200, description = "Submission completed", body = ApiResponse<SubmissionResponseDto>),
        (status = 404, description = "Session not found or expired"),
        (status = 409, description = "Session is not at the confirm stage")
    ),
    tag = "submissions"
)]
pub async fn confirm_submission(
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SubmissionResponseDto>>> {
    let submission = service.confirm_submission(id).await?;
    Ok(Json(ApiResponse::success(Some(submission), None, None)))
}

/// Return the session to an empty form ("back to home")
#[utoipa::path(
    post,
    path = "/api/submissions/{id}/reset",
    params(
        ("id" = Uuid, Path, description = "Submission session ID")
    ),
    responses(
        (status = 200, description = "Session reset", body = ApiResponse<SubmissionResponseDto>),
        (status = 404, description = "Session not found or expired")
    ),
    tag = "submissions"
)]
pub async fn reset_submission(
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SubmissionResponseDto>>> {
    let submission = service.reset_submission(id).await?;
    Ok(Json(ApiResponse::success(Some(submission), None, None)))
}
