use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::{header::USER_AGENT, HeaderMap, StatusCode},
    Json,
};
use tracing::debug;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::reports::dtos::{
    ReportImage, ReportResponseDto, SubmissionResponseDto, SubmitReportDto, SubmitReportForm,
};
use crate::features::reports::services::ReportService;
use crate::shared::types::ApiResponse;

/// Latest reports for the landing page
#[utoipa::path(
    get,
    path = "/api/reports/recent",
    responses(
        (status = 200, description = "Most recent reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 502, description = "Report store unavailable")
    ),
    tag = "reports"
)]
pub async fn recent_reports(
    State(service): State<Arc<ReportService>>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let reports = service.recent().await?;
    Ok(Json(ApiResponse::success(Some(reports), None, None)))
}

/// Get report by ID
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(
        ("id" = String, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportResponseDto>),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn get_report(
    State(service): State<Arc<ReportService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = service.get(&id).await?;
    Ok(Json(ApiResponse::success(Some(report), None, None)))
}

async fn read_text(field: axum::extract::multipart::Field<'_>, name: &str) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read {} field: {}", name, e)))
}

fn parse_coordinate(value: Option<String>, name: &str) -> Result<f64> {
    let value = value.ok_or_else(|| AppError::BadRequest(format!("{} is required", name)))?;
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| AppError::BadRequest(format!("{} must be a number", name)))
}

/// Submit a pothole report
///
/// Accepts multipart/form-data with the photo in `image` plus the location
/// and duration fields. Responds with the submission session at the
/// `confirm` stage, including the drafted email to the authority.
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body(
        content = SubmitReportForm,
        content_type = "multipart/form-data",
        description = "Pothole photo and report details",
    ),
    responses(
        (status = 201, description = "Report submitted", body = ApiResponse<SubmissionResponseDto>),
        (status = 400, description = "Invalid photo or fields"),
        (status = 404, description = "Submission session not found"),
        (status = 409, description = "Submission session is not at the form stage"),
        (status = 413, description = "Request too large"),
        (status = 502, description = "Report store or image bucket unavailable")
    ),
    tag = "reports"
)]
pub async fn submit_report(
    State(service): State<Arc<ReportService>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<SubmissionResponseDto>>)> {
    let mut image: Option<ReportImage> = None;
    let mut latitude: Option<String> = None;
    let mut longitude: Option<String> = None;
    let mut address = String::new();
    let mut area_name = String::new();
    let mut duration = String::new();
    let mut description: Option<String> = None;
    let mut submission_id: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "image" => {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let file_name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "upload".to_string());
                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read image bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read image data: {}", e))
                })?;

                image = Some(ReportImage {
                    data: data.to_vec(),
                    file_name,
                    content_type,
                });
            }
            "latitude" => latitude = Some(read_text(field, "latitude").await?),
            "longitude" => longitude = Some(read_text(field, "longitude").await?),
            "address" => address = read_text(field, "address").await?,
            "area_name" => area_name = read_text(field, "area_name").await?,
            "duration" => duration = read_text(field, "duration").await?,
            "description" => description = Some(read_text(field, "description").await?),
            "submission_id" => submission_id = Some(read_text(field, "submission_id").await?),
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let dto = SubmitReportDto {
        latitude: parse_coordinate(latitude, "latitude")?,
        longitude: parse_coordinate(longitude, "longitude")?,
        address,
        area_name,
        duration,
        description,
    };

    let submission_id = match submission_id.filter(|s| !s.trim().is_empty()) {
        Some(raw) => Some(
            Uuid::parse_str(raw.trim())
                .map_err(|_| AppError::BadRequest("Invalid submission_id".to_string()))?,
        ),
        None => None,
    };

    let user_agent = headers.get(USER_AGENT).and_then(|v| v.to_str().ok());

    let submission = service
        .submit(dto, image, submission_id, user_agent)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(submission),
            Some("Report submitted".to_string()),
            None,
        )),
    ))
}
