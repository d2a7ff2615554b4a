use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::admin::dtos::*;
use crate::features::admin::services::AdminService;
use crate::shared::types::ApiResponse;

/// Set the status of the selected reports
#[utoipa::path(
    patch,
    path = "/api/admin/reports/status",
    request_body = UpdateStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<BulkActionResultDto>),
        (status = 400, description = "Empty selection or unknown status"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Report store unavailable")
    ),
    tag = "admin",
    security(
        ("basic_auth" = [])
    )
)]
pub async fn update_status(
    State(service): State<Arc<AdminService>>,
    AppJson(dto): AppJson<UpdateStatusDto>,
) -> Result<Json<ApiResponse<BulkActionResultDto>>> {
    dto.validate()?;
    let result = service.update_status(&dto.ids, dto.status).await?;
    let message = format!("Updated status for {} report(s)", result.affected);
    Ok(Json(ApiResponse::success(Some(result), Some(message), None)))
}

/// Delete the selected reports
#[utoipa::path(
    delete,
    path = "/api/admin/reports",
    request_body = DeleteReportsDto,
    responses(
        (status = 200, description = "Reports deleted", body = ApiResponse<BulkActionResultDto>),
        (status = 400, description = "Empty selection"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Report store unavailable")
    ),
    tag = "admin",
    security(
        ("basic_auth" = [])
    )
)]
pub async fn delete_reports(
    State(service): State<Arc<AdminService>>,
    AppJson(dto): AppJson<DeleteReportsDto>,
) -> Result<Json<ApiResponse<BulkActionResultDto>>> {
    dto.validate()?;
    let result = service.delete_reports(&dto.ids, dto.delete_images).await?;
    let message = format!("Deleted {} report(s)", result.affected);
    Ok(Json(ApiResponse::success(Some(result), Some(message), None)))
}

/// Download the selected reports as CSV
#[utoipa::path(
    post,
    path = "/api/admin/reports/export",
    request_body = ExportReportsDto,
    responses(
        (status = 200, description = "CSV attachment", content_type = "text/csv", body = String),
        (status = 400, description = "Empty selection"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Report store unavailable")
    ),
    tag = "admin",
    security(
        ("basic_auth" = [])
    )
)]
pub async fn export_reports(
    State(service): State<Arc<AdminService>>,
    AppJson(dto): AppJson<ExportReportsDto>,
) -> Result<Response> {
    dto.validate()?;
    let export = service.export_csv(&dto.ids).await?;
    tracing::info!("Exported {} report(s) to {}", export.rows, export.filename);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.filename),
            ),
        ],
        export.content,
    )
        .into_response())
}
