use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::core::error::AppError;
use crate::features::dashboard::dtos::*;
use crate::features::dashboard::models::{AnalyticsReport, MapView};
use crate::features::dashboard::services::DashboardService;
use crate::features::reports::dtos::ReportResponseDto;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

// ============================================================================
// Overview
// ============================================================================

/// Statistics, analytics, map and area list in one response
#[utoipa::path(
    get,
    path = "/api/dashboard/overview",
    tag = "Dashboard",
    params(DashboardFilterParams, AnalyticsParams),
    responses(
        (status = 200, description = "Dashboard overview", body = ApiResponse<DashboardOverviewDto>),
        (status = 502, description = "Report store unavailable")
    )
)]
pub async fn get_overview(
    State(service): State<Arc<DashboardService>>,
    Query(filter): Query<DashboardFilterParams>,
    Query(options): Query<AnalyticsParams>,
) -> Result<Json<ApiResponse<DashboardOverviewDto>>, AppError> {
    let overview = service
        .overview(&filter.to_filter(), options.granularity.unwrap_or_default())
        .await?;
    Ok(Json(ApiResponse::success(Some(overview), None, None)))
}

// ============================================================================
// Statistics & analytics
// ============================================================================

/// Status counts of the filtered reports
#[utoipa::path(
    get,
    path = "/api/dashboard/statistics",
    tag = "Dashboard",
    params(DashboardFilterParams),
    responses(
        (status = 200, description = "Report statistics", body = ApiResponse<DashboardStatisticsDto>),
        (status = 502, description = "Report store unavailable")
    )
)]
pub async fn get_statistics(
    State(service): State<Arc<DashboardService>>,
    Query(filter): Query<DashboardFilterParams>,
) -> Result<Json<ApiResponse<DashboardStatisticsDto>>, AppError> {
    let statistics = service.statistics(&filter.to_filter()).await?;
    Ok(Json(ApiResponse::success(Some(statistics), None, None)))
}

/// Timeline, status distribution, hotspots and resolution trend
#[utoipa::path(
    get,
    path = "/api/dashboard/analytics",
    tag = "Dashboard",
    params(DashboardFilterParams, AnalyticsParams),
    responses(
        (status = 200, description = "Chart series", body = ApiResponse<AnalyticsReport>),
        (status = 502, description = "Report store unavailable")
    )
)]
pub async fn get_analytics(
    State(service): State<Arc<DashboardService>>,
    Query(filter): Query<DashboardFilterParams>,
    Query(options): Query<AnalyticsParams>,
) -> Result<Json<ApiResponse<AnalyticsReport>>, AppError> {
    let analytics = service
        .analytics(&filter.to_filter(), options.granularity.unwrap_or_default())
        .await?;
    Ok(Json(ApiResponse::success(Some(analytics), None, None)))
}

// ============================================================================
// Map
// ============================================================================

/// Markers for every report with usable coordinates
#[utoipa::path(
    get,
    path = "/api/dashboard/map",
    tag = "Dashboard",
    params(MapParams),
    responses(
        (status = 200, description = "Map markers and viewport", body = ApiResponse<MapView>),
        (status = 502, description = "Report store unavailable")
    )
)]
pub async fn get_map(
    State(service): State<Arc<DashboardService>>,
    Query(params): Query<MapParams>,
) -> Result<Json<ApiResponse<MapView>>, AppError> {
    let map = service.map(params.focus()).await?;
    Ok(Json(ApiResponse::success(Some(map), None, None)))
}

// ============================================================================
// Reports list
// ============================================================================

/// Filtered reports with pagination
#[utoipa::path(
    get,
    path = "/api/dashboard/reports",
    tag = "Dashboard",
    params(DashboardFilterParams, PaginationQuery),
    responses(
        (status = 200, description = "Paginated reports list", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 502, description = "Report store unavailable")
    )
)]
pub async fn list_reports(
    State(service): State<Arc<DashboardService>>,
    Query(filter): Query<DashboardFilterParams>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>, AppError> {
    let (reports, total) = service
        .list_reports(&filter.to_filter(), &pagination)
        .await?;
    Ok(Json(ApiResponse::success(
        Some(reports),
        None,
        Some(Meta { total }),
    )))
}

/// Distinct area names for the area filter
#[utoipa::path(
    get,
    path = "/api/dashboard/areas",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Sorted area names", body = ApiResponse<Vec<String>>),
        (status = 502, description = "Report store unavailable")
    )
)]
pub async fn list_areas(
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<ApiResponse<Vec<String>>>, AppError> {
    let areas = service.areas().await?;
    Ok(Json(ApiResponse::success(Some(areas), None, None)))
}
