use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::core::error::AppError;
use crate::features::geocoding::dtos::{ReverseParams, SearchParams};
use crate::features::geocoding::models::{PlaceSuggestion, ResolvedLocation};
use crate::features::geocoding::services::GeocodingService;
use crate::shared::types::ApiResponse;

/// Place suggestions for the location search box
#[utoipa::path(
    get,
    path = "/api/geocoding/search",
    tag = "Geocoding",
    params(SearchParams),
    responses(
        (status = 200, description = "Suggestions inside the city, possibly empty", body = ApiResponse<Vec<PlaceSuggestion>>)
    )
)]
pub async fn search_places(
    State(service): State<Arc<GeocodingService>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ApiResponse<Vec<PlaceSuggestion>>>, AppError> {
    let places = service.search(&params.q, params.bias()).await;
    Ok(Json(ApiResponse::success(Some(places), None, None)))
}

/// Address and area name for a picked point
#[utoipa::path(
    get,
    path = "/api/geocoding/reverse",
    tag = "Geocoding",
    params(ReverseParams),
    responses(
        (status = 200, description = "Resolved location; `degraded` when the lookup failed", body = ApiResponse<ResolvedLocation>),
        (status = 400, description = "Coordinates out of range")
    )
)]
pub async fn reverse_geocode(
    State(service): State<Arc<GeocodingService>>,
    Query(params): Query<ReverseParams>,
) -> Result<Json<ApiResponse<ResolvedLocation>>, AppError> {
    params.validate()?;
    let location = service.reverse(params.lat, params.lon).await;
    Ok(Json(ApiResponse::success(Some(location), None, None)))
}
