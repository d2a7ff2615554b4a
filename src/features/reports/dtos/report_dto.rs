use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::reports::models::Report;
use crate::shared::time::relative_age;
use crate::shared::validation::DURATION_TOKEN_REGEX;

/// Response DTO for report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponseDto {
    pub id: String,
    pub image_url: String,
    pub area_name: String,
    pub address: String,
    /// Null when missing or not a finite number
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[schema(example = "1-2-weeks")]
    pub duration: String,
    #[schema(example = "1 2 Weeks")]
    pub duration_label: String,
    /// Canonical status, or the stored value when it has no canonical equivalent
    #[schema(example = "in-progress")]
    pub status: String,
    #[schema(example = "In Progress")]
    pub status_label: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
    #[schema(example = "3 days ago")]
    pub reported_ago: String,
}

impl ReportResponseDto {
    pub fn from_report(report: &Report, now: DateTime<Utc>) -> Self {
        Self {
            id: report.id.clone(),
            image_url: report.image_url.clone(),
            area_name: report.area_name.clone(),
            address: report.address.clone(),
            latitude: report.latitude.filter(|v| v.is_finite()),
            longitude: report.longitude.filter(|v| v.is_finite()),
            duration: report.duration.clone(),
            duration_label: report.duration_label(),
            status: report.status.as_str().to_string(),
            status_label: report.status.label(),
            description: report.description.clone(),
            created_at: report.created_at,
            resolved_at: report.resolved_at,
            updated_at: report.updated_at,
            reported_ago: relative_age(report.created_at, now),
        }
    }
}

/// Submit report form for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler reads axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct SubmitReportForm {
    /// Photo of the pothole (jpeg, png, webp, gif or heic, max 10 MB)
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub image: String,
    #[schema(example = 12.9352)]
    pub latitude: f64,
    #[schema(example = 77.6245)]
    pub longitude: f64,
    #[schema(example = "80 Feet Rd, Koramangala 4th Block")]
    pub address: String,
    #[schema(example = "Koramangala")]
    pub area_name: String,
    #[schema(example = "1-2-weeks")]
    pub duration: String,
    pub description: Option<String>,
    /// Existing submission session to reuse after a reset
    pub submission_id: Option<String>,
}

/// Text fields of a report submission, validated before any store round-trip
#[derive(Debug, Clone, Validate)]
pub struct SubmitReportDto {
    #[validate(range(
        min = -90.0,
        max = 90.0,
        message = "Latitude must be between -90 and 90"
    ))]
    pub latitude: f64,

    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    pub longitude: f64,

    #[validate(length(min = 1, max = 500, message = "Address is required"))]
    pub address: String,

    #[validate(length(min = 1, max = 200, message = "Area name is required"))]
    pub area_name: String,

    #[validate(regex(
        path = *DURATION_TOKEN_REGEX,
        message = "Duration must be a hyphenated token such as 'less-than-week'"
    ))]
    pub duration: String,

    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    pub description: Option<String>,
}

/// Photo attached to a submission
#[derive(Debug, Clone)]
pub struct ReportImage {
    pub data: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
}

impl ReportImage {
    /// Extension taken from the file name, falling back to the MIME subtype
    pub fn extension(&self) -> String {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or_else(|| match self.content_type.as_str() {
                "image/jpeg" => "jpg".to_string(),
                other => other.rsplit('/').next().unwrap_or("bin").to_string(),
            })
    }
}
