use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::admin::{dtos as admin_dtos, handlers as admin_handlers};
use crate::features::dashboard::{
    dtos as dashboard_dtos, handlers as dashboard_handlers, models as dashboard_models,
};
use crate::features::geocoding::{handlers as geocoding_handlers, models as geocoding_models};
use crate::features::notifications::dtos as notifications_dtos;
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Reports
        reports_handlers::recent_reports,
        reports_handlers::get_report,
        reports_handlers::submit_report,
        // Submissions
        reports_handlers::get_submission,
        reports_handlers::confirm_submission,
        reports_handlers::reset_submission,
        // Dashboard
        dashboard_handlers::get_overview,
        dashboard_handlers::get_statistics,
        dashboard_handlers::get_analytics,
        dashboard_handlers::get_map,
        dashboard_handlers::list_reports,
        dashboard_handlers::list_areas,
        // Geocoding
        geocoding_handlers::search_places,
        geocoding_handlers::reverse_geocode,
        // Admin
        admin_handlers::update_status,
        admin_handlers::delete_reports,
        admin_handlers::export_reports,
    ),
    components(
        schemas(
            Meta,
            // Reports
            reports_models::ReportStatus,
            reports_models::SubmissionStage,
            reports_dtos::ReportResponseDto,
            reports_dtos::SubmitReportForm,
            reports_dtos::SubmissionResponseDto,
            notifications_dtos::EmailClient,
            notifications_dtos::NotificationEmailDto,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            ApiResponse<reports_dtos::SubmissionResponseDto>,
            // Dashboard
            dashboard_models::PeriodPreset,
            dashboard_models::Granularity,
            dashboard_models::ReportStatistics,
            dashboard_models::TimelinePoint,
            dashboard_models::StatusSlice,
            dashboard_models::AreaHotspot,
            dashboard_models::ResolutionPoint,
            dashboard_models::AnalyticsReport,
            dashboard_models::MarkerPopup,
            dashboard_models::MapMarker,
            dashboard_models::Bounds,
            dashboard_models::Viewport,
            dashboard_models::MapView,
            dashboard_dtos::DashboardStatisticsDto,
            dashboard_dtos::DashboardOverviewDto,
            ApiResponse<dashboard_dtos::DashboardOverviewDto>,
            ApiResponse<dashboard_dtos::DashboardStatisticsDto>,
            ApiResponse<dashboard_models::AnalyticsReport>,
            ApiResponse<dashboard_models::MapView>,
            ApiResponse<Vec<String>>,
            // Geocoding
            geocoding_models::PlaceSuggestion,
            geocoding_models::ResolvedLocation,
            ApiResponse<Vec<geocoding_models::PlaceSuggestion>>,
            ApiResponse<geocoding_models::ResolvedLocation>,
            // Admin
            admin_dtos::UpdateStatusDto,
            admin_dtos::DeleteReportsDto,
            admin_dtos::ExportReportsDto,
            admin_dtos::BulkActionResultDto,
            ApiResponse<admin_dtos::BulkActionResultDto>,
        )
    ),
    tags(
        (name = "reports", description = "Pothole report submission and lookup"),
        (name = "submissions", description = "Submission sessions (form, confirm, done)"),
        (name = "Dashboard", description = "Public dashboard statistics, analytics and map"),
        (name = "Geocoding", description = "Place search and reverse lookup"),
        (name = "admin", description = "Bulk status update, delete and CSV export"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Pothole Hero API",
        version = "0.1.0",
        description = "API documentation for Pothole Hero",
    )
)]
pub struct ApiDoc;

/// Adds the HTTP basic security scheme used by the admin routes
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "basic_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Basic).build()),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/reports",
            "/api/reports/recent",
            "/api/reports/{id}",
            "/api/submissions/{id}/confirm",
            "/api/dashboard/overview",
            "/api/dashboard/map",
            "/api/geocoding/reverse",
            "/api/admin/reports/export",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{} missing", path);
        }

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("basic_auth"));
    }
}
