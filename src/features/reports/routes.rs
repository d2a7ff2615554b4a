use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::reports::handlers;
use crate::features::reports::services::ReportService;

/// Create public routes for reports and submission sessions
pub fn routes(report_service: Arc<ReportService>) -> Router {
    Router::new()
        .route("/api/reports", post(handlers::submit_report))
        .route("/api/reports/recent", get(handlers::recent_reports))
        .route("/api/reports/{id}", get(handlers::get_report))
        .route("/api/submissions/{id}", get(handlers::get_submission))
        .route(
            "/api/submissions/{id}/confirm",
            post(handlers::confirm_submission),
        )
        .route(
            "/api/submissions/{id}/reset",
            post(handlers::reset_submission),
        )
        .with_state(report_service)
}
