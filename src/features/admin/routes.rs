use std::sync::Arc;

use axum::{
    routing::{delete, patch, post},
    Router,
};

use crate::features::admin::handlers;
use crate::features::admin::services::AdminService;

/// Create admin routes (basic auth is layered on in main when configured)
pub fn routes(admin_service: Arc<AdminService>) -> Router {
    Router::new()
        .route("/api/admin/reports", delete(handlers::delete_reports))
        .route("/api/admin/reports/status", patch(handlers::update_status))
        .route("/api/admin/reports/export", post(handlers::export_reports))
        .with_state(admin_service)
}
