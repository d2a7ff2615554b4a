mod analytics;
mod dashboard_service;
mod filter_engine;
mod map_view;
mod statistics;

pub use analytics::build_analytics;
pub use dashboard_service::DashboardService;
pub use filter_engine::{apply_filter, unique_areas};
pub use map_view::build_map_view;
pub use statistics::compute_statistics;
