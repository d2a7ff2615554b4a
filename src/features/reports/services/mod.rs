mod report_service;
mod submission_service;

pub use report_service::{load_reports, ReportService};
pub use submission_service::SubmissionTracker;
