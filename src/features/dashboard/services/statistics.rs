use crate::features::dashboard::models::ReportStatistics;
use crate::features::reports::models::{Report, ReportStatus};

/// Count reports per canonical status. Unrecognized statuses only add to `total`.
pub fn compute_statistics(reports: &[Report]) -> ReportStatistics {
    reports.iter().fold(
        ReportStatistics {
            total: reports.len(),
            ..Default::default()
        },
        |mut stats, report| {
            match report.status.canonical {
                Some(ReportStatus::Pending) => stats.pending += 1,
                Some(ReportStatus::InProgress) => stats.in_progress += 1,
                Some(ReportStatus::Resolved) => stats.resolved += 1,
                None => {}
            }
            stats
        },
    )
}
