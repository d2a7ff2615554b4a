use chrono::{DateTime, Utc};

use crate::features::dashboard::models::ReportFilter;
use crate::features::reports::models::Report;

/// Reports that passed a filter, plus the size of the set they came from
#[derive(Debug, Clone, Default)]
pub struct FilteredView {
    pub reports: Vec<Report>,
    pub source_total: usize,
}

impl FilteredView {
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

/// Whether a single report satisfies every set predicate
pub fn matches(report: &Report, filter: &ReportFilter, now: DateTime<Utc>) -> bool {
    if let Some(area) = &filter.area {
        if report.area_name != *area {
            return false;
        }
    }

    if let Some(status) = &filter.status {
        if report.status.as_str() != status {
            return false;
        }
    }

    if let Some(range) = &filter.date_range {
        if !range.contains(report.created_at) {
            return false;
        }
    }

    if let Some(search) = &filter.search {
        let needle = search.to_lowercase();
        if !report.area_name.to_lowercase().contains(&needle)
            && !report.address.to_lowercase().contains(&needle)
        {
            return false;
        }
    }

    if let Some(period) = &filter.period {
        if !period.matches(report.created_at, now) {
            return false;
        }
    }

    true
}

/// Keep the reports matching `filter`, in their original order
pub fn apply_filter(reports: &[Report], filter: &ReportFilter, now: DateTime<Utc>) -> FilteredView {
    let matched: Vec<Report> = reports
        .iter()
        .filter(|report| matches(report, filter, now))
        .cloned()
        .collect();

    tracing::debug!(
        "Filter kept {} of {} reports",
        matched.len(),
        reports.len()
    );

    FilteredView {
        reports: matched,
        source_total: reports.len(),
    }
}

/// Sorted, de-duplicated area names for filter pickers
pub fn unique_areas(reports: &[Report]) -> Vec<String> {
    let mut areas: Vec<String> = reports.iter().map(|r| r.area_name.clone()).collect();
    areas.sort();
    areas.dedup();
    areas
}
