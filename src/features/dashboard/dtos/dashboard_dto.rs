use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::dashboard::models::{
    AnalyticsReport, DateRange, Granularity, MapView, PeriodPreset, ReportFilter,
    ReportStatistics,
};
use crate::shared::validation::non_blank;

// ============================================================================
// Query parameters
// ============================================================================

/// Dashboard filter parameters. Every parameter is optional and they combine
/// with AND.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DashboardFilterParams {
    /// Exact area name
    #[param(example = "Koramangala")]
    pub area: Option<String>,

    /// Exact status (`pending`, `in-progress`, `resolved`, or a stored
    /// unrecognized value); `all` is the same as omitting it
    #[param(example = "in-progress")]
    pub status: Option<String>,

    /// Range start, `YYYY-MM-DD` or RFC 3339. Ignored without `date_to`.
    #[param(example = "2024-03-01")]
    pub date_from: Option<String>,

    /// Range end, `YYYY-MM-DD` (whole day) or RFC 3339. Ignored without `date_from`.
    #[param(example = "2024-03-31")]
    pub date_to: Option<String>,

    /// Case-insensitive text matched against area name and address
    pub search: Option<String>,

    /// Preset window relative to now
    pub period: Option<PeriodPreset>,
}

impl DashboardFilterParams {
    pub fn to_filter(&self) -> ReportFilter {
        let date_range = DateRange::from_bounds(self.date_from.as_deref(), self.date_to.as_deref());
        if date_range.is_none() && (self.date_from.is_some() || self.date_to.is_some()) {
            tracing::debug!(
                "Ignoring incomplete date range: {:?} - {:?}",
                self.date_from,
                self.date_to
            );
        }

        ReportFilter {
            area: non_blank(self.area.clone()),
            status: non_blank(self.status.clone()).filter(|s| s != "all"),
            date_range,
            search: non_blank(self.search.clone()),
            period: self.period,
        }
    }
}

/// Analytics options
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AnalyticsParams {
    /// Timeline bucket size (default `weekly`)
    pub granularity: Option<Granularity>,
}

/// Map options
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MapParams {
    /// Center the map on this point at street zoom (requires `focus_lon`)
    pub focus_lat: Option<f64>,
    pub focus_lon: Option<f64>,
}

impl MapParams {
    pub fn focus(&self) -> Option<(f64, f64)> {
        match (self.focus_lat, self.focus_lon) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Statistics of the filtered view
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardStatisticsDto {
    #[serde(flatten)]
    pub statistics: ReportStatistics,
    /// Reports loaded before filtering
    pub source_total: usize,
}

/// Everything the dashboard page needs from one load
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardOverviewDto {
    pub source_total: usize,
    pub filtered_total: usize,
    pub statistics: ReportStatistics,
    pub analytics: AnalyticsReport,
    /// Built from all reports, regardless of the filter
    pub map: MapView,
    pub areas: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_and_all_params_impose_nothing() {
        let params = DashboardFilterParams {
            area: Some("  ".to_string()),
            status: Some("all".to_string()),
            date_from: Some("2024-03-01".to_string()),
            date_to: None,
            search: Some(String::new()),
            period: None,
        };
        assert!(params.to_filter().is_empty());
    }

    #[test]
    fn test_complete_params() {
        let params = DashboardFilterParams {
            area: Some("Koramangala".to_string()),
            status: Some("resolved".to_string()),
            date_from: Some("2024-03-01".to_string()),
            date_to: Some("2024-03-31".to_string()),
            search: None,
            period: Some(PeriodPreset::Month),
        };
        let filter = params.to_filter();
        assert_eq!(filter.area.as_deref(), Some("Koramangala"));
        assert_eq!(filter.status.as_deref(), Some("resolved"));
        assert!(filter.date_range.is_some());
        assert_eq!(filter.period, Some(PeriodPreset::Month));
    }

    #[test]
    fn test_focus_needs_both_coordinates() {
        let half = MapParams {
            focus_lat: Some(12.9),
            focus_lon: None,
        };
        assert_eq!(half.focus(), None);

        let full = MapParams {
            focus_lat: Some(12.9),
            focus_lon: Some(77.6),
        };
        assert_eq!(full.focus(), Some((12.9, 77.6)));
    }
}
