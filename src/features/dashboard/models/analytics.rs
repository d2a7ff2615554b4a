use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Bucket size of the timeline chart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    #[default]
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TimelinePoint {
    pub label: String,
    /// First day of the period
    #[schema(value_type = String, format = Date)]
    pub period_start: NaiveDate,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusSlice {
    pub status: String,
    pub count: usize,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AreaHotspot {
    /// Display label, truncated for chart axes
    pub area: String,
    pub full_area: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ResolutionPoint {
    pub week: String,
    #[schema(value_type = String, format = Date)]
    pub week_start: NaiveDate,
    pub avg_days: i64,
    pub resolved_count: usize,
}

/// All chart series for one filtered set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnalyticsReport {
    pub granularity: Granularity,
    pub timeline: Vec<TimelinePoint>,
    pub status_distribution: Vec<StatusSlice>,
    pub hotspots: Vec<AreaHotspot>,
    /// `None` when there are too few resolved reports to say anything
    pub resolution_trend: Option<Vec<ResolutionPoint>>,
}
