use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::reports::models::parse_timestamp;

/// Inclusive `created_at` window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Build a range from two raw bounds. A date-only start means the start of
    /// that day, a date-only end the last instant of that day (UTC). Returns
    /// `None` unless both bounds are present and readable.
    pub fn from_bounds(start: Option<&str>, end: Option<&str>) -> Option<Self> {
        let start = parse_bound(start?, Bound::Start)?;
        let end = parse_bound(end?, Bound::End)?;
        Some(Self { start, end })
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

#[derive(Clone, Copy)]
enum Bound {
    Start,
    End,
}

fn parse_bound(raw: &str, bound: Bound) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let time = match bound {
            Bound::Start => NaiveTime::MIN,
            Bound::End => NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)?,
        };
        return Some(date.and_time(time).and_utc());
    }
    parse_timestamp(raw)
}

/// Quick date presets from the dashboard toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PeriodPreset {
    Today,
    Week,
    Month,
}

impl PeriodPreset {
    /// Age is measured in whole days, floored
    pub fn matches(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let age_days = (now - created_at).num_seconds().div_euclid(86_400);
        match self {
            PeriodPreset::Today => age_days == 0,
            PeriodPreset::Week => age_days <= 7,
            PeriodPreset::Month => age_days <= 30,
        }
    }
}

/// Conjunction of optional predicates; `None` fields impose nothing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportFilter {
    /// Exact `area_name`
    pub area: Option<String>,
    /// Exact status string (canonical token, or the raw value if unrecognized)
    pub status: Option<String>,
    pub date_range: Option<DateRange>,
    /// Case-insensitive substring of `area_name` or `address`
    pub search: Option<String>,
    pub period: Option<PeriodPreset>,
}

impl ReportFilter {
    pub fn is_empty(&self) -> bool {
        self.area.is_none()
            && self.status.is_none()
            && self.date_range.is_none()
            && self.search.is_none()
            && self.period.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_date_only_bounds_cover_whole_days() {
        let range = DateRange::from_bounds(Some("2024-03-01"), Some("2024-03-02")).unwrap();
        assert_eq!(range.start, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        assert!(range.contains(Utc.with_ymd_and_hms(2024, 3, 2, 23, 59, 59).unwrap()));
        assert!(!range.contains(Utc.with_ymd_and_hms(2024, 3, 3, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_half_open_range_is_ignored() {
        assert_eq!(DateRange::from_bounds(Some("2024-03-01"), None), None);
        assert_eq!(DateRange::from_bounds(None, Some("2024-03-01")), None);
        assert_eq!(DateRange::from_bounds(Some("2024-03-01"), Some("  ")), None);
    }

    #[test]
    fn test_timestamp_bounds_are_exact() {
        let range = DateRange::from_bounds(
            Some("2024-03-01T10:00:00Z"),
            Some("2024-03-01T11:00:00Z"),
        )
        .unwrap();
        assert!(range.contains(Utc.with_ymd_and_hms(2024, 3, 1, 11, 0, 0).unwrap()));
        assert!(!range.contains(Utc.with_ymd_and_hms(2024, 3, 1, 11, 0, 1).unwrap()));
    }

    #[test]
    fn test_period_presets() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();

        assert!(PeriodPreset::Today.matches(now - Duration::hours(23), now));
        assert!(!PeriodPreset::Today.matches(now - Duration::hours(25), now));

        assert!(PeriodPreset::Week.matches(now - Duration::days(7), now));
        assert!(!PeriodPreset::Week.matches(now - Duration::days(8), now));

        assert!(PeriodPreset::Month.matches(now - Duration::days(30), now));
        assert!(!PeriodPreset::Month.matches(now - Duration::days(31), now));
    }
}
