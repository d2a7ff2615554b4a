use chrono::{Datelike, Duration, Months, NaiveDate};
use std::collections::{BTreeMap, HashMap};

use crate::features::dashboard::models::{
    AnalyticsReport, AreaHotspot, Granularity, ResolutionPoint, StatusSlice, TimelinePoint,
};
use crate::features::reports::models::{Report, ReportStatus};

/// Number of areas shown in the hotspot chart
pub const HOTSPOT_LIMIT: usize = 10;

/// Area labels longer than this are cut for chart axes
pub const HOTSPOT_LABEL_CHARS: usize = 20;

/// Fewer qualifying resolutions than this and the trend is not shown
pub const MIN_RESOLVED_FOR_TREND: usize = 5;

/// Chart colour per canonical status
pub fn status_chart_color(status: ReportStatus) -> &'static str {
    match status {
        ReportStatus::Pending => "#FCD34D",
        ReportStatus::InProgress => "#3B82F6",
        ReportStatus::Resolved => "#10B981",
    }
}

/// Monday of the ISO week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn period_start(date: NaiveDate, granularity: Granularity) -> NaiveDate {
    match granularity {
        Granularity::Daily => date,
        Granularity::Weekly => week_start(date),
        Granularity::Monthly => date.with_day(1).unwrap_or(date),
    }
}

fn next_period(start: NaiveDate, granularity: Granularity) -> Option<NaiveDate> {
    match granularity {
        Granularity::Daily => start.succ_opt(),
        Granularity::Weekly => start.checked_add_signed(Duration::days(7)),
        Granularity::Monthly => start.checked_add_months(Months::new(1)),
    }
}

fn period_label(start: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Daily => start.format("%b %d").to_string(),
        Granularity::Weekly => format!("Week {}", start.iso_week().week()),
        Granularity::Monthly => start.format("%b %Y").to_string(),
    }
}

/// Report counts for every period between the earliest and latest report,
/// zero-filled
pub fn timeline(reports: &[Report], granularity: Granularity) -> Vec<TimelinePoint> {
    let dates: Vec<NaiveDate> = reports.iter().map(|r| r.created_at.date_naive()).collect();
    let (Some(first), Some(last)) = (dates.iter().min(), dates.iter().max()) else {
        return Vec::new();
    };

    let mut counts: HashMap<NaiveDate, usize> = HashMap::new();
    for date in &dates {
        *counts.entry(period_start(*date, granularity)).or_insert(0) += 1;
    }

    let end = period_start(*last, granularity);
    let mut cursor = Some(period_start(*first, granularity));
    let mut points = Vec::new();

    while let Some(start) = cursor.filter(|start| *start <= end) {
        points.push(TimelinePoint {
            label: period_label(start, granularity),
            period_start: start,
            count: counts.get(&start).copied().unwrap_or(0),
        });
        cursor = next_period(start, granularity);
    }

    points
}

/// Fixed order: Pending, In Progress, Resolved
pub fn status_distribution(reports: &[Report]) -> Vec<StatusSlice> {
    ReportStatus::ALL
        .iter()
        .map(|status| StatusSlice {
            status: status.label().to_string(),
            count: reports.iter().filter(|r| r.status.is(*status)).count(),
            color: status_chart_color(*status).to_string(),
        })
        .collect()
}

fn hotspot_label(area: &str) -> String {
    if area.chars().count() > HOTSPOT_LABEL_CHARS {
        let cut: String = area.chars().take(HOTSPOT_LABEL_CHARS).collect();
        format!("{}...", cut)
    } else {
        area.to_string()
    }
}

/// Busiest areas, most reports first. Ties keep the order areas were first seen.
pub fn area_hotspots(reports: &[Report]) -> Vec<AreaHotspot> {
    let mut order: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for report in reports {
        let area = report.area_name.as_str();
        match index.get(area) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(area, order.len());
                order.push((area, 1));
            }
        }
    }

    // stable: equal counts stay in first-seen order
    order.sort_by(|a, b| b.1.cmp(&a.1));

    order
        .into_iter()
        .take(HOTSPOT_LIMIT)
        .map(|(area, count)| AreaHotspot {
            area: hotspot_label(area),
            full_area: area.to_string(),
            count,
        })
        .collect()
}

/// Mean days to resolve, grouped by the week the report was resolved in.
/// `None` when fewer than [`MIN_RESOLVED_FOR_TREND`] reports qualify.
pub fn resolution_trend(reports: &[Report]) -> Option<Vec<ResolutionPoint>> {
    let durations: Vec<(NaiveDate, i64)> = reports
        .iter()
        .filter(|r| r.is_resolved())
        .filter_map(|r| {
            let resolved_at = r.resolved_at?;
            if resolved_at < r.created_at {
                return None;
            }
            let days = (resolved_at - r.created_at).num_days();
            Some((week_start(resolved_at.date_naive()), days))
        })
        .collect();

    if durations.len() < MIN_RESOLVED_FOR_TREND {
        return None;
    }

    let mut weeks: BTreeMap<NaiveDate, (i64, usize)> = BTreeMap::new();
    for (week, days) in durations {
        let entry = weeks.entry(week).or_insert((0, 0));
        entry.0 += days;
        entry.1 += 1;
    }

    Some(
        weeks
            .into_iter()
            .map(|(week, (total, count))| ResolutionPoint {
                week: week.format("%b %d").to_string(),
                week_start: week,
                avg_days: (total as f64 / count as f64).round() as i64,
                resolved_count: count,
            })
            .collect(),
    )
}

pub fn build_analytics(reports: &[Report], granularity: Granularity) -> AnalyticsReport {
    AnalyticsReport {
        granularity,
        timeline: timeline(reports, granularity),
        status_distribution: status_distribution(reports),
        hotspots: area_hotspots(reports),
        resolution_trend: resolution_trend(reports),
    }
}
