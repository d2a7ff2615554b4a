use chrono::{DateTime, Utc};

use crate::features::dashboard::models::{Bounds, MapMarker, MapView, MarkerPopup, Viewport};
use crate::features::reports::models::{Report, ReportStatus};
use crate::shared::time::relative_age;

pub const FIT_BOUNDS_PADDING: u32 = 50;
pub const FOCUS_ZOOM: u8 = 16;
pub const DEFAULT_ZOOM: u8 = 13;

const UNRECOGNIZED_MARKER_COLOR: &str = "#6b7280";

pub fn marker_color(status: Option<ReportStatus>) -> &'static str {
    match status {
        Some(ReportStatus::Pending) => "#eab308",
        Some(ReportStatus::InProgress) => "#a855f7",
        Some(ReportStatus::Resolved) => "#22c55e",
        None => UNRECOGNIZED_MARKER_COLOR,
    }
}

fn marker(report: &Report, now: DateTime<Utc>) -> Option<MapMarker> {
    let (latitude, longitude) = report.coordinates()?;
    Some(MapMarker {
        id: report.id.clone(),
        latitude,
        longitude,
        status: report.status.as_str().to_string(),
        color: marker_color(report.status.canonical).to_string(),
        popup: MarkerPopup {
            area_name: report.area_name.clone(),
            address: report.address.clone(),
            status_label: report.status.label(),
            image_url: report.image_url.clone(),
            age: relative_age(report.created_at, now),
        },
    })
}

fn bounds_of(markers: &[MapMarker]) -> Option<Bounds> {
    let first = markers.first()?;
    let initial = Bounds {
        south: first.latitude,
        west: first.longitude,
        north: first.latitude,
        east: first.longitude,
    };
    Some(markers.iter().fold(initial, |b, m| Bounds {
        south: b.south.min(m.latitude),
        west: b.west.min(m.longitude),
        north: b.north.max(m.latitude),
        east: b.east.max(m.longitude),
    }))
}

/// Markers for every mappable report. Callers pass the full, unfiltered
/// collection: the map ignores dashboard filters.
pub fn build_map_view(
    reports: &[Report],
    focus: Option<(f64, f64)>,
    default_center: (f64, f64),
    now: DateTime<Utc>,
) -> MapView {
    let markers: Vec<MapMarker> = reports.iter().filter_map(|r| marker(r, now)).collect();

    let viewport = match (focus, bounds_of(&markers)) {
        (Some((latitude, longitude)), _) => Viewport::Center {
            latitude,
            longitude,
            zoom: FOCUS_ZOOM,
        },
        (None, Some(bounds)) => Viewport::FitBounds {
            bounds,
            padding: FIT_BOUNDS_PADDING,
        },
        (None, None) => Viewport::Center {
            latitude: default_center.0,
            longitude: default_center.1,
            zoom: DEFAULT_ZOOM,
        },
    };

    MapView { markers, viewport }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::dashboard::services::analytics::area_hotspots;
    use crate::features::dashboard::services::{apply_filter, compute_statistics};
    use crate::features::dashboard::models::ReportFilter;
    use crate::shared::test_helpers::{fixed_now, RowBuilder};

    const CENTER: (f64, f64) = (12.9716, 77.5946);

    #[test]
    fn test_non_finite_coordinates_excluded_from_map_only() {
        let mut broken = RowBuilder::new("nan").area("Hebbal").report();
        broken.latitude = Some(f64::NAN);
        let reports = vec![
            RowBuilder::new("ok").area("Hebbal").report(),
            broken,
            RowBuilder::new("none").area("Yelahanka").no_coordinates().report(),
        ];

        let map = build_map_view(&reports, None, CENTER, fixed_now());
        let ids: Vec<&str> = map.markers.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["ok"]);

        assert_eq!(compute_statistics(&reports).total, 3);
        let hebbal = area_hotspots(&reports)
            .into_iter()
            .find(|h| h.full_area == "Hebbal")
            .unwrap();
        assert_eq!(hebbal.count, 2);
    }

    #[test]
    fn test_marker_payload() {
        let reports = vec![RowBuilder::new("a")
            .status("in_progress")
            .coordinates(12.95, 77.6)
            .created_at(fixed_now() - chrono::Duration::days(3))
            .report()];

        let map = build_map_view(&reports, None, CENTER, fixed_now());
        let marker = &map.markers[0];
        assert_eq!(marker.color, "#a855f7");
        assert_eq!(marker.status, "in-progress");
        assert_eq!(marker.popup.status_label, "In Progress");
        assert_eq!(marker.popup.age, "3 days ago");
        assert_eq!(marker_color(None), "#6b7280");
    }

    #[test]
    fn test_viewport_modes() {
        let reports = vec![
            RowBuilder::new("a").coordinates(12.90, 77.70).report(),
            RowBuilder::new("b").coordinates(13.05, 77.55).report(),
        ];

        let fitted = build_map_view(&reports, None, CENTER, fixed_now());
        assert_eq!(
            fitted.viewport,
            Viewport::FitBounds {
                bounds: Bounds {
                    south: 12.90,
                    west: 77.55,
                    north: 13.05,
                    east: 77.70,
                },
                padding: 50,
            }
        );

        let focused = build_map_view(&reports, Some((12.93, 77.62)), CENTER, fixed_now());
        assert_eq!(
            focused.viewport,
            Viewport::Center {
                latitude: 12.93,
                longitude: 77.62,
                zoom: 16
            }
        );

        let empty = build_map_view(&[], None, CENTER, fixed_now());
        assert!(empty.markers.is_empty());
        assert_eq!(
            empty.viewport,
            Viewport::Center {
                latitude: 12.9716,
                longitude: 77.5946,
                zoom: 13
            }
        );
    }

    #[test]
    fn test_map_ignores_active_filter() {
        let reports = vec![
            RowBuilder::new("k").area("Koramangala").report(),
            RowBuilder::new("i").area("Indiranagar").report(),
        ];
        let filter = ReportFilter {
            area: Some("Koramangala".to_string()),
            ..Default::default()
        };

        let filtered = apply_filter(&reports, &filter, fixed_now());
        assert_eq!(filtered.len(), 1);

        // the dashboard builds the map from the source collection
        let map = build_map_view(&reports, None, CENTER, fixed_now());
        assert_eq!(map.markers.len(), 2);
    }
}
