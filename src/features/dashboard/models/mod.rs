mod analytics;
mod filter;
mod map;
mod statistics;

pub use analytics::{
    AnalyticsReport, AreaHotspot, Granularity, ResolutionPoint, StatusSlice, TimelinePoint,
};
pub use filter::{DateRange, PeriodPreset, ReportFilter};
pub use map::{Bounds, MapMarker, MapView, MarkerPopup, Viewport};
pub use statistics::ReportStatistics;
