use chrono::Utc;
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::dashboard::dtos::{DashboardOverviewDto, DashboardStatisticsDto};
use crate::features::dashboard::models::{
    AnalyticsReport, Granularity, MapView, ReportFilter,
};
use crate::features::dashboard::services::{
    apply_filter, build_analytics, build_map_view, compute_statistics, unique_areas,
};
use crate::features::reports::dtos::ReportResponseDto;
use crate::features::reports::models::{Report, StatusVocabulary};
use crate::features::reports::services::load_reports;
use crate::modules::store::ReportStore;
use crate::shared::types::PaginationQuery;

/// Service for dashboard views. Every call loads the full collection and
/// computes its view in memory.
pub struct DashboardService {
    store: Arc<dyn ReportStore>,
    vocabulary: StatusVocabulary,
    default_center: (f64, f64),
}

impl DashboardService {
    pub fn new(
        store: Arc<dyn ReportStore>,
        vocabulary: StatusVocabulary,
        default_center: (f64, f64),
    ) -> Self {
        Self {
            store,
            vocabulary,
            default_center,
        }
    }

    async fn load(&self) -> Result<Vec<Report>> {
        load_reports(self.store.as_ref(), &self.vocabulary).await
    }

    pub async fn overview(
        &self,
        filter: &ReportFilter,
        granularity: Granularity,
    ) -> Result<DashboardOverviewDto> {
        let reports = self.load().await?;
        let now = Utc::now();
        let view = apply_filter(&reports, filter, now);

        Ok(DashboardOverviewDto {
            source_total: view.source_total,
            filtered_total: view.len(),
            statistics: compute_statistics(&view.reports),
            analytics: build_analytics(&view.reports, granularity),
            map: build_map_view(&reports, None, self.default_center, now),
            areas: unique_areas(&reports),
        })
    }

    pub async fn statistics(&self, filter: &ReportFilter) -> Result<DashboardStatisticsDto> {
        let reports = self.load().await?;
        let view = apply_filter(&reports, filter, Utc::now());

        Ok(DashboardStatisticsDto {
            statistics: compute_statistics(&view.reports),
            source_total: view.source_total,
        })
    }

    pub async fn analytics(
        &self,
        filter: &ReportFilter,
        granularity: Granularity,
    ) -> Result<AnalyticsReport> {
        let reports = self.load().await?;
        let view = apply_filter(&reports, filter, Utc::now());
        Ok(build_analytics(&view.reports, granularity))
    }

    /// All mappable reports; dashboard filters never apply here
    pub async fn map(&self, focus: Option<(f64, f64)>) -> Result<MapView> {
        let reports = self.load().await?;
        Ok(build_map_view(
            &reports,
            focus,
            self.default_center,
            Utc::now(),
        ))
    }

    /// Filtered reports, one page at a time.
    /// Returns (reports, filtered_total)
    pub async fn list_reports(
        &self,
        filter: &ReportFilter,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<ReportResponseDto>, i64)> {
        let reports = self.load().await?;
        let now = Utc::now();
        let view = apply_filter(&reports, filter, now);

        let page = pagination
            .paginate(&view.reports)
            .iter()
            .map(|r| ReportResponseDto::from_report(r, now))
            .collect();

        Ok((page, view.len() as i64))
    }

    pub async fn areas(&self) -> Result<Vec<String>> {
        let reports = self.load().await?;
        Ok(unique_areas(&reports))
    }
}
