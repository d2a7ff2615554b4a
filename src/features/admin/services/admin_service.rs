use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::error::{AppError, Result};
use crate::features::admin::dtos::{distinct_ids, BulkActionResultDto};
use crate::features::admin::services::csv_export::{export_filename, records_to_csv, ExportRecord};
use crate::features::reports::models::{ReportRow, ReportStatus, StatusUpdate, StatusVocabulary};
use crate::modules::storage::ImageStorage;
use crate::modules::store::ReportStore;

/// A rendered CSV download
pub struct CsvExport {
    pub filename: String,
    pub content: Vec<u8>,
    pub rows: usize,
}

/// Administrative bulk actions over a selection of report ids
pub struct AdminService {
    store: Arc<dyn ReportStore>,
    storage: Arc<dyn ImageStorage>,
    vocabulary: StatusVocabulary,
}

impl AdminService {
    pub fn new(
        store: Arc<dyn ReportStore>,
        storage: Arc<dyn ImageStorage>,
        vocabulary: StatusVocabulary,
    ) -> Self {
        Self {
            store,
            storage,
            vocabulary,
        }
    }

    fn selection(ids: &[String]) -> Result<Vec<String>> {
        let ids = distinct_ids(ids);
        if ids.is_empty() {
            return Err(AppError::Validation("No reports selected".to_string()));
        }
        Ok(ids)
    }

    pub async fn update_status(
        &self,
        ids: &[String],
        status: ReportStatus,
    ) -> Result<BulkActionResultDto> {
        let ids = Self::selection(ids)?;
        let update = StatusUpdate::new(status, Utc::now());

        let affected = self.store.update_status(&ids, &update).await.map_err(|e| {
            tracing::error!("Failed to update status of {} reports: {:?}", ids.len(), e);
            AppError::from(e)
        })?;

        info!(
            "Set status '{}' on {} of {} selected reports",
            status,
            affected,
            ids.len()
        );

        Ok(BulkActionResultDto {
            requested: ids.len(),
            affected,
            images_deleted: None,
        })
    }

    /// Deletes the rows, then (optionally) their photos. A photo that cannot
    /// be removed is logged and left behind.
    pub async fn delete_reports(
        &self,
        ids: &[String],
        delete_images: bool,
    ) -> Result<BulkActionResultDto> {
        let ids = Self::selection(ids)?;

        let image_urls: Vec<String> = if delete_images {
            self.store
                .select_by_ids(&ids)
                .await?
                .into_iter()
                .filter_map(|row| row.image_url)
                .collect()
        } else {
            Vec::new()
        };

        let affected = self.store.delete_by_ids(&ids).await.map_err(|e| {
            tracing::error!("Failed to delete {} reports: {:?}", ids.len(), e);
            AppError::from(e)
        })?;

        info!("Deleted {} of {} selected reports", affected, ids.len());

        let images_deleted = if delete_images {
            let mut deleted = 0;
            for url in &image_urls {
                let Some(key) = self.storage.key_from_url(url) else {
                    warn!("Image URL is outside the bucket, skipping: {}", url);
                    continue;
                };
                match self.storage.delete(&key).await {
                    Ok(()) => deleted += 1,
                    Err(e) => warn!("Failed to delete image {}: {:?}", key, e),
                }
            }
            Some(deleted)
        } else {
            None
        };

        Ok(BulkActionResultDto {
            requested: ids.len(),
            affected,
            images_deleted,
        })
    }

    /// Rows follow the order of the selection; ids with no stored report are
    /// skipped. A stored row that fails validation is still exported with
    /// its raw values.
    pub async fn export_csv(&self, ids: &[String]) -> Result<CsvExport> {
        let ids = Self::selection(ids)?;

        let rows = self.store.select_by_ids(&ids).await.map_err(|e| {
            tracing::error!("Failed to load {} reports for export: {:?}", ids.len(), e);
            AppError::from(e)
        })?;

        let mut by_id: HashMap<String, ReportRow> = rows
            .into_iter()
            .filter_map(|row| row.id_string().map(|id| (id, row)))
            .collect();

        let records: Vec<ExportRecord> = ids
            .iter()
            .filter_map(|id| by_id.remove(id))
            .map(|row| match row.clone().into_report(&self.vocabulary) {
                Ok(report) => ExportRecord::from(&report),
                Err(reason) => {
                    warn!(
                        "Exporting report {} with stored values: {}",
                        row.id_string().unwrap_or_default(),
                        reason
                    );
                    ExportRecord::from_row(&row)
                }
            })
            .collect();

        if records.len() < ids.len() {
            warn!(
                "Exporting {} of {} selected reports; the rest were not found",
                records.len(),
                ids.len()
            );
        }

        let content = records_to_csv(&records).map_err(|e| {
            tracing::error!("Failed to render CSV export: {:?}", e);
            AppError::Internal(e.to_string())
        })?;

        Ok(CsvExport {
            filename: export_filename(Utc::now()),
            content,
            rows: records.len(),
        })
    }
}
