use async_trait::async_trait;
use thiserror::Error;

use crate::features::reports::models::{NewReport, ReportRow, StatusUpdate};

/// Errors raised by the report store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),

    #[error("Request to store failed: {0}")]
    Request(String),

    #[error("Store responded with {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode store response: {0}")]
    Decode(String),
}

/// Query surface of the report table.
///
/// Implemented by `RestReportStore` (backend REST API) and
/// `InMemoryReportStore` (tests).
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Every row, newest `created_at` first
    async fn select_all(&self) -> Result<Vec<ReportRow>, StoreError>;

    /// The newest `limit` rows
    async fn select_recent(&self, limit: usize) -> Result<Vec<ReportRow>, StoreError>;

    async fn select_by_id(&self, id: &str) -> Result<Option<ReportRow>, StoreError>;

    /// Rows whose id is in `ids`, newest first
    async fn select_by_ids(&self, ids: &[String]) -> Result<Vec<ReportRow>, StoreError>;

    /// Insert and return the stored row
    async fn insert(&self, report: &NewReport) -> Result<ReportRow, StoreError>;

    /// Returns the number of rows changed
    async fn update_status(
        &self,
        ids: &[String],
        update: &StatusUpdate,
    ) -> Result<usize, StoreError>;

    /// Returns the number of rows deleted
    async fn delete_by_ids(&self, ids: &[String]) -> Result<usize, StoreError>;
}
