//! In-memory collaborators and report fixtures for tests

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use fake::faker::address::en::StreetName;
use fake::faker::lorem::en::Sentence;
use fake::Fake;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::features::reports::models::{
    NewReport, Report, ReportRow, ReportStatus, StatusUpdate, StatusVocabulary,
};
use crate::modules::storage::{ImageStorage, StorageError};
use crate::modules::store::{ReportStore, StoreError};

/// Fixed reference instant so date based assertions stay stable
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
}

/// Builder for raw store rows
#[derive(Debug, Clone)]
pub struct RowBuilder {
    row: ReportRow,
}

impl RowBuilder {
    pub fn new(id: &str) -> Self {
        let street: String = StreetName().fake();
        let created_at = fixed_now() - Duration::days(1);
        Self {
            row: ReportRow {
                id: Some(json!(id)),
                image_url: Some(format!("https://cdn.example.com/pothole-images/{}.jpg", id)),
                area_name: Some("Koramangala".to_string()),
                address: Some(format!("{}, Bengaluru", street)),
                latitude: Some(json!(12.9352)),
                longitude: Some(json!(77.6245)),
                duration: Some("1-2-weeks".to_string()),
                status: Some("pending".to_string()),
                description: None,
                created_at: Some(created_at.to_rfc3339()),
                resolved_at: None,
                updated_at: Some(created_at.to_rfc3339()),
            },
        }
    }

    pub fn area(mut self, area: &str) -> Self {
        self.row.area_name = Some(area.to_string());
        self
    }

    pub fn address(mut self, address: &str) -> Self {
        self.row.address = Some(address.to_string());
        self
    }

    pub fn status(mut self, status: &str) -> Self {
        self.row.status = Some(status.to_string());
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.row.created_at = Some(at.to_rfc3339());
        self.row.updated_at = Some(at.to_rfc3339());
        self
    }

    pub fn resolved_at(mut self, at: DateTime<Utc>) -> Self {
        self.row.resolved_at = Some(at.to_rfc3339());
        self
    }

    pub fn coordinates(mut self, lat: f64, lon: f64) -> Self {
        self.row.latitude = Some(json!(lat));
        self.row.longitude = Some(json!(lon));
        self
    }

    pub fn no_coordinates(mut self) -> Self {
        self.row.latitude = None;
        self.row.longitude = None;
        self
    }

    pub fn with_description(mut self) -> Self {
        let text: String = Sentence(4..8).fake();
        self.row.description = Some(text);
        self
    }

    pub fn build(self) -> ReportRow {
        self.row
    }

    pub fn report(self) -> Report {
        self.row
            .into_report(&StatusVocabulary::default())
            .expect("fixture row should be valid")
    }
}

/// Report with a given status, created `days_ago` days before [`fixed_now`]
pub fn report_with_status(id: &str, status: &str, days_ago: i64) -> Report {
    RowBuilder::new(id)
        .status(status)
        .created_at(fixed_now() - Duration::days(days_ago))
        .report()
}

/// Report store backed by a vector, newest first on every read
#[derive(Default)]
pub struct InMemoryReportStore {
    rows: Mutex<Vec<ReportRow>>,
    fail: Mutex<bool>,
}

impl InMemoryReportStore {
    pub fn with_rows(rows: Vec<ReportRow>) -> Self {
        Self {
            rows: Mutex::new(rows),
            fail: Mutex::new(false),
        }
    }

    /// Make every subsequent call fail like an unreachable store
    pub fn fail_requests(&self) {
        *self.fail.lock().unwrap() = true;
    }

    pub fn recover(&self) {
        *self.fail.lock().unwrap() = false;
    }

    pub fn rows(&self) -> Vec<ReportRow> {
        self.rows.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), StoreError> {
        if *self.fail.lock().unwrap() {
            return Err(StoreError::Request("connection refused".to_string()));
        }
        Ok(())
    }

    fn sorted(&self) -> Vec<ReportRow> {
        let mut rows = self.rows();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }
}

fn row_id(row: &ReportRow) -> String {
    row.id_string().unwrap_or_default()
}

#[async_trait]
impl ReportStore for InMemoryReportStore {
    async fn select_all(&self) -> Result<Vec<ReportRow>, StoreError> {
        self.check()?;
        Ok(self.sorted())
    }

    async fn select_recent(&self, limit: usize) -> Result<Vec<ReportRow>, StoreError> {
        self.check()?;
        Ok(self.sorted().into_iter().take(limit).collect())
    }

    async fn select_by_id(&self, id: &str) -> Result<Option<ReportRow>, StoreError> {
        self.check()?;
        Ok(self.rows().into_iter().find(|row| row_id(row) == id))
    }

    async fn select_by_ids(&self, ids: &[String]) -> Result<Vec<ReportRow>, StoreError> {
        self.check()?;
        Ok(self
            .sorted()
            .into_iter()
            .filter(|row| ids.contains(&row_id(row)))
            .collect())
    }

    async fn insert(&self, report: &NewReport) -> Result<ReportRow, StoreError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let now = Utc::now().to_rfc3339();
        let row = ReportRow {
            id: Some(json!(format!("report-{}", rows.len() + 1))),
            image_url: Some(report.image_url.clone()),
            area_name: Some(report.area_name.clone()),
            address: Some(report.address.clone()),
            latitude: Some(json!(report.latitude)),
            longitude: Some(json!(report.longitude)),
            duration: Some(report.duration.clone()),
            status: Some(report.status.as_str().to_string()),
            description: report.description.clone(),
            created_at: Some(now.clone()),
            resolved_at: None,
            updated_at: Some(now),
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn update_status(
        &self,
        ids: &[String],
        update: &StatusUpdate,
    ) -> Result<usize, StoreError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let mut changed = 0;
        for row in rows.iter_mut().filter(|row| ids.contains(&row_id(row))) {
            row.status = Some(update.status.as_str().to_string());
            row.resolved_at = update.resolved_at.map(|at| at.to_rfc3339());
            row.updated_at = Some(update.updated_at.to_rfc3339());
            changed += 1;
        }
        Ok(changed)
    }

    async fn delete_by_ids(&self, ids: &[String]) -> Result<usize, StoreError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|row| !ids.contains(&row_id(row)));
        Ok(before - rows.len())
    }
}

/// Image bucket kept in a map
#[derive(Default)]
pub struct InMemoryImageStorage {
    objects: Mutex<HashMap<String, (Vec<u8>, String)>>,
}

impl InMemoryImageStorage {
    pub const BASE_URL: &'static str = "https://cdn.example.com/pothole-images";

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.objects.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn content_type(&self, key: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|(_, content_type)| content_type.clone())
    }
}

#[async_trait]
impl ImageStorage for InMemoryImageStorage {
    async fn upload(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (data, content_type.to_string()));
        Ok(key.to_string())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", Self::BASE_URL, key)
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }

    fn key_from_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(&format!("{}/", Self::BASE_URL))
            .map(|key| key.to_string())
    }
}

/// Canonical status of a stored row, if any
pub fn stored_status(store: &InMemoryReportStore, id: &str) -> Option<ReportStatus> {
    store
        .rows()
        .into_iter()
        .find(|row| row_id(row) == id)
        .and_then(|row| row.status)
        .and_then(|status| status.parse().ok())
}
