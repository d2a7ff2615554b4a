use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::notifications::dtos::NotificationEmailDto;
use crate::features::notifications::{services::ReportEmailContext, EmailComposer};
use crate::features::reports::dtos::{
    ReportImage, ReportResponseDto, SubmissionResponseDto, SubmitReportDto,
};
use crate::features::reports::models::{
    parse_rows, NewReport, Report, ReportStatus, StatusVocabulary,
};
use crate::features::reports::services::SubmissionTracker;
use crate::modules::storage::{generate_object_name, ImageStorage};
use crate::modules::store::ReportStore;
use crate::shared::constants::{ALLOWED_IMAGE_TYPES, MAX_IMAGE_SIZE, RECENT_REPORTS_LIMIT};
use crate::shared::validation::non_blank;

/// Load and validate every report, newest first. A store failure is an
/// error, never an empty list.
pub async fn load_reports(
    store: &dyn ReportStore,
    vocabulary: &StatusVocabulary,
) -> Result<Vec<Report>> {
    let rows = store.select_all().await.map_err(|e| {
        tracing::error!("Failed to load reports: {:?}", e);
        AppError::from(e)
    })?;
    Ok(parse_rows(rows, vocabulary).reports)
}

/// Service for report reads and citizen submissions
pub struct ReportService {
    store: Arc<dyn ReportStore>,
    storage: Arc<dyn ImageStorage>,
    composer: Arc<EmailComposer>,
    submissions: Arc<SubmissionTracker>,
    vocabulary: StatusVocabulary,
}

impl ReportService {
    pub fn new(
        store: Arc<dyn ReportStore>,
        storage: Arc<dyn ImageStorage>,
        composer: Arc<EmailComposer>,
        submissions: Arc<SubmissionTracker>,
        vocabulary: StatusVocabulary,
    ) -> Self {
        Self {
            store,
            storage,
            composer,
            submissions,
            vocabulary,
        }
    }

    /// Newest reports for the landing page feed
    pub async fn recent(&self) -> Result<Vec<ReportResponseDto>> {
        let rows = self.store.select_recent(RECENT_REPORTS_LIMIT).await?;
        let now = Utc::now();
        Ok(parse_rows(rows, &self.vocabulary)
            .reports
            .iter()
            .map(|r| ReportResponseDto::from_report(r, now))
            .collect())
    }

    pub async fn get(&self, id: &str) -> Result<ReportResponseDto> {
        let row = self
            .store
            .select_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;

        let report = row.into_report(&self.vocabulary).map_err(|e| {
            tracing::warn!("Report {} failed validation: {}", id, e);
            AppError::NotFound(format!("Report {} not found", id))
        })?;

        Ok(ReportResponseDto::from_report(&report, Utc::now()))
    }

    fn validate_image(image: Option<ReportImage>) -> Result<ReportImage> {
        let image = image.ok_or_else(|| AppError::BadRequest("Image is required".to_string()))?;

        if image.data.is_empty() {
            return Err(AppError::BadRequest("Image is empty".to_string()));
        }

        if image.data.len() > MAX_IMAGE_SIZE {
            return Err(AppError::BadRequest(format!(
                "Image too large. Maximum size is {} MB",
                MAX_IMAGE_SIZE / 1024 / 1024
            )));
        }

        if !ALLOWED_IMAGE_TYPES.contains(&image.content_type.as_str()) {
            return Err(AppError::BadRequest(format!(
                "Image type '{}' is not allowed. Allowed types: {}",
                image.content_type,
                ALLOWED_IMAGE_TYPES.join(", ")
            )));
        }

        Ok(image)
    }

    fn validate_fields(mut dto: SubmitReportDto) -> Result<SubmitReportDto> {
        if !dto.latitude.is_finite() || !dto.longitude.is_finite() {
            return Err(AppError::Validation(
                "Coordinates must be finite numbers".to_string(),
            ));
        }

        dto.address = dto.address.trim().to_string();
        dto.area_name = dto.area_name.trim().to_string();
        dto.duration = dto.duration.trim().to_string();
        dto.description = non_blank(dto.description);

        dto.validate()?;
        Ok(dto)
    }

    /// Validate, upload the photo, insert the row and draft the email.
    /// The session reaches `confirm` only after the row exists.
    pub async fn submit(
        &self,
        dto: SubmitReportDto,
        image: Option<ReportImage>,
        submission_id: Option<Uuid>,
        user_agent: Option<&str>,
    ) -> Result<SubmissionResponseDto> {
        let image = Self::validate_image(image)?;
        let dto = Self::validate_fields(dto)?;

        let now = Utc::now();
        if let Some(id) = submission_id {
            self.submissions.claim(id, now).await?;
        }

        match self.persist(dto, image, user_agent, now).await {
            Ok((report_id, area_name, notification)) => {
                self.submissions
                    .record_submission(submission_id, report_id, area_name, notification, now)
                    .await
            }
            Err(e) => {
                if let Some(id) = submission_id {
                    self.submissions.release(id).await;
                }
                Err(e)
            }
        }
    }

    /// Upload, insert and compose. Returns the new report id, its area and
    /// the drafted email.
    async fn persist(
        &self,
        dto: SubmitReportDto,
        image: ReportImage,
        user_agent: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(String, String, NotificationEmailDto)> {
        let key = generate_object_name(now, &image.extension());
        self.storage
            .upload(&key, image.data, &image.content_type)
            .await?;
        let image_url = self.storage.public_url(&key);

        let new_report = NewReport {
            image_url: image_url.clone(),
            area_name: dto.area_name,
            address: dto.address,
            latitude: dto.latitude,
            longitude: dto.longitude,
            duration: dto.duration,
            status: ReportStatus::Pending,
            description: dto.description,
        };

        let row = match self.store.insert(&new_report).await {
            Ok(row) => row,
            Err(e) => {
                // Leave no orphaned photo behind
                if let Err(cleanup) = self.storage.delete(&key).await {
                    tracing::warn!("Failed to remove orphaned image '{}': {}", key, cleanup);
                }
                return Err(e.into());
            }
        };

        let report_id = row
            .id_string()
            .ok_or_else(|| AppError::Internal("Store returned a report without id".to_string()))?;

        tracing::info!(
            "Report {} submitted for area '{}'",
            report_id,
            new_report.area_name
        );

        let notification = self.composer.compose(
            &ReportEmailContext {
                area_name: new_report.area_name.clone(),
                address: new_report.address,
                latitude: Some(new_report.latitude),
                longitude: Some(new_report.longitude),
                duration: new_report.duration,
                description: new_report.description,
                image_url,
            },
            user_agent,
        )?;

        Ok((report_id, new_report.area_name, notification))
    }

    pub async fn submission(&self, id: Uuid) -> Result<SubmissionResponseDto> {
        self.submissions.get(id, Utc::now()).await
    }

    pub async fn confirm_submission(&self, id: Uuid) -> Result<SubmissionResponseDto> {
        self.submissions.confirm(id, Utc::now()).await
    }

    pub async fn reset_submission(&self, id: Uuid) -> Result<SubmissionResponseDto> {
        self.submissions.reset(id, Utc::now()).await
    }
}
