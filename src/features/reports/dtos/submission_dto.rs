use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::notifications::dtos::NotificationEmailDto;
use crate::features::reports::models::{SubmissionSession, SubmissionStage};

/// Submission session as seen by the client
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmissionResponseDto {
    pub id: Uuid,
    pub stage: SubmissionStage,
    /// What the client should tell the submitter at this stage
    pub message: String,
    pub report_id: Option<String>,
    pub area_name: Option<String>,
    /// Drafted email, present from `confirm` on
    pub notification: Option<NotificationEmailDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SubmissionResponseDto {
    pub fn new(session: &SubmissionSession, notification: Option<NotificationEmailDto>) -> Self {
        Self {
            id: session.id,
            stage: session.stage,
            message: stage_message(session.stage).to_string(),
            report_id: session.report_id.clone(),
            area_name: session.area_name.clone(),
            notification,
            created_at: session.created_at,
            updated_at: session.touched_at,
        }
    }
}

pub fn stage_message(stage: SubmissionStage) -> &'static str {
    match stage {
        SubmissionStage::Form => "Photograph the pothole, pin its location and submit the report.",
        SubmissionStage::Confirm => {
            "Report submitted. Send the prepared email to notify the authority, then confirm."
        }
        SubmissionStage::Done => "Thank you for reporting! Your report is now on the dashboard.",
    }
}
