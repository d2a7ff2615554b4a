use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Where a submitter currently is in the report flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStage {
    Form,
    Confirm,
    Done,
}

impl std::fmt::Display for SubmissionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStage::Form => write!(f, "form"),
            SubmissionStage::Confirm => write!(f, "confirm"),
            SubmissionStage::Done => write!(f, "done"),
        }
    }
}

/// Rejected transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTransition {
    pub from: SubmissionStage,
    pub to: SubmissionStage,
}

impl std::fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cannot move submission from '{}' to '{}'", self.from, self.to)
    }
}

/// One submitter's session. The report row already exists by the time the
/// session reaches `confirm`; the stage only drives messaging.
#[derive(Debug, Clone)]
pub struct SubmissionSession {
    pub id: Uuid,
    pub stage: SubmissionStage,
    pub report_id: Option<String>,
    pub area_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub touched_at: DateTime<Utc>,
}

impl SubmissionSession {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            stage: SubmissionStage::Form,
            report_id: None,
            area_name: None,
            created_at: now,
            touched_at: now,
        }
    }

    /// `form -> confirm`, once the report row has been persisted
    pub fn submitted(
        &mut self,
        report_id: String,
        area_name: String,
        now: DateTime<Utc>,
    ) -> Result<(), InvalidTransition> {
        self.advance(SubmissionStage::Form, SubmissionStage::Confirm, now)?;
        self.report_id = Some(report_id);
        self.area_name = Some(area_name);
        Ok(())
    }

    /// `confirm -> done`
    pub fn confirm(&mut self, now: DateTime<Utc>) -> Result<(), InvalidTransition> {
        self.advance(SubmissionStage::Confirm, SubmissionStage::Done, now)
    }

    /// Back to `form` from any stage ("back to home")
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.stage = SubmissionStage::Form;
        self.report_id = None;
        self.area_name = None;
        self.touched_at = now;
    }

    pub fn is_expired(&self, ttl: chrono::Duration, now: DateTime<Utc>) -> bool {
        now - self.touched_at > ttl
    }

    fn advance(
        &mut self,
        expected: SubmissionStage,
        next: SubmissionStage,
        now: DateTime<Utc>,
    ) -> Result<(), InvalidTransition> {
        if self.stage != expected {
            return Err(InvalidTransition {
                from: self.stage,
                to: next,
            });
        }
        self.stage = next;
        self.touched_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_only_flow() {
        let now = Utc::now();
        let mut session = SubmissionSession::new(now);
        assert_eq!(session.stage, SubmissionStage::Form);

        // cannot skip confirm
        assert_eq!(
            session.confirm(now),
            Err(InvalidTransition {
                from: SubmissionStage::Form,
                to: SubmissionStage::Done
            })
        );

        session
            .submitted("r-1".to_string(), "HSR Layout".to_string(), now)
            .unwrap();
        assert_eq!(session.stage, SubmissionStage::Confirm);
        assert_eq!(session.report_id.as_deref(), Some("r-1"));

        // submitting twice is not allowed
        assert!(session
            .submitted("r-2".to_string(), "HSR Layout".to_string(), now)
            .is_err());

        session.confirm(now).unwrap();
        assert_eq!(session.stage, SubmissionStage::Done);
        assert!(session.confirm(now).is_err());
    }

    #[test]
    fn test_reset_returns_to_form() {
        let now = Utc::now();
        let mut session = SubmissionSession::new(now);
        session
            .submitted("r-1".to_string(), "Indiranagar".to_string(), now)
            .unwrap();
        session.confirm(now).unwrap();

        session.reset(now);
        assert_eq!(session.stage, SubmissionStage::Form);
        assert_eq!(session.report_id, None);
    }

    #[test]
    fn test_expiry_uses_last_touch() {
        let start = Utc::now();
        let mut session = SubmissionSession::new(start);
        let ttl = chrono::Duration::minutes(30);

        assert!(!session.is_expired(ttl, start + chrono::Duration::minutes(29)));
        session.reset(start + chrono::Duration::minutes(20));
        assert!(!session.is_expired(ttl, start + chrono::Duration::minutes(45)));
        assert!(session.is_expired(ttl, start + chrono::Duration::minutes(51)));
    }
}
