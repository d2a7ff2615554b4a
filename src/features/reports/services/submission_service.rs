use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::notifications::dtos::NotificationEmailDto;
use crate::features::reports::dtos::SubmissionResponseDto;
use crate::features::reports::models::{InvalidTransition, SubmissionSession, SubmissionStage};

struct TrackedSubmission {
    session: SubmissionSession,
    notification: Option<NotificationEmailDto>,
    /// A report for this session is being uploaded and inserted
    in_flight: bool,
}

impl TrackedSubmission {
    fn to_dto(&self) -> SubmissionResponseDto {
        SubmissionResponseDto::new(&self.session, self.notification.clone())
    }
}

/// In-process table of submission sessions, one per submitter
pub struct SubmissionTracker {
    sessions: RwLock<HashMap<Uuid, TrackedSubmission>>,
    ttl: chrono::Duration,
}

fn transition_error(e: InvalidTransition) -> AppError {
    AppError::Conflict(format!("Invalid submission step: {}", e))
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Submission session {} not found or expired", id))
}

impl SubmissionTracker {
    pub fn new(ttl: std::time::Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl: chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::hours(1)),
        }
    }

    fn purge_expired(&self, sessions: &mut HashMap<Uuid, TrackedSubmission>, now: DateTime<Utc>) {
        let before = sessions.len();
        sessions.retain(|_, tracked| !tracked.session.is_expired(self.ttl, now));
        let purged = before - sessions.len();
        if purged > 0 {
            tracing::debug!("Purged {} expired submission session(s)", purged);
        }
    }

    /// Claim a reused session for one submission. Fails when the session is
    /// not back at `form` or another submission already holds it; the claim
    /// ends with [`record_submission`](Self::record_submission) or
    /// [`release`](Self::release).
    pub async fn claim(&self, id: Uuid, now: DateTime<Utc>) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        let tracked = sessions
            .get_mut(&id)
            .filter(|t| !t.session.is_expired(self.ttl, now))
            .ok_or_else(|| not_found(id))?;

        if tracked.session.stage != SubmissionStage::Form {
            return Err(transition_error(InvalidTransition {
                from: tracked.session.stage,
                to: SubmissionStage::Confirm,
            }));
        }
        if tracked.in_flight {
            return Err(AppError::Conflict(format!(
                "Submission {} already has a report in progress",
                id
            )));
        }

        tracked.in_flight = true;
        Ok(())
    }

    /// Drop a claim after a failed submission so the form can be retried
    pub async fn release(&self, id: Uuid) {
        if let Some(tracked) = self.sessions.write().await.get_mut(&id) {
            tracked.in_flight = false;
        }
    }

    /// Move a session (new, or an existing one back at `form`) to `confirm`
    /// once its report row exists
    pub async fn record_submission(
        &self,
        existing: Option<Uuid>,
        report_id: String,
        area_name: String,
        notification: NotificationEmailDto,
        now: DateTime<Utc>,
    ) -> Result<SubmissionResponseDto> {
        let mut sessions = self.sessions.write().await;
        self.purge_expired(&mut sessions, now);

        let id = match existing {
            Some(id) => id,
            None => {
                let session = SubmissionSession::new(now);
                let id = session.id;
                sessions.insert(
                    id,
                    TrackedSubmission {
                        session,
                        notification: None,
                        in_flight: false,
                    },
                );
                id
            }
        };

        let tracked = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        tracked
            .session
            .submitted(report_id, area_name, now)
            .map_err(transition_error)?;
        tracked.notification = Some(notification);
        tracked.in_flight = false;

        tracing::info!(
            "Submission {} moved to confirm for report {}",
            id,
            tracked.session.report_id.as_deref().unwrap_or_default()
        );
        Ok(tracked.to_dto())
    }

    pub async fn get(&self, id: Uuid, now: DateTime<Utc>) -> Result<SubmissionResponseDto> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&id)
            .filter(|t| !t.session.is_expired(self.ttl, now))
            .map(TrackedSubmission::to_dto)
            .ok_or_else(|| not_found(id))
    }

    pub async fn confirm(&self, id: Uuid, now: DateTime<Utc>) -> Result<SubmissionResponseDto> {
        let mut sessions = self.sessions.write().await;
        self.purge_expired(&mut sessions, now);

        let tracked = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        tracked.session.confirm(now).map_err(transition_error)?;

        tracing::info!("Submission {} confirmed", id);
        Ok(tracked.to_dto())
    }

    /// Back to the empty form ("back to home")
    pub async fn reset(&self, id: Uuid, now: DateTime<Utc>) -> Result<SubmissionResponseDto> {
        let mut sessions = self.sessions.write().await;
        self.purge_expired(&mut sessions, now);

        let tracked = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        tracked.session.reset(now);
        tracked.notification = None;

        tracing::debug!("Submission {} reset to form", id);
        Ok(tracked.to_dto())
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::notifications::dtos::EmailClient;
    use std::time::Duration;

    fn notification() -> NotificationEmailDto {
        NotificationEmailDto {
            recipient: "comm@bbmp.gov.in".to_string(),
            subject: "Pothole Report - BTM".to_string(),
            body: "Dear BBMP Team,".to_string(),
            mailto_url: "mailto:comm@bbmp.gov.in".to_string(),
            gmail_url: "https://mail.google.com/mail/?view=cm&fs=1".to_string(),
            preferred_client: EmailClient::Gmail,
            preferred_url: "https://mail.google.com/mail/?view=cm&fs=1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_full_flow_and_reset() {
        let tracker = SubmissionTracker::new(Duration::from_secs(600));
        let now = Utc::now();

        let submitted = tracker
            .record_submission(None, "r-1".into(), "BTM".into(), notification(), now)
            .await
            .unwrap();
        assert_eq!(submitted.stage, SubmissionStage::Confirm);
        assert!(submitted.notification.is_some());

        let done = tracker.confirm(submitted.id, now).await.unwrap();
        assert_eq!(done.stage, SubmissionStage::Done);

        // done is terminal until reset
        assert!(matches!(
            tracker.confirm(submitted.id, now).await,
            Err(AppError::Conflict(_))
        ));

        let reset = tracker.reset(submitted.id, now).await.unwrap();
        assert_eq!(reset.stage, SubmissionStage::Form);
        assert!(reset.notification.is_none());
        tracker.claim(submitted.id, now).await.unwrap();

        // reused session goes forward again
        let again = tracker
            .record_submission(Some(submitted.id), "r-2".into(), "BTM".into(), notification(), now)
            .await
            .unwrap();
        assert_eq!(again.id, submitted.id);
        assert_eq!(again.report_id.as_deref(), Some("r-2"));
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let tracker = SubmissionTracker::new(Duration::from_secs(600));
        let now = Utc::now();

        let a = tracker
            .record_submission(None, "a".into(), "BTM".into(), notification(), now)
            .await
            .unwrap();
        let b = tracker
            .record_submission(None, "b".into(), "BTM".into(), notification(), now)
            .await
            .unwrap();

        tracker.confirm(a.id, now).await.unwrap();
        assert_eq!(tracker.get(b.id, now).await.unwrap().stage, SubmissionStage::Confirm);
        assert_eq!(tracker.len().await, 2);
    }

    #[tokio::test]
    async fn test_expired_sessions_disappear() {
        let tracker = SubmissionTracker::new(Duration::from_secs(60));
        let now = Utc::now();

        let s = tracker
            .record_submission(None, "a".into(), "BTM".into(), notification(), now)
            .await
            .unwrap();
        let later = now + chrono::Duration::seconds(61);

        assert!(matches!(tracker.get(s.id, later).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            tracker.confirm(s.id, later).await,
            Err(AppError::NotFound(_))
        ));
        assert_eq!(tracker.len().await, 0);
    }

    #[tokio::test]
    async fn test_session_in_confirm_cannot_take_new_report() {
        let tracker = SubmissionTracker::new(Duration::from_secs(600));
        let now = Utc::now();
        let s = tracker
            .record_submission(None, "a".into(), "BTM".into(), notification(), now)
            .await
            .unwrap();

        assert!(matches!(
            tracker.claim(s.id, now).await,
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            tracker.claim(Uuid::now_v7(), now).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_session_takes_one_report_at_a_time() {
        let tracker = SubmissionTracker::new(Duration::from_secs(600));
        let now = Utc::now();
        let s = tracker
            .record_submission(None, "a".into(), "BTM".into(), notification(), now)
            .await
            .unwrap();
        tracker.reset(s.id, now).await.unwrap();

        tracker.claim(s.id, now).await.unwrap();
        assert!(matches!(
            tracker.claim(s.id, now).await,
            Err(AppError::Conflict(_))
        ));

        // a failed attempt gives the session back
        tracker.release(s.id).await;
        tracker.claim(s.id, now).await.unwrap();

        tracker
            .record_submission(Some(s.id), "b".into(), "BTM".into(), notification(), now)
            .await
            .unwrap();
        tracker.reset(s.id, now).await.unwrap();
        tracker.claim(s.id, now).await.unwrap();
    }
}
