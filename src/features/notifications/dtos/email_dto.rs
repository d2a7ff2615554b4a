use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Which compose link the client should open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EmailClient {
    /// Native mail app through a `mailto:` link (mobile)
    Mailto,
    /// Gmail web compose (desktop)
    Gmail,
}

/// Drafted notification to the municipal authority. Nothing is sent by the
/// service; the client opens one of the compose links.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NotificationEmailDto {
    #[schema(example = "comm@bbmp.gov.in")]
    pub recipient: String,
    #[schema(example = "Pothole Report - Koramangala")]
    pub subject: String,
    pub body: String,
    pub mailto_url: String,
    pub gmail_url: String,
    pub preferred_client: EmailClient,
    /// `mailto_url` or `gmail_url`, according to `preferred_client`
    pub preferred_url: String,
}
