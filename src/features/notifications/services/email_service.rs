use minijinja::context;

use crate::core::config::NotificationConfig;
use crate::core::error::Result;
use crate::features::notifications::dtos::{EmailClient, NotificationEmailDto};
use crate::shared::templates::{render_template, REPORT_EMAIL_BODY};
use crate::shared::validation::MOBILE_USER_AGENT_REGEX;

const GMAIL_COMPOSE_URL: &str = "https://mail.google.com/mail/?view=cm&fs=1";

/// Fields interpolated into the email body
#[derive(Debug, Clone)]
pub struct ReportEmailContext {
    pub area_name: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub duration: String,
    pub description: Option<String>,
    pub image_url: String,
}

/// Drafts the report notification for the municipal authority
pub struct EmailComposer {
    recipient: String,
    authority: String,
}

impl EmailComposer {
    pub fn new(config: &NotificationConfig) -> Self {
        Self {
            recipient: config.recipient.clone(),
            authority: config.authority.clone(),
        }
    }

    pub fn subject(&self, area_name: &str) -> String {
        format!("Pothole Report - {}", area_name)
    }

    pub fn body(&self, ctx: &ReportEmailContext) -> Result<String> {
        let description = ctx
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty());

        let body = render_template(
            REPORT_EMAIL_BODY,
            context! {
                authority => &self.authority,
                area_name => &ctx.area_name,
                address => &ctx.address,
                latitude => coordinate_text(ctx.latitude),
                longitude => coordinate_text(ctx.longitude),
                duration => ctx.duration.replace('-', " "),
                description => description,
                image_url => &ctx.image_url,
            },
        )?;

        Ok(body)
    }

    pub fn mailto_url(&self, subject: &str, body: &str) -> String {
        format!(
            "mailto:{}?subject={}&body={}",
            self.recipient,
            urlencoding::encode(subject),
            urlencoding::encode(body)
        )
    }

    pub fn gmail_url(&self, subject: &str, body: &str) -> String {
        format!(
            "{}&to={}&su={}&body={}",
            GMAIL_COMPOSE_URL,
            self.recipient,
            urlencoding::encode(subject),
            urlencoding::encode(body)
        )
    }

    /// Mobile user agents get the native mail app, everything else web mail
    pub fn preferred_client(user_agent: Option<&str>) -> EmailClient {
        match user_agent {
            Some(ua) if MOBILE_USER_AGENT_REGEX.is_match(ua) => EmailClient::Mailto,
            _ => EmailClient::Gmail,
        }
    }

    pub fn compose(
        &self,
        ctx: &ReportEmailContext,
        user_agent: Option<&str>,
    ) -> Result<NotificationEmailDto> {
        let subject = self.subject(&ctx.area_name);
        let body = self.body(ctx)?;
        let mailto_url = self.mailto_url(&subject, &body);
        let gmail_url = self.gmail_url(&subject, &body);

        let preferred_client = Self::preferred_client(user_agent);
        let preferred_url = match preferred_client {
            EmailClient::Mailto => mailto_url.clone(),
            EmailClient::Gmail => gmail_url.clone(),
        };

        tracing::debug!(
            "Composed notification for '{}' ({:?})",
            ctx.area_name,
            preferred_client
        );

        Ok(NotificationEmailDto {
            recipient: self.recipient.clone(),
            subject,
            body,
            mailto_url,
            gmail_url,
            preferred_client,
            preferred_url,
        })
    }
}

fn coordinate_text(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => v.to_string(),
        _ => "unknown".to_string(),
    }
}
