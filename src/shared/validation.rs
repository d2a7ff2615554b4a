use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for hyphen-encoded duration tokens
    /// Must be lowercase alphanumeric words joined by single hyphens
    /// - Valid: "less-than-week", "1-2-weeks", "more-than-6-months"
    /// - Invalid: "-week", "week-", "1--2", "1-2 weeks", "Less-than-week"
    pub static ref DURATION_TOKEN_REGEX: Regex =
        Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid duration regex");

    /// User agents that should receive a `mailto:` link instead of web mail
    pub static ref MOBILE_USER_AGENT_REGEX: Regex =
        Regex::new(r"(?i)Android|webOS|iPhone|iPad|iPod|BlackBerry|IEMobile|Opera Mini")
            .expect("valid user agent regex");
}

/// Convert a blank optional string into `None`
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
