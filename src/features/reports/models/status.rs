use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

/// Canonical report status vocabulary (hyphen spelling)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ReportStatus {
    Pending,
    InProgress,
    Resolved,
}

impl ReportStatus {
    /// Display order used by dashboards and charts
    pub const ALL: [ReportStatus; 3] = [
        ReportStatus::Pending,
        ReportStatus::InProgress,
        ReportStatus::Resolved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::InProgress => "in-progress",
            ReportStatus::Resolved => "resolved",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "Pending",
            ReportStatus::InProgress => "In Progress",
            ReportStatus::Resolved => "Resolved",
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = String;

    /// Accepts the canonical spelling only; legacy values go through [`StatusVocabulary`]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReportStatus::Pending),
            "in-progress" => Ok(ReportStatus::InProgress),
            "resolved" => Ok(ReportStatus::Resolved),
            other => Err(format!("Unknown report status: {}", other)),
        }
    }
}

/// Status as stored, together with its canonical interpretation (if any)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusField {
    pub raw: String,
    pub canonical: Option<ReportStatus>,
}

impl StatusField {
    pub fn canonical(status: ReportStatus) -> Self {
        Self {
            raw: status.as_str().to_string(),
            canonical: Some(status),
        }
    }

    /// The string filters compare against: canonical token when recognized, raw otherwise
    pub fn as_str(&self) -> &str {
        match self.canonical {
            Some(status) => status.as_str(),
            None => &self.raw,
        }
    }

    pub fn is(&self, status: ReportStatus) -> bool {
        self.canonical == Some(status)
    }

    pub fn label(&self) -> String {
        match self.canonical {
            Some(status) => status.label().to_string(),
            None => title_case(&self.raw.replace(['_', '-'], " ")),
        }
    }
}

/// Explicit translation table for the underscore vocabulary written by the
/// first dashboard revision. `rejected` has no canonical counterpart.
const LEGACY_STATUS_MAPPING: &[(&str, ReportStatus)] = &[
    ("in_progress", ReportStatus::InProgress),
    ("under_review", ReportStatus::InProgress),
];

/// Resolves raw status strings coming from the store
#[derive(Debug, Clone, Copy)]
pub struct StatusVocabulary {
    legacy_mapping: bool,
}

impl StatusVocabulary {
    pub fn new(legacy_mapping: bool) -> Self {
        Self { legacy_mapping }
    }

    /// Exact match only; a padded or re-cased value stays unrecognized
    pub fn resolve(&self, raw: &str) -> StatusField {
        let canonical = raw.parse::<ReportStatus>().ok().or_else(|| {
            if !self.legacy_mapping {
                return None;
            }
            LEGACY_STATUS_MAPPING
                .iter()
                .find(|(legacy, _)| *legacy == raw)
                .map(|(legacy, status)| {
                    tracing::debug!("Mapped legacy status '{}' to '{}'", legacy, status);
                    *status
                })
        });

        StatusField {
            raw: raw.to_string(),
            canonical,
        }
    }
}

impl Default for StatusVocabulary {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Upper-case the first letter of every whitespace separated word
pub fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
