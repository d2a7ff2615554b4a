use chrono::{DateTime, Datelike, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::status::{title_case, ReportStatus, StatusField, StatusVocabulary};

/// Validated pothole report
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub id: String,
    pub image_url: String,
    pub area_name: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub duration: String,
    pub status: StatusField,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl Report {
    /// Both coordinates, only when present and finite
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.status.is(ReportStatus::Resolved)
    }

    pub fn duration_label(&self) -> String {
        duration_label(&self.duration)
    }
}

/// `1-2-weeks` -> `1 2 Weeks`
pub fn duration_label(duration: &str) -> String {
    title_case(&duration.replace('-', " "))
}

/// Row exactly as the store returns it. Nothing is trusted until
/// [`ReportRow::into_report`] has checked it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub area_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub latitude: Option<Value>,
    #[serde(default)]
    pub longitude: Option<Value>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub resolved_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Why a row was turned away at the fetch boundary
#[derive(Debug, Error, PartialEq)]
pub enum RowRejection {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("invalid timestamp in '{field}': {value}")]
    InvalidTimestamp { field: &'static str, value: String },

    #[error("'{field}' outside the accepted years: {value}")]
    ImplausibleTimestamp { field: &'static str, value: String },
}

/// Years a stored `created_at` may fall in. Anything else is a corrupt row and
/// would stretch every zero-filled timeline across centuries.
pub const PLAUSIBLE_YEARS: std::ops::RangeInclusive<i32> = 2000..=2100;

impl ReportRow {
    pub fn parsed_latitude(&self) -> Option<f64> {
        coordinate(self.latitude.as_ref())
    }

    pub fn parsed_longitude(&self) -> Option<f64> {
        coordinate(self.longitude.as_ref())
    }

    pub fn id_string(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn into_report(self, vocabulary: &StatusVocabulary) -> Result<Report, RowRejection> {
        let id = self.id_string().ok_or(RowRejection::MissingField("id"))?;
        let image_url = required(self.image_url, "image_url")?;
        let area_name = required(self.area_name, "area_name")?;
        let address = required(self.address, "address")?;

        let created_raw = self
            .created_at
            .ok_or(RowRejection::MissingField("created_at"))?;
        let created_at = parse_timestamp(&created_raw).ok_or(RowRejection::InvalidTimestamp {
            field: "created_at",
            value: created_raw.clone(),
        })?;
        if !PLAUSIBLE_YEARS.contains(&created_at.year()) {
            return Err(RowRejection::ImplausibleTimestamp {
                field: "created_at",
                value: created_raw,
            });
        }

        let resolved_at = match self.resolved_at.filter(|v| !v.trim().is_empty()) {
            Some(raw) => Some(parse_timestamp(&raw).ok_or(RowRejection::InvalidTimestamp {
                field: "resolved_at",
                value: raw.clone(),
            })?),
            None => None,
        };

        let updated_at = match self.updated_at.filter(|v| !v.trim().is_empty()) {
            Some(raw) => parse_timestamp(&raw).ok_or(RowRejection::InvalidTimestamp {
                field: "updated_at",
                value: raw.clone(),
            })?,
            None => created_at,
        };

        let status = vocabulary.resolve(self.status.as_deref().unwrap_or_default());

        Ok(Report {
            id,
            image_url,
            area_name,
            address,
            latitude: coordinate(self.latitude.as_ref()),
            longitude: coordinate(self.longitude.as_ref()),
            duration: self.duration.unwrap_or_default().trim().to_string(),
            status,
            description: self.description.filter(|d| !d.trim().is_empty()),
            created_at,
            resolved_at,
            updated_at,
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, RowRejection> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(RowRejection::MissingField(field))
}

/// Numbers pass through (NaN included once inside f64), numeric strings are parsed
fn coordinate(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// RFC 3339, or a zone-less timestamp which the store writes in UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    // Postgres text output: "2024-03-01 10:15:00+00"
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Result of converting a batch of rows
#[derive(Debug, Default)]
pub struct ParsedReports {
    pub reports: Vec<Report>,
    pub rejected: usize,
}

/// Convert rows into reports, keeping store order and dropping malformed rows
pub fn parse_rows(rows: Vec<ReportRow>, vocabulary: &StatusVocabulary) -> ParsedReports {
    let mut parsed = ParsedReports {
        reports: Vec::with_capacity(rows.len()),
        rejected: 0,
    };

    for row in rows {
        let id = row.id_string().unwrap_or_else(|| "<none>".to_string());
        match row.into_report(vocabulary) {
            Ok(report) => parsed.reports.push(report),
            Err(reason) => {
                tracing::warn!("Rejected report row {}: {}", id, reason);
                parsed.rejected += 1;
            }
        }
    }

    if parsed.rejected > 0 {
        tracing::warn!(
            "{} of {} report rows rejected at fetch",
            parsed.rejected,
            parsed.rejected + parsed.reports.len()
        );
    }

    parsed
}

/// Insert payload for a new report
#[derive(Debug, Clone, Serialize)]
pub struct NewReport {
    pub image_url: String,
    pub area_name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub duration: String,
    pub status: ReportStatus,
    pub description: Option<String>,
}

/// Status patch for a set of reports
#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdate {
    pub status: ReportStatus,
    pub resolved_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl StatusUpdate {
    /// `resolved_at` is stamped for resolved, cleared otherwise
    pub fn new(status: ReportStatus, now: DateTime<Utc>) -> Self {
        Self {
            status,
            resolved_at: (status == ReportStatus::Resolved).then_some(now),
            updated_at: now,
        }
    }
}
