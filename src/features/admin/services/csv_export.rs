use chrono::{DateTime, Utc};
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::features::reports::models::{parse_timestamp, Report, ReportRow};

pub const CSV_HEADER: [&str; 8] = [
    "ID",
    "Area",
    "Address",
    "Status",
    "Created Date",
    "Latitude",
    "Longitude",
    "Duration",
];

const CREATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, thiserror::Error)]
pub enum CsvExportError {
    #[error("Failed to write CSV: {0}")]
    Write(#[from] csv::Error),

    #[error("Failed to flush CSV: {0}")]
    Flush(String),
}

/// `pothole-reports-YYYY-MM-DD.csv`
pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("pothole-reports-{}.csv", now.format("%Y-%m-%d"))
}

fn coordinate(value: Option<f64>) -> String {
    value
        .filter(|v| v.is_finite())
        .map(|v| v.to_string())
        .unwrap_or_default()
}

/// One data line of the export, in `CSV_HEADER` order
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRecord([String; 8]);

impl From<&Report> for ExportRecord {
    fn from(report: &Report) -> Self {
        Self([
            report.id.clone(),
            report.area_name.clone(),
            report.address.clone(),
            report.status.raw.clone(),
            report.created_at.format(CREATED_FORMAT).to_string(),
            coordinate(report.latitude),
            coordinate(report.longitude),
            report.duration.clone(),
        ])
    }
}

impl ExportRecord {
    /// Stored values as-is, for a selected row that did not pass validation.
    /// A readable `created_at` is still formatted; anything else is copied raw.
    pub fn from_row(row: &ReportRow) -> Self {
        let created = row
            .created_at
            .as_deref()
            .map(|raw| {
                parse_timestamp(raw)
                    .map(|dt| dt.format(CREATED_FORMAT).to_string())
                    .unwrap_or_else(|| raw.to_string())
            })
            .unwrap_or_default();

        Self([
            row.id_string().unwrap_or_default(),
            row.area_name.clone().unwrap_or_default(),
            row.address.clone().unwrap_or_default(),
            row.status.clone().unwrap_or_default(),
            created,
            coordinate(row.parsed_latitude()),
            coordinate(row.parsed_longitude()),
            row.duration.clone().unwrap_or_default(),
        ])
    }
}

/// One line per record after a bare header. Text fields are quoted, numeric
/// ones are not.
pub fn records_to_csv(records: &[ExportRecord]) -> Result<Vec<u8>, CsvExportError> {
    let mut header = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    header.write_record(CSV_HEADER)?;
    let buffer = header
        .into_inner()
        .map_err(|e| CsvExportError::Flush(e.to_string()))?;

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::NonNumeric)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(buffer);

    for record in records {
        writer.write_record(&record.0)?;
    }

    writer
        .into_inner()
        .map_err(|e| CsvExportError::Flush(e.to_string()))
}
