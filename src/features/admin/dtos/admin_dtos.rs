use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::reports::models::ReportStatus;

// ============================================================================
// Requests
// ============================================================================

/// Set one status on a selection of reports
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusDto {
    #[validate(length(min = 1, max = 1000, message = "Select between 1 and 1000 reports"))]
    pub ids: Vec<String>,

    /// Canonical status; legacy spellings are rejected
    pub status: ReportStatus,
}

/// Delete a selection of reports
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct DeleteReportsDto {
    #[validate(length(min = 1, max = 1000, message = "Select between 1 and 1000 reports"))]
    pub ids: Vec<String>,

    /// Also remove the photos from the image bucket
    #[serde(default)]
    pub delete_images: bool,
}

/// Export a selection of reports as CSV
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ExportReportsDto {
    #[validate(length(min = 1, max = 1000, message = "Select between 1 and 1000 reports"))]
    pub ids: Vec<String>,
}

// ============================================================================
// Responses
// ============================================================================

/// Outcome of a bulk update or delete
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulkActionResultDto {
    /// Distinct ids in the request
    pub requested: usize,
    /// Rows the store reports as changed
    pub affected: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images_deleted: Option<usize>,
}

/// Keep the first occurrence of every non-blank id
pub fn distinct_ids(ids: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    ids.iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty() && seen.insert(*id))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_ids_keeps_first_occurrence() {
        let ids = vec![
            "b".to_string(),
            "a".to_string(),
            " b ".to_string(),
            "".to_string(),
        ];
        assert_eq!(distinct_ids(&ids), vec!["b", "a"]);
    }

    #[test]
    fn test_status_must_be_canonical() {
        let ok: UpdateStatusDto =
            serde_json::from_str(r#"{"ids":["a"],"status":"in-progress"}"#).unwrap();
        assert_eq!(ok.status, ReportStatus::InProgress);

        assert!(
            serde_json::from_str::<UpdateStatusDto>(r#"{"ids":["a"],"status":"in_progress"}"#)
                .is_err()
        );
    }

    #[test]
    fn test_empty_selection_is_invalid() {
        let dto = ExportReportsDto { ids: vec![] };
        assert!(dto.validate().is_err());
    }
}
