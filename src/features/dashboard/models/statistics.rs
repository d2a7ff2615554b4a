use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Per-status counts of a (filtered) report set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReportStatistics {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub resolved: usize,
}

impl ReportStatistics {
    /// Reports whose status has no canonical equivalent
    pub fn unrecognized(&self) -> usize {
        self.total - (self.pending + self.in_progress + self.resolved)
    }
}
