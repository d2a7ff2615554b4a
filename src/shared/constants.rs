/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// REPORT CONSTANTS
// =============================================================================

/// Number of reports shown in the landing page feed
pub const RECENT_REPORTS_LIMIT: usize = 6;

/// Area name used when reverse geocoding yields nothing usable
pub const UNKNOWN_AREA: &str = "Unknown Area";

/// Maximum photo size accepted on submission
pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Allowed MIME types for report photos
pub const ALLOWED_IMAGE_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/webp",
    "image/gif",
    "image/heic",
];
