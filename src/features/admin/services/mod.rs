mod admin_service;
pub mod csv_export;

pub use admin_service::{AdminService, CsvExport};
