pub mod admin;
pub mod dashboard;
pub mod geocoding;
pub mod notifications;
pub mod reports;
