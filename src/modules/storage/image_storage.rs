use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the image bucket
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage client misconfigured: {0}")]
    Config(String),

    #[error("Failed to upload '{key}': {message}")]
    Upload { key: String, message: String },

    #[error("Failed to delete '{key}': {message}")]
    Delete { key: String, message: String },
}

/// Image bucket operations used by report submission and admin cleanup.
///
/// Implemented by `S3ImageStorage` and `InMemoryImageStorage` (tests).
#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Store `data` under `key`, returning the key
    async fn upload(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError>;

    /// Publicly readable URL of an object
    fn public_url(&self, key: &str) -> String;

    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Inverse of [`ImageStorage::public_url`]; `None` for foreign URLs
    fn key_from_url(&self, url: &str) -> Option<String>;
}

/// `<unix millis>-<7 random chars>.<ext>`
pub fn generate_object_name(now: DateTime<Utc>, extension: &str) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}.{}",
        now.timestamp_millis(),
        &random[..7],
        extension.trim_start_matches('.').to_ascii_lowercase()
    )
}
