//! S3-compatible client for the report photo bucket
//!
//! Uses rust-s3 with path-style addressing so it works against MinIO as well
//! as hosted S3-compatible buckets.

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, Region};
use tracing::{debug, info};

use super::image_storage::{ImageStorage, StorageError};
use crate::core::config::ImageBucketConfig;

pub struct S3ImageStorage {
    bucket: Box<Bucket>,
    endpoint: String,
    public_url: String,
}

impl S3ImageStorage {
    pub fn new(config: &ImageBucketConfig) -> Result<Self, StorageError> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::Config(format!("Invalid bucket credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region, credentials)
            .map_err(|e| StorageError::Config(format!("Failed to create bucket handle: {}", e)))?;

        // http://endpoint/bucket instead of http://bucket.endpoint
        bucket.set_path_style();

        info!(
            "Image storage initialized for endpoint: {}, bucket: {}",
            config.endpoint, config.bucket
        );

        Ok(Self {
            bucket,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            public_url: config.public_url.clone(),
        })
    }

    pub fn bucket_name(&self) -> String {
        self.bucket.name()
    }
}

#[async_trait]
impl ImageStorage for S3ImageStorage {
    async fn upload(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        self.bucket
            .put_object_with_content_type(key, &data, content_type)
            .await
            .map_err(|e| {
                tracing::error!("Failed to upload image '{}': {:?}", key, e);
                StorageError::Upload {
                    key: key.to_string(),
                    message: e.to_string(),
                }
            })?;

        debug!(
            "Uploaded image '{}' ({} bytes) to bucket '{}'",
            key,
            data.len(),
            self.bucket.name()
        );
        Ok(key.to_string())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_url, key)
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.bucket.delete_object(key).await.map_err(|e| {
            tracing::error!("Failed to delete image '{}': {:?}", key, e);
            StorageError::Delete {
                key: key.to_string(),
                message: e.to_string(),
            }
        })?;

        debug!("Deleted image '{}' from bucket '{}'", key, self.bucket.name());
        Ok(())
    }

    fn key_from_url(&self, url: &str) -> Option<String> {
        // Public URL first, then the raw endpoint
        let internal = format!("{}/{}/", self.endpoint, self.bucket.name());
        [format!("{}/", self.public_url), internal]
            .iter()
            .find_map(|prefix| url.strip_prefix(prefix.as_str()))
            .filter(|key| !key.is_empty())
            .map(|key| key.to_string())
    }
}
