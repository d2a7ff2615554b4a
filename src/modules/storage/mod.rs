//! Storage module for report photos
//!
//! Provides the image bucket abstraction and its S3-compatible client.

mod image_storage;
mod s3_client;

pub use image_storage::{generate_object_name, ImageStorage, StorageError};
pub use s3_client::S3ImageStorage;
