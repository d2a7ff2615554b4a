//! Modules layer - Infrastructure components for external integrations
//!
//! Contains clients for the report store (REST query surface of the
//! backend-as-a-service) and the image bucket.

pub mod storage;
pub mod store;
