//! Report store module
//!
//! The report table lives in the backend-as-a-service. This module exposes the
//! query surface the service needs as a trait, plus a REST client for the
//! PostgREST-style `rest/v1/<table>` endpoints.

mod report_store;
mod rest_client;

pub use report_store::{ReportStore, StoreError};
pub use rest_client::RestReportStore;
