use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::report_store::{ReportStore, StoreError};
use crate::core::config::StoreConfig;
use crate::features::reports::models::{NewReport, ReportRow, StatusUpdate};

/// Client for the report table behind the backend's REST query surface
pub struct RestReportStore {
    client: Client,
    table_url: String,
    api_key: String,
    service_key: Option<String>,
}

impl RestReportStore {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Request(format!("Failed to build HTTP client: {}", e)))?;

        let table_url = format!("{}/rest/v1/{}", config.url, config.reports_table);
        info!("Report store client initialized for {}", table_url);

        Ok(Self {
            client,
            table_url,
            api_key: config.api_key.clone(),
            service_key: config.service_key.clone(),
        })
    }

    /// Reads and the public insert go out with the anon key, admin mutations
    /// with the service key when one is configured
    fn request(&self, method: Method, privileged: bool) -> RequestBuilder {
        let key = match (&self.service_key, privileged) {
            (Some(service_key), true) => service_key,
            _ => &self.api_key,
        };

        self.client
            .request(method, &self.table_url)
            .header("apikey", key)
            .bearer_auth(key)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        operation: &str,
    ) -> Result<T, StoreError> {
        let response = builder.send().await.map_err(|e| {
            tracing::error!("Store {} request failed: {:?}", operation, e);
            StoreError::Request(e.to_string())
        })?;

        let response = check_status(response, operation).await?;

        response.json::<T>().await.map_err(|e| {
            tracing::error!("Failed to decode store {} response: {:?}", operation, e);
            StoreError::Decode(e.to_string())
        })
    }
}

async fn check_status(response: Response, operation: &str) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    tracing::error!("Store {} returned {}: {}", operation, status, body);
    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}

/// PostgREST `in` filter value: `in.("a","b")`
pub(crate) fn in_filter(ids: &[String]) -> String {
    let quoted = ids
        .iter()
        .map(|id| format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect::<Vec<_>>()
        .join(",");
    format!("in.({})", quoted)
}

#[async_trait]
impl ReportStore for RestReportStore {
    async fn select_all(&self) -> Result<Vec<ReportRow>, StoreError> {
        let builder = self
            .request(Method::GET, false)
            .query(&[("select", "*"), ("order", "created_at.desc")]);

        let rows: Vec<ReportRow> = self.send(builder, "select_all").await?;
        debug!("Fetched {} report rows", rows.len());
        Ok(rows)
    }

    async fn select_recent(&self, limit: usize) -> Result<Vec<ReportRow>, StoreError> {
        let builder = self.request(Method::GET, false).query(&[
            ("select", "*".to_string()),
            ("order", "created_at.desc".to_string()),
            ("limit", limit.to_string()),
        ]);

        self.send(builder, "select_recent").await
    }

    async fn select_by_id(&self, id: &str) -> Result<Option<ReportRow>, StoreError> {
        let builder = self
            .request(Method::GET, false)
            .query(&[("select", "*".to_string()), ("id", format!("eq.{}", id))]);

        let rows: Vec<ReportRow> = self.send(builder, "select_by_id").await?;
        Ok(rows.into_iter().next())
    }

    async fn select_by_ids(&self, ids: &[String]) -> Result<Vec<ReportRow>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let builder = self.request(Method::GET, false).query(&[
            ("select", "*".to_string()),
            ("id", in_filter(ids)),
            ("order", "created_at.desc".to_string()),
        ]);

        self.send(builder, "select_by_ids").await
    }

    async fn insert(&self, report: &NewReport) -> Result<ReportRow, StoreError> {
        let builder = self
            .request(Method::POST, false)
            .header("Prefer", "return=representation")
            .json(&[report]);

        let rows: Vec<ReportRow> = self.send(builder, "insert").await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("Insert returned no row".to_string()))?;

        info!(
            "Inserted report {} for area '{}'",
            row.id_string().unwrap_or_default(),
            report.area_name
        );
        Ok(row)
    }

    async fn update_status(
        &self,
        ids: &[String],
        update: &StatusUpdate,
    ) -> Result<usize, StoreError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let builder = self
            .request(Method::PATCH, true)
            .query(&[("id", in_filter(ids))])
            .header("Prefer", "return=representation")
            .json(update);

        let rows: Vec<ReportRow> = self.send(builder, "update_status").await?;
        info!(
            "Updated status of {} report(s) to '{}'",
            rows.len(),
            update.status
        );
        Ok(rows.len())
    }

    async fn delete_by_ids(&self, ids: &[String]) -> Result<usize, StoreError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let builder = self
            .request(Method::DELETE, true)
            .query(&[("id", in_filter(ids))])
            .header("Prefer", "return=representation");

        let rows: Vec<ReportRow> = self.send(builder, "delete").await?;
        info!("Deleted {} report(s)", rows.len());
        Ok(rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::models::ReportStatus;
    use axum::body::Bytes;
    use axum::extract::{Query, State};
    use axum::http::{HeaderMap, StatusCode, Uri};
    use axum::{Json, Router};
    use chrono::Utc;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_in_filter_quotes_ids() {
        let ids = vec!["a1".to_string(), "b\"2".to_string()];
        assert_eq!(in_filter(&ids), r#"in.("a1","b\"2")"#);
    }

    /// What the fake backend saw of one request
    #[derive(Debug, Clone)]
    struct Recorded {
        method: String,
        path: String,
        query: Vec<(String, String)>,
        apikey: Option<String>,
        authorization: Option<String>,
        prefer: Option<String>,
        body: Value,
    }

    impl Recorded {
        fn param(&self, key: &str) -> Option<&str> {
            self.query
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        }
    }

    #[derive(Clone)]
    struct FakeBackend {
        requests: Arc<Mutex<Vec<Recorded>>>,
        status: StatusCode,
        reply: Value,
    }

    impl FakeBackend {
        fn requests(&self) -> Vec<Recorded> {
            self.requests.lock().unwrap().clone()
        }
    }

    async fn record(
        State(backend): State<FakeBackend>,
        method: axum::http::Method,
        uri: Uri,
        Query(query): Query<Vec<(String, String)>>,
        headers: HeaderMap,
        body: Bytes,
    ) -> (StatusCode, Json<Value>) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        backend.requests.lock().unwrap().push(Recorded {
            method: method.to_string(),
            path: uri.path().to_string(),
            query,
            apikey: header("apikey"),
            authorization: header("authorization"),
            prefer: header("prefer"),
            body: serde_json::from_slice(&body).unwrap_or(Value::Null),
        });
        (backend.status, Json(backend.reply.clone()))
    }

    async fn fake_backend(status: StatusCode, reply: Value) -> (FakeBackend, String) {
        let backend = FakeBackend {
            requests: Arc::new(Mutex::new(Vec::new())),
            status,
            reply,
        };
        let app = Router::new().fallback(record).with_state(backend.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (backend, format!("http://{}", addr))
    }

    fn config(url: &str, service_key: Option<&str>) -> StoreConfig {
        StoreConfig {
            url: url.to_string(),
            api_key: "anon".to_string(),
            service_key: service_key.map(str::to_string),
            reports_table: "pothole_reports".to_string(),
            timeout: std::time::Duration::from_secs(5),
        }
    }

    fn stored_rows() -> Value {
        json!([
            {"id": "r2", "area_name": "Koramangala", "status": "pending"},
            {"id": "r1", "area_name": "BTM Layout", "status": "resolved"}
        ])
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_table_url_built_from_config() {
        let store = RestReportStore::new(&config("https://store.example.com", None)).unwrap();
        assert_eq!(
            store.table_url,
            "https://store.example.com/rest/v1/pothole_reports"
        );
    }

    #[tokio::test]
    async fn test_reads_use_anon_key_newest_first() {
        let (backend, url) = fake_backend(StatusCode::OK, stored_rows()).await;
        let store = RestReportStore::new(&config(&url, Some("service"))).unwrap();

        let rows = store.select_all().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id_string().as_deref(), Some("r2"));

        store.select_recent(6).await.unwrap();
        store.select_by_id("r1").await.unwrap();

        let requests = backend.requests();
        assert_eq!(requests.len(), 3);
        for request in &requests {
            assert_eq!(request.method, "GET");
            assert_eq!(request.path, "/rest/v1/pothole_reports");
            assert_eq!(request.param("select"), Some("*"));
            assert_eq!(request.apikey.as_deref(), Some("anon"));
            assert_eq!(request.authorization.as_deref(), Some("Bearer anon"));
        }
        assert_eq!(requests[0].param("order"), Some("created_at.desc"));
        assert_eq!(requests[1].param("order"), Some("created_at.desc"));
        assert_eq!(requests[1].param("limit"), Some("6"));
        assert_eq!(requests[2].param("id"), Some("eq.r1"));
    }

    #[tokio::test]
    async fn test_admin_mutations_use_service_key() {
        let (backend, url) = fake_backend(StatusCode::OK, stored_rows()).await;
        let store = RestReportStore::new(&config(&url, Some("service"))).unwrap();

        let update = StatusUpdate::new(ReportStatus::Resolved, Utc::now());
        let updated = store.update_status(&ids(&["r1", "r2"]), &update).await.unwrap();
        assert_eq!(updated, 2);

        let deleted = store.delete_by_ids(&ids(&["r1", "r2"])).await.unwrap();
        assert_eq!(deleted, 2);

        let requests = backend.requests();
        assert_eq!(requests.len(), 2);

        let patch = &requests[0];
        assert_eq!(patch.method, "PATCH");
        assert_eq!(patch.param("id"), Some(r#"in.("r1","r2")"#));
        assert_eq!(patch.prefer.as_deref(), Some("return=representation"));
        assert_eq!(patch.apikey.as_deref(), Some("service"));
        assert_eq!(patch.authorization.as_deref(), Some("Bearer service"));
        assert_eq!(patch.body["status"], "resolved");
        assert!(patch.body["resolved_at"].is_string());

        let delete = &requests[1];
        assert_eq!(delete.method, "DELETE");
        assert_eq!(delete.param("id"), Some(r#"in.("r1","r2")"#));
        assert_eq!(delete.prefer.as_deref(), Some("return=representation"));
        assert_eq!(delete.authorization.as_deref(), Some("Bearer service"));
    }

    #[tokio::test]
    async fn test_mutations_fall_back_to_anon_key() {
        let (backend, url) = fake_backend(StatusCode::OK, json!([])).await;
        let store = RestReportStore::new(&config(&url, None)).unwrap();

        store.delete_by_ids(&ids(&["r1"])).await.unwrap();
        assert_eq!(
            backend.requests()[0].authorization.as_deref(),
            Some("Bearer anon")
        );
    }

    #[tokio::test]
    async fn test_insert_posts_one_row_and_returns_it() {
        let (backend, url) = fake_backend(
            StatusCode::CREATED,
            json!([{"id": "new-1", "area_name": "HSR Layout", "status": "pending"}]),
        )
        .await;
        let store = RestReportStore::new(&config(&url, Some("service"))).unwrap();

        let report = NewReport {
            image_url: "https://cdn.example.com/p.jpg".to_string(),
            area_name: "HSR Layout".to_string(),
            address: "27th Main".to_string(),
            latitude: 12.91,
            longitude: 77.64,
            duration: "1-2-weeks".to_string(),
            status: ReportStatus::Pending,
            description: None,
        };
        let row = store.insert(&report).await.unwrap();
        assert_eq!(row.id_string().as_deref(), Some("new-1"));

        let request = &backend.requests()[0];
        assert_eq!(request.method, "POST");
        assert_eq!(request.prefer.as_deref(), Some("return=representation"));
        assert_eq!(request.authorization.as_deref(), Some("Bearer anon"));
        assert_eq!(request.body[0]["area_name"], "HSR Layout");
        assert_eq!(request.body[0]["status"], "pending");
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let (_, url) = fake_backend(
            StatusCode::SERVICE_UNAVAILABLE,
            json!({"message": "maintenance"}),
        )
        .await;
        let store = RestReportStore::new(&config(&url, None)).unwrap();

        match store.select_all().await {
            Err(StoreError::Status { status, body }) => {
                assert_eq!(status, 503);
                assert!(body.contains("maintenance"));
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_selection_makes_no_request() {
        let (backend, url) = fake_backend(StatusCode::OK, json!([])).await;
        let store = RestReportStore::new(&config(&url, None)).unwrap();

        assert!(store.select_by_ids(&[]).await.unwrap().is_empty());
        assert_eq!(store.delete_by_ids(&[]).await.unwrap(), 0);
        assert!(backend.requests().is_empty());
    }
}
