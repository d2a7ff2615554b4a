use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::geocoding::handlers;
use crate::features::geocoding::services::GeocodingService;

pub fn routes(geocoding_service: Arc<GeocodingService>) -> Router {
    Router::new()
        .route("/api/geocoding/search", get(handlers::search_places))
        .route("/api/geocoding/reverse", get(handlers::reverse_geocode))
        .with_state(geocoding_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::GeocodingConfig;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::Value;

    fn server() -> TestServer {
        let service = GeocodingService::new(&GeocodingConfig {
            nominatim_url: "http://127.0.0.1:1".to_string(),
            photon_url: "http://127.0.0.1:1".to_string(),
            ..Default::default()
        })
        .unwrap();
        TestServer::new(routes(Arc::new(service))).unwrap()
    }

    #[tokio::test]
    async fn test_reverse_degrades_instead_of_failing() {
        let body: Value = server()
            .get("/api/geocoding/reverse")
            .add_query_param("lat", "12.9352")
            .add_query_param("lon", "77.6245")
            .await
            .json();

        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["area_name"], "Unknown Area");
        assert_eq!(body["data"]["degraded"], true);
    }

    #[tokio::test]
    async fn test_reverse_rejects_out_of_range_latitude() {
        server()
            .get("/api/geocoding/reverse")
            .add_query_param("lat", "123")
            .add_query_param("lon", "77.6")
            .expect_failure()
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_short_search_is_empty() {
        let body: Value = server()
            .get("/api/geocoding/search")
            .add_query_param("q", "ko")
            .await
            .json();
        assert_eq!(body["data"], serde_json::json!([]));
    }
}
