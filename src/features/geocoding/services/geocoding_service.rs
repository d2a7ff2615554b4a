use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::core::config::GeocodingConfig;
use crate::core::error::{AppError, Result};
use crate::features::geocoding::models::{
    NominatimAddress, NominatimReverse, PhotonProperties, PhotonResponse, PlaceSuggestion,
    ResolvedLocation,
};
use crate::shared::constants::UNKNOWN_AREA;

pub const MIN_QUERY_CHARS: usize = 3;
const SEARCH_LIMIT: usize = 15;
const REVERSE_ZOOM: u8 = 18;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Search box, `west,south,east,north`
const CITY_BBOX: &str = "77.379,12.834,77.786,13.143";
const OSM_TAGS: [&str; 7] = [
    "place", "amenity", "building", "shop", "office", "tourism", "leisure",
];
const CITY_CONTEXT: [&str; 3] = ["bangalore", "bengaluru", "karnataka"];

/// Place search and reverse lookup against the public OSM geocoders.
/// Failures never block a report: search degrades to no results, reverse
/// lookup to the raw coordinates.
pub struct GeocodingService {
    client: Client,
    photon_url: String,
    nominatim_url: String,
    default_center: (f64, f64),
}

impl GeocodingService {
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build geocoding client: {}", e)))?;

        info!(
            "Geocoding service initialized (search: {}, reverse: {})",
            config.photon_url, config.nominatim_url
        );

        Ok(Self {
            client,
            photon_url: config.photon_url.clone(),
            nominatim_url: config.nominatim_url.clone(),
            default_center: config.default_center,
        })
    }

    pub async fn search(&self, query: &str, bias: Option<(f64, f64)>) -> Vec<PlaceSuggestion> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Vec::new();
        }

        let (lat, lon) = bias.unwrap_or(self.default_center);
        let mut params: Vec<(&str, String)> = vec![
            ("q", query.to_string()),
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("limit", SEARCH_LIMIT.to_string()),
            ("bbox", CITY_BBOX.to_string()),
        ];
        params.extend(OSM_TAGS.iter().map(|tag| ("osm_tag", tag.to_string())));

        debug!("Searching places for '{}' near ({}, {})", query, lat, lon);

        let url = format!("{}/api?{}", self.photon_url, query_string(&params));

        let response = match self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Place search failed: {:?}", e);
                return Vec::new();
            }
        };

        match response.json::<PhotonResponse>().await {
            Ok(data) => suggestions_from(data),
            Err(e) => {
                warn!("Failed to decode place search response: {:?}", e);
                Vec::new()
            }
        }
    }

    pub async fn reverse(&self, lat: f64, lon: f64) -> ResolvedLocation {
        let params = [
            ("format", "json".to_string()),
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("zoom", REVERSE_ZOOM.to_string()),
            ("addressdetails", "1".to_string()),
        ];

        let url = format!("{}/reverse?{}", self.nominatim_url, query_string(&params));
        debug!("Reverse geocoding: {}", url);

        let result = match self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
        {
            Ok(response) => response.json::<NominatimReverse>().await,
            Err(e) => Err(e),
        };

        match result {
            Ok(data) => location_from(data, lat, lon),
            Err(e) => {
                warn!("Reverse geocoding failed for ({}, {}): {:?}", lat, lon, e);
                fallback_location(lat, lon)
            }
        }
    }
}

fn query_string(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub fn in_city(properties: &PhotonProperties) -> bool {
    let context = [&properties.city, &properties.state, &properties.district]
        .iter()
        .filter_map(|v| v.as_deref())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    CITY_CONTEXT.iter().any(|name| context.contains(name))
}

pub fn display_name(properties: &PhotonProperties) -> String {
    [
        &properties.name,
        &properties.housenumber,
        &properties.street,
        &properties.district,
        &properties.city,
        &properties.state,
        &properties.postcode,
    ]
    .into_iter()
    .filter_map(present)
    .collect::<Vec<_>>()
    .join(", ")
}

pub fn suggestions_from(response: PhotonResponse) -> Vec<PlaceSuggestion> {
    response
        .features
        .into_iter()
        .enumerate()
        .filter(|(_, feature)| in_city(&feature.properties))
        .filter_map(|(index, feature)| {
            let (lon, lat) = match feature.geometry.coordinates.as_slice() {
                [lon, lat, ..] if lon.is_finite() && lat.is_finite() => (*lon, *lat),
                _ => return None,
            };
            let p = feature.properties;

            Some(PlaceSuggestion {
                id: p.osm_id.unwrap_or(index as i64),
                osm_type: p.osm_type.clone().unwrap_or_else(|| "node".to_string()),
                latitude: lat,
                longitude: lon,
                display_name: display_name(&p),
            })
        })
        .collect()
}

/// suburb, then neighbourhood, locality, city_district, city
pub fn area_name(address: &NominatimAddress) -> String {
    [
        &address.suburb,
        &address.neighbourhood,
        &address.locality,
        &address.city_district,
        &address.city,
    ]
    .into_iter()
    .find_map(present)
    .unwrap_or(UNKNOWN_AREA)
    .to_string()
}

pub fn fallback_location(lat: f64, lon: f64) -> ResolvedLocation {
    ResolvedLocation {
        latitude: lat,
        longitude: lon,
        address: format!("{:.6}, {:.6}", lat, lon),
        area_name: UNKNOWN_AREA.to_string(),
        degraded: true,
    }
}

pub fn location_from(data: NominatimReverse, lat: f64, lon: f64) -> ResolvedLocation {
    let Some(address) = data.address else {
        debug!("Reverse lookup for ({}, {}) returned no address", lat, lon);
        return fallback_location(lat, lon);
    };

    ResolvedLocation {
        latitude: lat,
        longitude: lon,
        address: present(&data.display_name)
            .map(str::to_string)
            .unwrap_or_else(|| format!("{:.6}, {:.6}", lat, lon)),
        area_name: area_name(&address),
        degraded: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::geocoding::models::{PhotonFeature, PhotonGeometry};
    use axum::{extract::Query, routing::get, Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;

    fn feature(lon: f64, lat: f64, properties: PhotonProperties) -> PhotonFeature {
        PhotonFeature {
            geometry: PhotonGeometry {
                coordinates: vec![lon, lat],
            },
            properties,
        }
    }

    fn bengaluru(name: &str) -> PhotonProperties {
        PhotonProperties {
            name: Some(name.to_string()),
            city: Some("Bengaluru".to_string()),
            state: Some("Karnataka".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_city_context_filter() {
        assert!(in_city(&bengaluru("Forum Mall")));
        assert!(in_city(&PhotonProperties {
            district: Some("Bangalore Urban".to_string()),
            ..Default::default()
        }));
        assert!(!in_city(&PhotonProperties {
            city: Some("Chennai".to_string()),
            state: Some("Tamil Nadu".to_string()),
            ..Default::default()
        }));
        assert!(!in_city(&PhotonProperties::default()));
    }

    #[test]
    fn test_display_name_skips_missing_parts() {
        let properties = PhotonProperties {
            name: Some("Forum Mall".to_string()),
            street: Some("Hosur Road".to_string()),
            housenumber: Some("".to_string()),
            postcode: Some("560095".to_string()),
            ..bengaluru("Forum Mall")
        };
        assert_eq!(
            display_name(&properties),
            "Forum Mall, Hosur Road, Bengaluru, Karnataka, 560095"
        );
    }

    #[test]
    fn test_suggestions_keep_city_results_with_coordinates() {
        let response = PhotonResponse {
            features: vec![
                feature(77.6117, 12.9345, bengaluru("Forum Mall")),
                feature(80.27, 13.08, PhotonProperties {
                    city: Some("Chennai".to_string()),
                    ..Default::default()
                }),
                PhotonFeature {
                    geometry: PhotonGeometry { coordinates: vec![] },
                    properties: bengaluru("Nowhere"),
                },
            ],
        };

        let suggestions = suggestions_from(response);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].id, 0);
        assert_eq!(suggestions[0].osm_type, "node");
        assert_eq!(suggestions[0].latitude, 12.9345);
        assert_eq!(suggestions[0].longitude, 77.6117);
    }

    #[test]
    fn test_area_name_fallback_chain() {
        let mut address = NominatimAddress {
            city: Some("Bengaluru".to_string()),
            locality: Some("Ejipura".to_string()),
            ..Default::default()
        };
        assert_eq!(area_name(&address), "Ejipura");

        address.suburb = Some("Koramangala".to_string());
        assert_eq!(area_name(&address), "Koramangala");

        assert_eq!(area_name(&NominatimAddress::default()), UNKNOWN_AREA);
    }

    #[test]
    fn test_reverse_without_address_degrades() {
        let location = location_from(NominatimReverse::default(), 12.9352, 77.6245);
        assert!(location.degraded);
        assert_eq!(location.address, "12.935200, 77.624500");
        assert_eq!(location.area_name, UNKNOWN_AREA);
    }

    async fn fake_geocoder() -> String {
        let app = Router::new()
            .route(
                "/api",
                get(|Query(params): Query<Vec<(String, String)>>| async move {
                    let tags = params.iter().filter(|(k, _)| k == "osm_tag").count();
                    assert_eq!(tags, OSM_TAGS.len());
                    Json(json!({
                        "features": [{
                            "geometry": {"coordinates": [77.6117, 12.9345]},
                            "properties": {
                                "osm_id": 42,
                                "osm_type": "W",
                                "name": "Forum Mall",
                                "city": "Bengaluru",
                                "state": "Karnataka"
                            }
                        }]
                    }))
                }),
            )
            .route(
                "/reverse",
                get(|Query(params): Query<HashMap<String, String>>| async move {
                    assert_eq!(params.get("zoom").map(String::as_str), Some("18"));
                    Json::<Value>(json!({
                        "display_name": "80 Feet Road, Koramangala, Bengaluru",
                        "address": {"suburb": "Koramangala", "city": "Bengaluru"}
                    }))
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn service_for(base_url: &str) -> GeocodingService {
        GeocodingService::new(&GeocodingConfig {
            nominatim_url: base_url.to_string(),
            photon_url: base_url.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_search_and_reverse_against_fake_geocoder() {
        let service = service_for(&fake_geocoder().await);

        let suggestions = service.search("forum", None).await;
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].id, 42);
        assert_eq!(suggestions[0].display_name, "Forum Mall, Bengaluru, Karnataka");

        let location = service.reverse(12.9352, 77.6245).await;
        assert!(!location.degraded);
        assert_eq!(location.area_name, "Koramangala");
        assert_eq!(location.address, "80 Feet Road, Koramangala, Bengaluru");
    }

    #[tokio::test]
    async fn test_short_query_makes_no_request() {
        let service = service_for("http://127.0.0.1:1");
        assert!(service.search("ab", None).await.is_empty());
        assert!(service.search("  ab  ", None).await.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_geocoder_degrades() {
        let service = service_for("http://127.0.0.1:1");

        assert!(service.search("koramangala", None).await.is_empty());

        let location = service.reverse(12.9352, 77.6245).await;
        assert!(location.degraded);
        assert_eq!(location.address, "12.935200, 77.624500");
    }
}
