use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============================================================================
// Photon (forward search) wire format
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhotonResponse {
    #[serde(default)]
    pub features: Vec<PhotonFeature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotonFeature {
    pub geometry: PhotonGeometry,
    #[serde(default)]
    pub properties: PhotonProperties,
}

/// GeoJSON point, `[lon, lat]`
#[derive(Debug, Clone, Deserialize)]
pub struct PhotonGeometry {
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhotonProperties {
    pub osm_id: Option<i64>,
    pub osm_type: Option<String>,
    pub name: Option<String>,
    pub housenumber: Option<String>,
    pub street: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
}

// ============================================================================
// Nominatim (reverse lookup) wire format
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NominatimReverse {
    pub display_name: Option<String>,
    pub address: Option<NominatimAddress>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NominatimAddress {
    pub suburb: Option<String>,
    pub neighbourhood: Option<String>,
    pub locality: Option<String>,
    pub city_district: Option<String>,
    pub city: Option<String>,
}

// ============================================================================
// Results
// ============================================================================

/// One place suggestion for the location search box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PlaceSuggestion {
    /// OSM id, or the result position when Photon omits it
    pub id: i64,
    pub osm_type: String,
    pub latitude: f64,
    pub longitude: f64,
    #[schema(example = "Forum Mall, Hosur Road, Koramangala, Bengaluru, Karnataka, 560095")]
    pub display_name: String,
}

/// Address and area resolved for a picked point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ResolvedLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    #[schema(example = "Koramangala")]
    pub area_name: String,
    /// True when the lookup failed and the coordinates stand in for the address
    pub degraded: bool,
}
