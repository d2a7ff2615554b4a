use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MarkerPopup {
    pub area_name: String,
    pub address: String,
    pub status_label: String,
    pub image_url: String,
    /// e.g. "3 days ago"
    pub age: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MapMarker {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: String,
    pub color: String,
    pub popup: MarkerPopup,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

/// How the client should position the map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Viewport {
    FitBounds { bounds: Bounds, padding: u32 },
    Center { latitude: f64, longitude: f64, zoom: u8 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MapView {
    pub markers: Vec<MapMarker>,
    pub viewport: Viewport,
}
