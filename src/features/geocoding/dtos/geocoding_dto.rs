use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

/// Forward search parameters
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Free text; fewer than 3 characters returns no results
    #[param(example = "forum mall")]
    pub q: String,

    /// Bias point latitude (defaults to the city center)
    pub lat: Option<f64>,

    /// Bias point longitude (defaults to the city center)
    pub lon: Option<f64>,
}

impl SearchParams {
    pub fn bias(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Reverse lookup parameters
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReverseParams {
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    #[param(example = 12.9352)]
    pub lat: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    #[param(example = 77.6245)]
    pub lon: f64,
}
