//! Wire types for the forward-geocoding response body.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct ForwardResponse {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Feature {
    /// `[lng, lat]`.
    pub center: [f64; 2],
    #[serde(default)]
    pub place_name: Option<String>,
}
