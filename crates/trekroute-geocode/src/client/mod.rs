//! Forward-geocoding seam and its HTTP implementation.

mod mapbox;
mod response;

use std::future::Future;
use std::sync::Arc;

use trekroute_core::{BoundingBox, Coordinate};

use crate::error::GeocodeError;

pub use mapbox::MapboxGeocoder;

/// Result categories the resolver is willing to accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceType {
    Place,
    Locality,
    Poi,
    Region,
}

impl PlaceType {
    pub const DEFAULT_FILTER: [PlaceType; 4] = [
        PlaceType::Place,
        PlaceType::Locality,
        PlaceType::Poi,
        PlaceType::Region,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PlaceType::Place => "place",
            PlaceType::Locality => "locality",
            PlaceType::Poi => "poi",
            PlaceType::Region => "region",
        }
    }
}

/// One forward lookup: free text constrained to a box and biased towards a point.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeQuery {
    pub text: String,
    pub bbox: BoundingBox,
    pub proximity: Coordinate,
    pub limit: u8,
    pub types: Vec<PlaceType>,
}

impl GeocodeQuery {
    /// Single-result query boxed `radius_km` around `anchor` and biased
    /// towards it.
    #[must_use]
    pub fn around(text: impl Into<String>, anchor: Coordinate, radius_km: f64) -> Self {
        Self {
            text: text.into(),
            bbox: BoundingBox::around(anchor, radius_km),
            proximity: anchor,
            limit: 1,
            types: PlaceType::DEFAULT_FILTER.to_vec(),
        }
    }
}

/// An external forward-geocoding service.
///
/// Returns candidate coordinates best-first; an empty list means no match.
pub trait Geocoder: Send + Sync {
    fn forward(
        &self,
        query: &GeocodeQuery,
    ) -> impl Future<Output = Result<Vec<Coordinate>, GeocodeError>> + Send;
}

impl<G: Geocoder> Geocoder for Arc<G> {
    fn forward(
        &self,
        query: &GeocodeQuery,
    ) -> impl Future<Output = Result<Vec<Coordinate>, GeocodeError>> + Send {
        (**self).forward(query)
    }
}
