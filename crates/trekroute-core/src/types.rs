//! Itinerary input records and resolved route output.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::geo::{BoundingBox, Coordinate};

/// The trek's own known location: lookup bias, validation reference and
/// fallback coordinate of last resort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrekAnchor {
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl TrekAnchor {
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// One day of an itinerary as authored by the content layer.
///
/// The free-text description may live in any of `location`, `route`,
/// `overnightStay` or `place`; the first non-empty one wins. Fields this
/// engine does not understand are kept in `metadata` and passed through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryStop {
    pub day: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overnight_stay: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
    #[serde(
        default,
        alias = "latitude",
        alias = "providedLat",
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub lat: Option<f64>,
    #[serde(
        default,
        alias = "longitude",
        alias = "providedLng",
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub lng: Option<f64>,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl ItineraryStop {
    /// Minimal stop carrying only a day number and a `location` text.
    #[must_use]
    pub fn new(day: u32, location: impl Into<String>) -> Self {
        Self {
            day,
            location: Some(location.into()),
            route: None,
            overnight_stay: None,
            place: None,
            lat: None,
            lng: None,
            metadata: Map::new(),
        }
    }

    #[must_use]
    pub fn with_coordinate(mut self, lat: f64, lng: f64) -> Self {
        self.lat = Some(lat);
        self.lng = Some(lng);
        self
    }

    /// First non-empty description among `location`, `route`,
    /// `overnightStay` and `place`, trimmed.
    #[must_use]
    pub fn raw_text(&self) -> Option<&str> {
        [&self.location, &self.route, &self.overnight_stay, &self.place]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .map(str::trim)
            .find(|text| !text.is_empty())
    }

    /// Authored coordinate, if both components are present and valid.
    #[must_use]
    pub fn provided_coordinate(&self) -> Option<Coordinate> {
        let coordinate = Coordinate::new(self.lat?, self.lng?);
        coordinate.is_valid().then_some(coordinate)
    }

    /// Label shown next to the stop's marker.
    #[must_use]
    pub fn display_label(&self) -> String {
        self.raw_text()
            .map_or_else(|| format!("Day {}", self.day), str::to_owned)
    }
}

/// Accepts numbers, numeric strings, or null; anything else becomes `None`.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// How a stop's final coordinate was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionStatus {
    /// Coordinate authored with the itinerary.
    Provided,
    /// Looked up and accepted by distance validation.
    Geocoded,
    /// Unresolved endpoint pinned to the trek anchor.
    Anchored,
    /// Unresolved interior stop placed between its resolved neighbours.
    Interpolated,
}

impl ResolutionStatus {
    /// `true` for positions the renderer must not present as verified.
    #[must_use]
    pub fn is_approximate(self) -> bool {
        matches!(self, Self::Anchored | Self::Interpolated)
    }
}

impl std::fmt::Display for ResolutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Provided => write!(f, "provided"),
            Self::Geocoded => write!(f, "geocoded"),
            Self::Anchored => write!(f, "anchored"),
            Self::Interpolated => write!(f, "interpolated"),
        }
    }
}

/// A stop with a concrete coordinate, ready for the map renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStop {
    pub day: u32,
    pub display_label: String,
    pub lng: f64,
    pub lat: f64,
    pub status: ResolutionStatus,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl ResolvedStop {
    #[must_use]
    pub fn from_stop(stop: &ItineraryStop, coordinate: Coordinate, status: ResolutionStatus) -> Self {
        Self {
            day: stop.day,
            display_label: stop.display_label(),
            lng: coordinate.lng,
            lat: coordinate.lat,
            status,
            metadata: stop.metadata.clone(),
        }
    }

    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

/// Ordered, fully-resolved itinerary. Same length and order as the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedRoute {
    stops: Vec<ResolvedStop>,
    has_route: bool,
}

impl ResolvedRoute {
    #[must_use]
    pub fn new(stops: Vec<ResolvedStop>) -> Self {
        let has_route = stops.len() >= 2;
        Self { stops, has_route }
    }

    #[must_use]
    pub fn stops(&self) -> &[ResolvedStop] {
        &self.stops
    }

    #[must_use]
    pub fn into_stops(self) -> Vec<ResolvedStop> {
        self.stops
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Whether the renderer should draw a connecting line (two or more
    /// placed stops) rather than a single anchor marker.
    #[must_use]
    pub fn has_route(&self) -> bool {
        self.has_route
    }

    #[must_use]
    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.stops.iter().map(ResolvedStop::coordinate).collect()
    }

    /// Camera-fit rectangle around every stop.
    #[must_use]
    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::enclosing(self.stops.iter().map(ResolvedStop::coordinate))
    }
}
