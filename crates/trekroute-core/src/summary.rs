//! Derived views of a resolved route for the rendering layer: counts per
//! resolution status, route length, pass-through elevation sums, and a
//! `GeoJSON` payload.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::geo::polyline_km;
use crate::types::{ResolutionStatus, ResolvedRoute};

/// Aggregate figures for one resolved route.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub stops: usize,
    pub provided: usize,
    pub geocoded: usize,
    pub anchored: usize,
    pub interpolated: usize,
    /// Straight-line length of the drawn route, stop to stop.
    pub distance_km: f64,
    /// Sum of numeric `ascent` metadata across stops, if any stop has one.
    pub ascent_m: Option<f64>,
    /// Sum of numeric `descent` metadata across stops, if any stop has one.
    pub descent_m: Option<f64>,
}

impl ResolvedRoute {
    #[must_use]
    pub fn summary(&self) -> RouteSummary {
        let count = |status: ResolutionStatus| self.stops().iter().filter(|s| s.status == status).count();

        RouteSummary {
            stops: self.len(),
            provided: count(ResolutionStatus::Provided),
            geocoded: count(ResolutionStatus::Geocoded),
            anchored: count(ResolutionStatus::Anchored),
            interpolated: count(ResolutionStatus::Interpolated),
            distance_km: polyline_km(&self.coordinates()),
            ascent_m: sum_metadata(self, "ascent"),
            descent_m: sum_metadata(self, "descent"),
        }
    }

    /// `FeatureCollection` with a `LineString` for the route (only when
    /// [`has_route`](Self::has_route)) followed by one `Point` per stop.
    /// Positions are `[lng, lat]`; every point carries its `status` so
    /// approximate positions can be styled apart from verified ones.
    #[must_use]
    pub fn to_geojson(&self) -> Value {
        let mut features = Vec::with_capacity(self.len() + 1);

        if self.has_route() {
            let line: Vec<[f64; 2]> = self.stops().iter().map(|s| [s.lng, s.lat]).collect();
            features.push(json!({
                "type": "Feature",
                "geometry": { "type": "LineString", "coordinates": line },
                "properties": { "kind": "route" },
            }));
        }

        for stop in self.stops() {
            features.push(json!({
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [stop.lng, stop.lat] },
                "properties": {
                    "kind": "stop",
                    "day": stop.day,
                    "label": stop.display_label,
                    "status": stop.status,
                    "approximate": stop.status.is_approximate(),
                },
            }));
        }

        json!({ "type": "FeatureCollection", "features": features })
    }
}

fn sum_metadata(route: &ResolvedRoute, key: &str) -> Option<f64> {
    route
        .stops()
        .iter()
        .filter_map(|s| numeric_field(&s.metadata, key))
        .fold(None, |acc, v| Some(acc.unwrap_or(0.0) + v))
}

fn numeric_field(metadata: &Map<String, Value>, key: &str) -> Option<f64> {
    match metadata.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('m').trim().parse().ok(),
        _ => None,
    }
}
