//! Spherical geometry helpers: great-circle distance, bounding boxes around
//! an anchor, and linear interpolation between two coordinates.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6_371.0;

const KM_PER_LAT_DEGREE: f64 = 111.32;

/// A WGS84 latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `true` when both components are finite and inside the WGS84 ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Great-circle distance between two coordinates in kilometres.
#[must_use]
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Sum of great-circle distances between consecutive coordinates.
#[must_use]
pub fn polyline_km(points: &[Coordinate]) -> f64 {
    points.windows(2).map(|w| haversine_km(w[0], w[1])).sum()
}

/// Linear interpolation from `a` towards `b` at fraction `t` (0.0 = `a`).
///
/// Longitude takes the short way round when the two points straddle the
/// antimeridian.
#[must_use]
pub fn lerp(a: Coordinate, b: Coordinate, t: f64) -> Coordinate {
    let mut d_lng = b.lng - a.lng;
    if d_lng > 180.0 {
        d_lng -= 360.0;
    } else if d_lng < -180.0 {
        d_lng += 360.0;
    }

    let mut lng = a.lng + d_lng * t;
    if lng > 180.0 {
        lng -= 360.0;
    } else if lng < -180.0 {
        lng += 360.0;
    }

    Coordinate {
        lat: a.lat + (b.lat - a.lat) * t,
        lng,
    }
}

/// Axis-aligned lat/lng rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Box extending `radius_km` in every direction from `center`.
    ///
    /// The longitude half-width widens with latitude so the box covers the
    /// same ground distance east-west as north-south. Both axes are clamped
    /// to the valid coordinate ranges.
    #[must_use]
    pub fn around(center: Coordinate, radius_km: f64) -> Self {
        let lat_delta = radius_km / KM_PER_LAT_DEGREE;
        let cos_lat = center.lat.to_radians().cos().abs().max(0.01);
        let lng_delta = (radius_km / (KM_PER_LAT_DEGREE * cos_lat)).min(180.0);

        Self {
            min_lat: (center.lat - lat_delta).max(-90.0),
            min_lng: (center.lng - lng_delta).max(-180.0),
            max_lat: (center.lat + lat_delta).min(90.0),
            max_lng: (center.lng + lng_delta).min(180.0),
        }
    }

    /// Smallest box containing every point, or `None` for an empty input.
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => Self {
                    min_lat: p.lat,
                    min_lng: p.lng,
                    max_lat: p.lat,
                    max_lng: p.lng,
                },
                Some(b) => Self {
                    min_lat: b.min_lat.min(p.lat),
                    min_lng: b.min_lng.min(p.lng),
                    max_lat: b.max_lat.max(p.lat),
                    max_lng: b.max_lng.max(p.lng),
                },
            })
        })
    }

    #[must_use]
    pub fn contains(&self, point: Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.lat)
            && (self.min_lng..=self.max_lng).contains(&point.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LUKLA: Coordinate = Coordinate::new(27.6857, 86.7314);
    const KATHMANDU: Coordinate = Coordinate::new(27.7172, 85.3240);

    #[test]
    fn haversine_zero_for_same_point() {
        assert!(haversine_km(LUKLA, LUKLA).abs() < 1e-9);
    }

    #[test]
    fn haversine_lukla_to_kathmandu_is_about_139_km() {
        let d = haversine_km(LUKLA, KATHMANDU);
        assert!((d - 139.0).abs() < 3.0, "got {d}");
    }

    #[test]
    fn haversine_london_to_paris() {
        let london = Coordinate::new(51.5074, -0.1278);
        let paris = Coordinate::new(48.8566, 2.3522);
        let d = haversine_km(london, paris);
        assert!((d - 343.5).abs() < 2.0, "got {d}");
    }

    #[test]
    fn polyline_of_single_point_is_zero() {
        assert!(polyline_km(&[LUKLA]).abs() < f64::EPSILON);
        assert!(polyline_km(&[]).abs() < f64::EPSILON);
    }

    #[test]
    fn lerp_midpoint() {
        let mid = lerp(Coordinate::new(0.0, 0.0), Coordinate::new(10.0, 20.0), 0.5);
        assert!((mid.lat - 5.0).abs() < 1e-9);
        assert!((mid.lng - 10.0).abs() < 1e-9);
    }

    #[test]
    fn lerp_wraps_across_antimeridian() {
        let mid = lerp(Coordinate::new(0.0, 179.0), Coordinate::new(0.0, -179.0), 0.5);
        assert!((mid.lng.abs() - 180.0).abs() < 1e-9, "got {}", mid.lng);
    }

    #[test]
    fn bounding_box_around_contains_center_and_respects_radius() {
        let bbox = BoundingBox::around(LUKLA, 1000.0);
        assert!(bbox.contains(LUKLA));
        assert!(bbox.contains(KATHMANDU));
        let lat_span_km = (bbox.max_lat - bbox.min_lat) * KM_PER_LAT_DEGREE;
        assert!((lat_span_km - 2000.0).abs() < 1.0, "got {lat_span_km}");
        assert!(bbox.max_lng - LUKLA.lng > bbox.max_lat - LUKLA.lat);
    }

    #[test]
    fn bounding_box_near_pole_is_clamped() {
        let bbox = BoundingBox::around(Coordinate::new(89.0, 0.0), 1000.0);
        assert!(bbox.max_lat <= 90.0);
        assert!(bbox.min_lng >= -180.0 && bbox.max_lng <= 180.0);
    }

    #[test]
    fn enclosing_empty_is_none() {
        assert!(BoundingBox::enclosing(Vec::new()).is_none());
    }

    #[test]
    fn enclosing_spans_all_points() {
        let bbox = BoundingBox::enclosing([LUKLA, KATHMANDU]).unwrap();
        assert!((bbox.min_lng - KATHMANDU.lng).abs() < 1e-9);
        assert!((bbox.max_lng - LUKLA.lng).abs() < 1e-9);
        assert!((bbox.min_lat - LUKLA.lat).abs() < 1e-9);
    }

    #[test]
    fn invalid_coordinates_are_rejected() {
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, 181.0).is_valid());
        assert!(LUKLA.is_valid());
    }
}
