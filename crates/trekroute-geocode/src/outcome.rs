//! Per-stop resolution outcomes.

use trekroute_core::{Coordinate, ResolutionStatus};

/// Why a stop ended up without a coordinate of its own.
///
/// Every variant is handled the same way downstream (interpolation or
/// anchoring); the distinction only feeds logging and tests.
#[derive(Debug, Clone, PartialEq)]
pub enum Unresolved {
    /// No usable name could be extracted from the stop text.
    ParseFailure,
    /// The name is too generic to look up.
    ClassifiedVague,
    /// No geocoder is configured.
    Offline,
    /// The geocoder failed (network, status, or body).
    ServiceError(String),
    /// The geocoder returned no candidates.
    NoMatch,
    /// The candidate was farther from the anchor than the allowed radius.
    OutlierRejected { distance_km: f64 },
    /// A previous lookup for the same key failed this session.
    KnownUnresolvable,
}

impl std::fmt::Display for Unresolved {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParseFailure => write!(f, "parse failure"),
            Self::ClassifiedVague => write!(f, "vague name"),
            Self::Offline => write!(f, "geocoder offline"),
            Self::ServiceError(e) => write!(f, "service error: {e}"),
            Self::NoMatch => write!(f, "no match"),
            Self::OutlierRejected { distance_km } => {
                write!(f, "outlier rejected at {distance_km:.0} km")
            }
            Self::KnownUnresolvable => write!(f, "known unresolvable"),
        }
    }
}

/// What happened to one stop before the placement policy ran.
#[derive(Debug, Clone, PartialEq)]
pub enum StopOutcome {
    Provided(Coordinate),
    Geocoded(Coordinate),
    Unresolved(Unresolved),
}

impl StopOutcome {
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            Self::Provided(c) | Self::Geocoded(c) => Some(*c),
            Self::Unresolved(_) => None,
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<ResolutionStatus> {
        match self {
            Self::Provided(_) => Some(ResolutionStatus::Provided),
            Self::Geocoded(_) => Some(ResolutionStatus::Geocoded),
            Self::Unresolved(_) => None,
        }
    }
}
