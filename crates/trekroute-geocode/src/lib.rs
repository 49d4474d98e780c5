//! Geocoding-backed itinerary resolution.
//!
//! Wraps a forward-geocoding service with a session cache, outlier
//! rejection around the trek anchor, and the orchestration that turns a raw
//! itinerary into a [`trekroute_core::ResolvedRoute`].

pub mod cache;
pub mod client;
pub mod engine;
pub mod error;
pub mod outcome;
pub mod resolver;
pub mod view;

mod retry;

pub use cache::{CacheKey, CacheStats, GeocodeCache, SessionCache};
pub use client::{GeocodeQuery, Geocoder, MapboxGeocoder, PlaceType};
pub use engine::RouteEngine;
pub use error::GeocodeError;
pub use outcome::{StopOutcome, Unresolved};
pub use resolver::GeocodeResolver;
pub use view::{BatchTicket, RouteView, ViewState};
