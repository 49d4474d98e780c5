//! Core data model and pure algorithms for resolving trek itineraries into
//! drawable routes.

pub mod app_config;
pub mod config;
pub mod error;
pub mod geo;
pub mod interpolate;
pub mod location;
pub mod summary;
pub mod treks;
pub mod types;
pub mod vague;

pub use app_config::EngineConfig;
pub use config::{load_engine_config, load_engine_config_from_env};
pub use error::{ConfigError, RouteError};
pub use geo::{haversine_km, BoundingBox, Coordinate};
pub use interpolate::{place_unresolved, InterpolationMode, Placement, Slot};
pub use location::parse_location_name;
pub use summary::RouteSummary;
pub use treks::{load_treks, TrekRecord};
pub use types::{ItineraryStop, ResolutionStatus, ResolvedRoute, ResolvedStop, TrekAnchor};
pub use vague::is_vague_name;
