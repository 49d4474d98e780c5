use thiserror::Error;

/// Errors raised while loading engine configuration or trek catalogues.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read trek file {path}: {source}")]
    TrekFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse trek file {path}: {reason}")]
    TrekFileParse { path: String, reason: String },

    #[error("trek file validation error: {0}")]
    Validation(String),
}

/// Trek-level failure: the only state surfaced to the viewer as
/// "route unavailable". Per-stop failures never reach this type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    #[error("trek has no anchor coordinate")]
    AnchorMissing,

    #[error("trek anchor ({lat}, {lng}) is not a valid coordinate")]
    InvalidAnchor { lat: f64, lng: f64 },

    #[error("itinerary has no stops to place")]
    NoStops,
}
