use crate::interpolate::InterpolationMode;

pub const DEFAULT_GEOCODER_BASE_URL: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places/";
pub const DEFAULT_USER_AGENT: &str = "trekroute/0.1 (itinerary-resolver)";
pub const DEFAULT_MAX_DISTANCE_KM: f64 = 1000.0;
pub const DEFAULT_ANCHOR_BUCKET_DEGREES: f64 = 0.1;

#[derive(Clone)]
pub struct EngineConfig {
    /// Geocoding service token. `None` runs the engine offline.
    pub geocoder_token: Option<String>,
    pub geocoder_base_url: String,
    /// Lookup bounding-box radius and outlier rejection threshold.
    pub max_distance_km: f64,
    pub interpolation: InterpolationMode,
    /// Grid size used to bucket anchors in session cache keys.
    pub anchor_bucket_degrees: f64,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub user_agent: String,
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            geocoder_token: None,
            geocoder_base_url: DEFAULT_GEOCODER_BASE_URL.to_string(),
            max_distance_km: DEFAULT_MAX_DISTANCE_KM,
            interpolation: InterpolationMode::default(),
            anchor_bucket_degrees: DEFAULT_ANCHOR_BUCKET_DEGREES,
            request_timeout_secs: 10,
            max_retries: 2,
            retry_backoff_base_ms: 250,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl std::fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineConfig")
            .field(
                "geocoder_token",
                &self.geocoder_token.as_ref().map(|_| "[redacted]"),
            )
            .field("geocoder_base_url", &self.geocoder_base_url)
            .field("max_distance_km", &self.max_distance_km)
            .field("interpolation", &self.interpolation)
            .field("anchor_bucket_degrees", &self.anchor_bucket_degrees)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("user_agent", &self.user_agent)
            .field("log_level", &self.log_level)
            .finish()
    }
}
