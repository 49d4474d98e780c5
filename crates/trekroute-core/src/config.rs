use crate::app_config::{
    EngineConfig, DEFAULT_ANCHOR_BUCKET_DEGREES, DEFAULT_GEOCODER_BASE_URL, DEFAULT_MAX_DISTANCE_KM,
    DEFAULT_USER_AGENT,
};
use crate::interpolate::InterpolationMode;
use crate::ConfigError;

/// Load engine configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but invalid.
pub fn load_engine_config() -> Result<EngineConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_engine_config_from_env()
}

/// Load engine configuration from environment variables already in the process.
///
/// Unlike [`load_engine_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but invalid.
pub fn load_engine_config_from_env() -> Result<EngineConfig, ConfigError> {
    build_engine_config(|key| std::env::var(key))
}

/// Build engine configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a
/// `HashMap` lookup.
fn build_engine_config<F>(lookup: F) -> Result<EngineConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .trim()
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .trim()
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_positive_f64 = |var: &str, default: f64| -> Result<f64, ConfigError> {
        let Ok(raw) = lookup(var) else {
            return Ok(default);
        };
        let value = raw
            .trim()
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(invalid(var, format!("must be a positive number, got {value}")))
        }
    };

    let geocoder_token = lookup("TREKROUTE_GEOCODER_TOKEN")
        .ok()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    let geocoder_base_url = or_default("TREKROUTE_GEOCODER_BASE_URL", DEFAULT_GEOCODER_BASE_URL);

    let max_distance_km = parse_positive_f64("TREKROUTE_MAX_DISTANCE_KM", DEFAULT_MAX_DISTANCE_KM)?;
    let anchor_bucket_degrees = parse_positive_f64(
        "TREKROUTE_ANCHOR_BUCKET_DEGREES",
        DEFAULT_ANCHOR_BUCKET_DEGREES,
    )?;

    let interpolation = or_default("TREKROUTE_INTERPOLATION", "midpoint")
        .parse::<InterpolationMode>()
        .map_err(|reason| invalid("TREKROUTE_INTERPOLATION", reason))?;

    let request_timeout_secs = parse_u64("TREKROUTE_REQUEST_TIMEOUT_SECS", "10")?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "TREKROUTE_REQUEST_TIMEOUT_SECS",
            "must be at least 1 second".to_string(),
        ));
    }
    let max_retries = parse_u32("TREKROUTE_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("TREKROUTE_RETRY_BACKOFF_BASE_MS", "250")?;
    let user_agent = or_default("TREKROUTE_USER_AGENT", DEFAULT_USER_AGENT);
    let log_level = or_default("TREKROUTE_LOG_LEVEL", "info");

    Ok(EngineConfig {
        geocoder_token,
        geocoder_base_url,
        max_distance_km,
        interpolation,
        anchor_bucket_degrees,
        request_timeout_secs,
        max_retries,
        retry_backoff_base_ms,
        user_agent,
        log_level,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
