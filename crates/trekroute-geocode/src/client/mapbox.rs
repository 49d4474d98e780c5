//! HTTP client for a Mapbox-style forward geocoding endpoint.
//!
//! `GET {base}/{query}.json?access_token=…&bbox=…&proximity=…&limit=…&types=…`
//! with candidates in `features[].center` as `[lng, lat]`.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Client, Url};
use trekroute_core::{Coordinate, EngineConfig};

use super::response::ForwardResponse;
use super::{GeocodeQuery, Geocoder};
use crate::error::GeocodeError;
use crate::retry::retry_with_backoff;

/// Forward geocoder backed by the Mapbox Geocoding API (or anything serving
/// the same contract). Use [`MapboxGeocoder::with_base_url`] to point it at a
/// mock server in tests.
pub struct MapboxGeocoder {
    client: Client,
    token: String,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl MapboxGeocoder {
    /// Builds a geocoder from engine configuration and an access token.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`GeocodeError::InvalidBaseUrl`] if the configured base
    /// URL does not parse.
    pub fn from_config(config: &EngineConfig, token: &str) -> Result<Self, GeocodeError> {
        let mut geocoder = Self::with_base_url(
            token,
            &config.geocoder_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?;
        geocoder.max_retries = config.max_retries;
        geocoder.backoff_base_ms = config.retry_backoff_base_ms;
        Ok(geocoder)
    }

    /// Builds a geocoder against `base_url` with retries disabled.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`GeocodeError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn with_base_url(
        token: &str,
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()?;

        // The query text is appended as the last path segment, so the base
        // must end with exactly one slash.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GeocodeError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            token: token.to_owned(),
            base_url,
            max_retries: 0,
            backoff_base_ms: 0,
        })
    }

    /// Sets the retry policy for transient failures.
    #[must_use]
    pub fn with_retries(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Builds the request URL with the query text percent-encoded into the path.
    pub(crate) fn build_url(&self, query: &GeocodeQuery) -> Result<Url, GeocodeError> {
        let segment = format!("{}.json", utf8_percent_encode(&query.text, NON_ALPHANUMERIC));
        let mut url = self
            .base_url
            .join(&segment)
            .map_err(|e| GeocodeError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;

        let bbox = format!(
            "{:.6},{:.6},{:.6},{:.6}",
            query.bbox.min_lng, query.bbox.min_lat, query.bbox.max_lng, query.bbox.max_lat
        );
        let proximity = format!("{:.6},{:.6}", query.proximity.lng, query.proximity.lat);
        let types = query
            .types
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(",");

        url.query_pairs_mut()
            .append_pair("access_token", &self.token)
            .append_pair("bbox", &bbox)
            .append_pair("proximity", &proximity)
            .append_pair("limit", &query.limit.to_string())
            .append_pair("types", &types);

        Ok(url)
    }

    async fn request(&self, url: &Url, text: &str) -> Result<Vec<Coordinate>, GeocodeError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(GeocodeError::RateLimited { retry_after_secs });
        }

        if !status.is_success() {
            return Err(GeocodeError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: ForwardResponse =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
                context: format!("forward geocode for '{text}'"),
                source: e,
            })?;

        if let Some(first) = parsed.features.first() {
            tracing::debug!(
                query = text,
                place_name = first.place_name.as_deref().unwrap_or(""),
                lng = first.center[0],
                lat = first.center[1],
                "geocoder candidate"
            );
        }

        Ok(parsed
            .features
            .into_iter()
            .map(|f| Coordinate::new(f.center[1], f.center[0]))
            .collect())
    }
}

impl Geocoder for MapboxGeocoder {
    async fn forward(&self, query: &GeocodeQuery) -> Result<Vec<Coordinate>, GeocodeError> {
        let url = self.build_url(query)?;
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.request(&url, &query.text)
        })
        .await
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
