//! Cache-backed, distance-validated lookup of one place name near a trek.

use std::sync::Arc;

use trekroute_core::{haversine_km, Coordinate, EngineConfig, TrekAnchor};

use crate::cache::{CacheKey, GeocodeCache};
use crate::client::{GeocodeQuery, Geocoder};
use crate::outcome::Unresolved;

/// Looks up clean place names around a trek anchor.
///
/// Every outcome, including failures, is memoised in the injected cache so a
/// name that could not be placed is never looked up twice in one session.
pub struct GeocodeResolver<G> {
    geocoder: G,
    cache: Arc<dyn GeocodeCache>,
    max_distance_km: f64,
    bucket_degrees: f64,
}

impl<G: Geocoder> GeocodeResolver<G> {
    #[must_use]
    pub fn new(
        geocoder: G,
        cache: Arc<dyn GeocodeCache>,
        max_distance_km: f64,
        bucket_degrees: f64,
    ) -> Self {
        Self {
            geocoder,
            cache,
            max_distance_km,
            bucket_degrees,
        }
    }

    #[must_use]
    pub fn from_config(geocoder: G, cache: Arc<dyn GeocodeCache>, config: &EngineConfig) -> Self {
        Self::new(
            geocoder,
            cache,
            config.max_distance_km,
            config.anchor_bucket_degrees,
        )
    }

    /// Coordinate for `name` near `anchor`, or `None` when it cannot be placed.
    pub async fn resolve(&self, name: &str, anchor: &TrekAnchor) -> Option<Coordinate> {
        self.lookup(name, anchor).await.ok()
    }

    /// Like [`resolve`](Self::resolve) but reports why a name was not placed.
    ///
    /// # Errors
    ///
    /// Returns the [`Unresolved`] reason: service failure, no match, outlier
    /// rejection, or a failure cached earlier in the session.
    pub async fn lookup(&self, name: &str, anchor: &TrekAnchor) -> Result<Coordinate, Unresolved> {
        let center = anchor.coordinate();
        let key = CacheKey::new(name, center, self.bucket_degrees);

        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!(name, hit = cached.is_some(), "geocode cache hit");
            return cached.ok_or(Unresolved::KnownUnresolvable);
        }

        let query = GeocodeQuery::around(query_text(name, &anchor.country), center, self.max_distance_km);
        let outcome = self.fetch_validated(&query, center).await;

        self.cache.set(key, outcome.as_ref().ok().copied());
        outcome
    }

    async fn fetch_validated(
        &self,
        query: &GeocodeQuery,
        center: Coordinate,
    ) -> Result<Coordinate, Unresolved> {
        let candidates = match self.geocoder.forward(query).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!(query = %query.text, error = %e, "geocoder request failed");
                return Err(Unresolved::ServiceError(e.to_string()));
            }
        };

        let Some(candidate) = candidates.first().copied() else {
            tracing::debug!(query = %query.text, "geocoder returned no candidates");
            return Err(Unresolved::NoMatch);
        };

        if !candidate.is_valid() {
            tracing::warn!(query = %query.text, ?candidate, "geocoder returned an invalid coordinate");
            return Err(Unresolved::NoMatch);
        }

        let distance_km = haversine_km(candidate, center);
        if distance_km > self.max_distance_km {
            tracing::warn!(
                query = %query.text,
                distance_km,
                max_distance_km = self.max_distance_km,
                lat = candidate.lat,
                lng = candidate.lng,
                "rejecting geocode result too far from trek anchor"
            );
            return Err(Unresolved::OutlierRejected { distance_km });
        }

        tracing::debug!(query = %query.text, distance_km, "geocoded");
        Ok(candidate)
    }
}

/// Text sent to the geocoder: the place name, followed by the country when known.
fn query_text(name: &str, country: &str) -> String {
    let country = country.trim();
    if country.is_empty() || name.to_lowercase().contains(&country.to_lowercase()) {
        name.to_string()
    } else {
        format!("{name}, {country}")
    }
}
