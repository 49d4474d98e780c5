//! Route resolution orchestration.
//!
//! 1. If every stop already carries a coordinate, return it as-is (no parsing,
//!    no network).
//! 2. Otherwise settle every stop concurrently: provided coordinate, or
//!    parse → vague check → cache-backed lookup.
//! 3. Place whatever is still unresolved (anchor the endpoints, interpolate
//!    the interior).

use futures::future::join_all;
use trekroute_core::{
    is_vague_name, parse_location_name, place_unresolved, InterpolationMode, ItineraryStop,
    Placement, ResolutionStatus, ResolvedRoute, ResolvedStop, RouteError, Slot, TrekAnchor,
};

use crate::client::{Geocoder, MapboxGeocoder};
use crate::outcome::{StopOutcome, Unresolved};
use crate::resolver::GeocodeResolver;
use crate::view::RouteView;

/// Turns raw itineraries into fully-placed routes.
///
/// Without a resolver the engine runs offline: authored coordinates are kept
/// and everything else is anchored or interpolated.
pub struct RouteEngine<G = MapboxGeocoder> {
    resolver: Option<GeocodeResolver<G>>,
    mode: InterpolationMode,
}

impl<G: Geocoder> RouteEngine<G> {
    #[must_use]
    pub fn new(resolver: GeocodeResolver<G>, mode: InterpolationMode) -> Self {
        Self {
            resolver: Some(resolver),
            mode,
        }
    }

    #[must_use]
    pub fn offline(mode: InterpolationMode) -> Self {
        Self {
            resolver: None,
            mode,
        }
    }

    #[must_use]
    pub fn mode(&self) -> InterpolationMode {
        self.mode
    }

    /// Resolves `stops` into a route of the same length and order.
    ///
    /// Per-stop failures never surface here; they end up anchored or
    /// interpolated.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError`] ("route unavailable") when the anchor is missing
    /// or invalid, or when there are no stops to place.
    pub async fn resolve(
        &self,
        stops: &[ItineraryStop],
        anchor: Option<&TrekAnchor>,
    ) -> Result<ResolvedRoute, RouteError> {
        let anchor = anchor.ok_or(RouteError::AnchorMissing)?;
        let center = anchor.coordinate();
        if !center.is_valid() {
            return Err(RouteError::InvalidAnchor {
                lat: anchor.latitude,
                lng: anchor.longitude,
            });
        }
        if stops.is_empty() {
            return Err(RouteError::NoStops);
        }

        if let Some(route) = all_provided(stops) {
            tracing::debug!(
                trek = %anchor.name,
                stops = stops.len(),
                "every stop has a coordinate; skipping resolution"
            );
            return Ok(route);
        }

        let outcomes = join_all(stops.iter().map(|stop| self.settle(stop, anchor))).await;

        let slots: Vec<Slot> = stops
            .iter()
            .zip(&outcomes)
            .map(|(stop, outcome)| Slot {
                day: stop.day,
                placement: outcome.coordinate().zip(outcome.status()).map(
                    |(coordinate, status)| Placement { coordinate, status },
                ),
            })
            .collect();

        let placements = place_unresolved(&slots, center, self.mode);

        for ((stop, outcome), placement) in stops.iter().zip(&outcomes).zip(&placements) {
            if let StopOutcome::Unresolved(reason) = outcome {
                tracing::debug!(
                    day = stop.day,
                    text = stop.raw_text().unwrap_or(""),
                    %reason,
                    status = %placement.status,
                    "stop placed approximately"
                );
            }
        }

        let route = ResolvedRoute::new(
            stops
                .iter()
                .zip(placements)
                .map(|(stop, p)| ResolvedStop::from_stop(stop, p.coordinate, p.status))
                .collect(),
        );

        let summary = route.summary();
        tracing::info!(
            trek = %anchor.name,
            stops = summary.stops,
            provided = summary.provided,
            geocoded = summary.geocoded,
            anchored = summary.anchored,
            interpolated = summary.interpolated,
            "resolved itinerary"
        );

        Ok(route)
    }

    /// Resolves and commits into `view`, unless a newer batch started on the
    /// view in the meantime. Returns whether the result was committed.
    pub async fn resolve_into_view(
        &self,
        view: &RouteView,
        stops: &[ItineraryStop],
        anchor: Option<&TrekAnchor>,
    ) -> bool {
        let ticket = view.begin();
        let result = self.resolve(stops, anchor).await;
        view.commit(ticket, result)
    }

    async fn settle(&self, stop: &ItineraryStop, anchor: &TrekAnchor) -> StopOutcome {
        if let Some(coordinate) = stop.provided_coordinate() {
            return StopOutcome::Provided(coordinate);
        }

        let name = parse_location_name(stop.raw_text().unwrap_or(""));
        if name.is_empty() {
            return StopOutcome::Unresolved(Unresolved::ParseFailure);
        }
        if is_vague_name(&name) {
            return StopOutcome::Unresolved(Unresolved::ClassifiedVague);
        }

        let Some(resolver) = &self.resolver else {
            return StopOutcome::Unresolved(Unresolved::Offline);
        };

        match resolver.lookup(&name, anchor).await {
            Ok(coordinate) => StopOutcome::Geocoded(coordinate),
            Err(reason) => StopOutcome::Unresolved(reason),
        }
    }
}

/// Identity route when every stop already has a valid coordinate.
fn all_provided(stops: &[ItineraryStop]) -> Option<ResolvedRoute> {
    let resolved = stops
        .iter()
        .map(|stop| {
            stop.provided_coordinate()
                .map(|c| ResolvedStop::from_stop(stop, c, ResolutionStatus::Provided))
        })
        .collect::<Option<Vec<_>>>()?;
    Some(ResolvedRoute::new(resolved))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor() -> TrekAnchor {
        TrekAnchor {
            name: "Everest Base Camp".to_string(),
            country: "Nepal".to_string(),
            latitude: 28.0043,
            longitude: 86.8571,
        }
    }

    fn offline() -> RouteEngine {
        RouteEngine::offline(InterpolationMode::Midpoint)
    }

    #[tokio::test]
    async fn missing_anchor_is_route_unavailable() {
        let stops = vec![ItineraryStop::new(1, "Lukla")];
        let result = offline().resolve(&stops, None).await;
        assert_eq!(result, Err(RouteError::AnchorMissing));
    }

    #[tokio::test]
    async fn invalid_anchor_is_route_unavailable() {
        let mut bad = anchor();
        bad.latitude = f64::NAN;
        let stops = vec![ItineraryStop::new(1, "Lukla")];
        let result = offline().resolve(&stops, Some(&bad)).await;
        assert!(matches!(result, Err(RouteError::InvalidAnchor { .. })));
    }

    #[tokio::test]
    async fn empty_itinerary_is_route_unavailable() {
        let result = offline().resolve(&[], Some(&anchor())).await;
        assert_eq!(result, Err(RouteError::NoStops));
    }

    #[tokio::test]
    async fn offline_engine_anchors_and_interpolates() {
        let stops = vec![
            ItineraryStop::new(1, "Lukla"),
            ItineraryStop::new(2, "Namche Bazaar").with_coordinate(27.8069, 86.7140),
            ItineraryStop::new(3, "Camp 2"),
            ItineraryStop::new(4, "Gorak Shep"),
        ];
        let route = offline().resolve(&stops, Some(&anchor())).await.unwrap();
        let statuses: Vec<_> = route.stops().iter().map(|s| s.status).collect();
        assert_eq!(
            statuses,
            vec![
                ResolutionStatus::Anchored,
                ResolutionStatus::Provided,
                ResolutionStatus::Interpolated,
                ResolutionStatus::Anchored,
            ]
        );
    }

    #[test]
    fn all_provided_requires_every_stop() {
        let stops = vec![
            ItineraryStop::new(1, "Lukla").with_coordinate(27.6857, 86.7314),
            ItineraryStop::new(2, "Namche Bazaar"),
        ];
        assert!(all_provided(&stops).is_none());
    }
}
