//! Shared "currently displayed route" slot guarded by a batch generation.
//!
//! A viewer switching treks starts a new batch before the previous one has
//! finished. Each batch takes a ticket; only the ticket matching the latest
//! generation may commit, so a slow response for an old trek cannot replace
//! the route on screen.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use trekroute_core::{ResolvedRoute, RouteError};

/// Proof that a batch was started at a given generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchTicket {
    generation: u64,
}

impl BatchTicket {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What the view currently shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    #[default]
    Empty,
    Ready(ResolvedRoute),
    Unavailable(RouteError),
}

#[derive(Debug, Default)]
pub struct RouteView {
    generation: AtomicU64,
    state: RwLock<ViewState>,
}

impl RouteView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new batch, invalidating every ticket issued before it.
    pub fn begin(&self) -> BatchTicket {
        BatchTicket {
            generation: self.generation.fetch_add(1, Ordering::SeqCst) + 1,
        }
    }

    /// Drops the displayed route and invalidates any batch in flight.
    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = ViewState::Empty;
    }

    #[must_use]
    pub fn is_current(&self, ticket: BatchTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.generation
    }

    /// Stores `result` if `ticket` is still the latest batch.
    ///
    /// Returns `false`, leaving the view untouched, for a stale ticket.
    pub fn commit(&self, ticket: BatchTicket, result: Result<ResolvedRoute, RouteError>) -> bool {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        // Checked under the write lock so a concurrent reset cannot slip in
        // between the check and the store.
        if !self.is_current(ticket) {
            tracing::debug!(
                stale = ticket.generation,
                current = self.generation.load(Ordering::SeqCst),
                "discarding stale route batch"
            );
            return false;
        }
        *state = match result {
            Ok(route) => ViewState::Ready(route),
            Err(e) => ViewState::Unavailable(e),
        };
        true
    }

    #[must_use]
    pub fn current(&self) -> ViewState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use trekroute_core::{Coordinate, ItineraryStop, ResolutionStatus, ResolvedStop};

    use super::*;

    fn route(label: &str) -> ResolvedRoute {
        ResolvedRoute::new(vec![ResolvedStop::from_stop(
            &ItineraryStop::new(1, label),
            Coordinate::new(28.0, 86.9),
            ResolutionStatus::Anchored,
        )])
    }

    #[test]
    fn starts_empty() {
        assert_eq!(RouteView::new().current(), ViewState::Empty);
    }

    #[test]
    fn current_ticket_commits() {
        let view = RouteView::new();
        let ticket = view.begin();
        assert!(view.commit(ticket, Ok(route("Lukla"))));
        assert_eq!(view.current(), ViewState::Ready(route("Lukla")));
    }

    #[test]
    fn stale_ticket_is_discarded() {
        let view = RouteView::new();
        let old = view.begin();
        let new = view.begin();
        assert!(view.commit(new, Ok(route("Annapurna"))));
        assert!(!view.commit(old, Ok(route("Everest"))));
        assert_eq!(view.current(), ViewState::Ready(route("Annapurna")));
    }

    #[test]
    fn generations_increase_monotonically() {
        let view = RouteView::new();
        let a = view.begin();
        let b = view.begin();
        assert!(b.generation() > a.generation());
    }

    #[test]
    fn unavailable_route_is_committed_as_state() {
        let view = RouteView::new();
        let ticket = view.begin();
        assert!(view.commit(ticket, Err(RouteError::AnchorMissing)));
        assert_eq!(view.current(), ViewState::Unavailable(RouteError::AnchorMissing));
    }

    #[test]
    fn reset_invalidates_in_flight_batch() {
        let view = RouteView::new();
        let ticket = view.begin();
        view.reset();
        assert!(!view.commit(ticket, Ok(route("Lukla"))));
        assert_eq!(view.current(), ViewState::Empty);
    }
}
