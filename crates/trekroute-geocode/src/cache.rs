//! Session-lifetime memo of geocoding outcomes, failures included.
//!
//! The resolver owns an `Arc<dyn GeocodeCache>` handed in by the caller, so
//! several engines (or repeated resolutions of the same trek) can share one
//! cache without a process-global singleton. Nothing here is persisted.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use trekroute_core::Coordinate;

/// Cache identity for one lookup: the normalized name plus the anchor's
/// coarse grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    name: String,
    bucket: (i32, i32),
}

impl CacheKey {
    /// Builds a key from a parsed place name and the trek anchor.
    ///
    /// The name is lower-cased with whitespace collapsed; the anchor is
    /// snapped to a `bucket_degrees` grid so nearby anchors share entries.
    #[must_use]
    pub fn new(name: &str, anchor: Coordinate, bucket_degrees: f64) -> Self {
        Self {
            name: normalize_name(name),
            bucket: (
                bucket_index(anchor.lat, bucket_degrees),
                bucket_index(anchor.lng, bucket_degrees),
            ),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[allow(clippy::cast_possible_truncation)]
fn bucket_index(value: f64, bucket_degrees: f64) -> i32 {
    (value / bucket_degrees).floor() as i32
}

/// Storage behind the resolver's memo.
///
/// `get` distinguishes a miss (`None`) from a cached failure (`Some(None)`);
/// a cached failure must not trigger another lookup.
pub trait GeocodeCache: Send + Sync {
    fn get(&self, key: &CacheKey) -> Option<Option<Coordinate>>;
    fn set(&self, key: CacheKey, value: Option<Coordinate>);
}

/// Hit/miss counters for a [`SessionCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// In-memory [`GeocodeCache`] for one running process.
#[derive(Debug, Default)]
pub struct SessionCache {
    entries: RwLock<HashMap<CacheKey, Option<Coordinate>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl SessionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

impl GeocodeCache for SessionCache {
    fn get(&self, key: &CacheKey) -> Option<Option<Coordinate>> {
        let found = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .copied();
        let counter = if found.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    fn set(&self, key: CacheKey, value: Option<Coordinate>) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVEREST: Coordinate = Coordinate::new(28.0043, 86.8571);

    #[test]
    fn key_normalizes_case_and_whitespace() {
        let a = CacheKey::new("Namche  Bazaar", EVEREST, 0.1);
        let b = CacheKey::new(" namche bazaar ", EVEREST, 0.1);
        assert_eq!(a, b);
        assert_eq!(a.name(), "namche bazaar");
    }

    #[test]
    fn nearby_anchors_share_a_bucket() {
        let a = CacheKey::new("Dole", Coordinate::new(28.0043, 86.8571), 0.1);
        let b = CacheKey::new("Dole", Coordinate::new(28.0100, 86.8600), 0.1);
        assert_eq!(a, b);
    }

    #[test]
    fn distant_anchors_do_not_share_a_bucket() {
        let a = CacheKey::new("Dole", EVEREST, 0.1);
        let b = CacheKey::new("Dole", Coordinate::new(46.2, 6.1), 0.1);
        assert_ne!(a, b);
    }

    #[test]
    fn negative_coordinates_bucket_with_floor() {
        let a = CacheKey::new("x", Coordinate::new(-0.05, -0.05), 0.1);
        let b = CacheKey::new("x", Coordinate::new(0.05, 0.05), 0.1);
        assert_ne!(a, b);
    }

    #[test]
    fn miss_then_hit() {
        let cache = SessionCache::new();
        let key = CacheKey::new("Lukla", EVEREST, 0.1);
        assert_eq!(cache.get(&key), None);

        let lukla = Coordinate::new(27.6857, 86.7314);
        cache.set(key.clone(), Some(lukla));
        assert_eq!(cache.get(&key), Some(Some(lukla)));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn cached_failure_is_a_hit() {
        let cache = SessionCache::new();
        let key = CacheKey::new("Nowhere", EVEREST, 0.1);
        cache.set(key.clone(), None);
        assert_eq!(cache.get(&key), Some(None));
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn clear_empties_entries() {
        let cache = SessionCache::new();
        cache.set(CacheKey::new("Lukla", EVEREST, 0.1), None);
        assert!(!cache.is_empty());
        cache.clear();
        assert!(cache.is_empty());
    }
}
