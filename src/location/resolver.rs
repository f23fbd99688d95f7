//! Geocoder — walks the backend chain and memoizes the outcome.
//!
//! Flow: cache → backend 1 → backend 2 → ... → absent.
//! A miss moves to the next backend. A failure either moves on or ends the
//! lookup, depending on the configured `FailurePolicy`.

use super::cache::GeocodeCache;
use super::providers::{default_backends, GeocodeBackend};
use super::types::{Attempt, FailurePolicy, GeoPoint, GeocoderConfig};

pub struct Geocoder {
    backends: Vec<Box<dyn GeocodeBackend>>,
    cache: GeocodeCache,
    policy: FailurePolicy,
}

impl Geocoder {
    /// Geocoder over the standard ArcGIS → Nominatim chain.
    pub fn new(config: &GeocoderConfig) -> Self {
        Self::with_backends(default_backends(config), config.failure_policy)
    }

    /// Geocoder over an explicit backend chain, tried in order.
    pub fn with_backends(backends: Vec<Box<dyn GeocodeBackend>>, policy: FailurePolicy) -> Self {
        Self {
            backends,
            cache: GeocodeCache::new(),
            policy,
        }
    }

    /// Resolve an address. Never fails: misses and backend failures are
    /// both reported as `None`.
    pub fn geocode(&mut self, address: &str) -> Option<GeoPoint> {
        if let Some(memo) = self.cache.get(address) {
            return memo;
        }

        let result = if address.trim().is_empty() {
            None
        } else {
            self.query_backends(address)
        };

        self.cache.put(address, result.clone());
        result
    }

    fn query_backends(&self, address: &str) -> Option<GeoPoint> {
        for backend in &self.backends {
            match Attempt::from(backend.lookup(address)) {
                Attempt::Hit(point) => {
                    tracing::debug!(
                        backend = backend.name(),
                        address,
                        lat = point.lat,
                        lon = point.lon,
                        "geocoded"
                    );
                    return Some(point);
                }
                Attempt::Miss => {
                    tracing::debug!(backend = backend.name(), address, "no match");
                }
                Attempt::Failure(e) => {
                    tracing::warn!(backend = backend.name(), address, "geocoding failed: {}", e);
                    if self.policy == FailurePolicy::ShortCircuit {
                        return None;
                    }
                }
            }
        }
        None
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn cache(&self) -> &GeocodeCache {
        &self.cache
    }
}
