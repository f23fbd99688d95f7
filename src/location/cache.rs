//! In-process memo of geocoding results.
//!
//! Keys are the exact address strings; absent results are remembered too.
//! Nothing is evicted and nothing is written to disk.

use super::types::GeoPoint;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct GeocodeCache {
    entries: HashMap<String, Option<GeoPoint>>,
    hits: usize,
    misses: usize,
}

impl GeocodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outer `None`: never looked up. `Some(None)`: looked up, unresolved.
    pub fn get(&mut self, address: &str) -> Option<Option<GeoPoint>> {
        match self.entries.get(address) {
            Some(entry) => {
                self.hits += 1;
                Some(entry.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn put(&mut self, address: &str, result: Option<GeoPoint>) {
        self.entries.insert(address.to_string(), result);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups answered from memory.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Lookups that had to go to the backends.
    pub fn misses(&self) -> usize {
        self.misses
    }
}
