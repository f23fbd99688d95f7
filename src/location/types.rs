//! Core types for the geocoding subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::distance::Coord;

/// Default per-request timeout for every backend.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default `User-Agent` sent to the geocoding services.
pub const DEFAULT_USER_AGENT: &str = concat!("filmmap/", env!("CARGO_PKG_VERSION"));

/// A geocoded location: coordinates plus the address the backend reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
    /// Canonical address as reported by the backend (e.g. "New York, NY, USA")
    pub address: String,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64, address: impl Into<String>) -> Self {
        Self {
            lat,
            lon,
            address: address.into(),
        }
    }

    pub fn coord(&self) -> Coord {
        Coord::new(self.lat, self.lon)
    }
}

/// Outcome of asking a single backend about an address.
#[derive(Debug)]
pub enum Attempt {
    Hit(GeoPoint),
    Miss,
    Failure(LocationError),
}

impl From<Result<Option<GeoPoint>, LocationError>> for Attempt {
    fn from(result: Result<Option<GeoPoint>, LocationError>) -> Self {
        match result {
            Ok(Some(point)) => Self::Hit(point),
            Ok(None) => Self::Miss,
            Err(e) => Self::Failure(e),
        }
    }
}

/// What the geocoder does when a backend fails rather than misses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Move on to the next backend.
    #[default]
    FallThrough,
    /// Give up on the address; the lookup is absent.
    ShortCircuit,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fall-through" | "fallthrough" => Ok(Self::FallThrough),
            "short-circuit" | "shortcircuit" | "strict" => Ok(Self::ShortCircuit),
            _ => Err(format!(
                "Unknown failover policy '{}'. Use 'fall-through' or 'short-circuit'.",
                s
            )),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FallThrough => write!(f, "fall-through"),
            Self::ShortCircuit => write!(f, "short-circuit"),
        }
    }
}

/// Settings shared by the geocoder and its network backends.
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    pub timeout: Duration,
    pub user_agent: String,
    pub failure_policy: FailurePolicy,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl GeocoderConfig {
    /// Rejects a zero timeout and a blank user agent.
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout.is_zero() {
            return Err("--timeout must be at least 1 second".into());
        }
        if self.user_agent.trim().is_empty() {
            return Err("--user-agent must not be empty".into());
        }
        Ok(())
    }
}

/// Backend errors. None of these escape the geocoder.
#[derive(Debug)]
pub enum LocationError {
    Network(String),
    Timeout(String),
    InvalidResponse(String),
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::Timeout(msg) => write!(f, "Request timed out: {}", msg),
            Self::InvalidResponse(msg) => write!(f, "Invalid API response: {}", msg),
        }
    }
}

impl std::error::Error for LocationError {}
