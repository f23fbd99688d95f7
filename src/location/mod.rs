//! Geocoding subsystem for filmmap.
//!
//! Turns free-text filming locations into coordinates through an ordered
//! chain of network backends, memoizing every answer for the run.

pub mod cache;
pub mod providers;
pub mod resolver;
pub mod types;

pub use cache::GeocodeCache;
pub use providers::{default_backends, ArcGis, GeocodeBackend, Nominatim};
pub use resolver::Geocoder;
pub use types::{
    Attempt, FailurePolicy, GeoPoint, GeocoderConfig, LocationError, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT,
};
