//! Geodesic distance between two points on the Earth's surface.
//!
//! Karney's algorithm on the WGS-84 ellipsoid (via `geo`), accurate to a few
//! nanometres and convergent for every pair of points, antipodes included.

use geo::{GeodesicDistance, Point};
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

impl Coord {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// True when latitude is within ±90 and longitude within ±180.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }

    fn to_point(self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

/// Geodesic distance in kilometres between two points.
pub fn distance_km(p1: Coord, p2: Coord) -> f64 {
    p1.to_point().geodesic_distance(&p2.to_point()) / 1000.0
}
