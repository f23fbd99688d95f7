//! Geocoding backends: ArcGIS World geocoder and OpenStreetMap Nominatim.

use super::types::{GeoPoint, GeocoderConfig, LocationError};
use crate::distance::Coord;
use serde::Deserialize;
use std::io;

const ARCGIS_URL: &str =
    "https://geocode.arcgis.com/arcgis/rest/services/World/GeocodeServer/findAddressCandidates";
const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";

/// A service that can turn free text into coordinates.
///
/// `Ok(None)` means the service answered but found nothing; `Err` means the
/// service could not be asked or its answer could not be understood.
pub trait GeocodeBackend {
    fn name(&self) -> &str;
    fn lookup(&self, address: &str) -> Result<Option<GeoPoint>, LocationError>;
}

/// The standard backend chain: ArcGIS first, Nominatim second.
pub fn default_backends(config: &GeocoderConfig) -> Vec<Box<dyn GeocodeBackend>> {
    vec![
        Box::new(ArcGis::new(config)),
        Box::new(Nominatim::new(config)),
    ]
}

fn build_agent(config: &GeocoderConfig) -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout(config.timeout)
        .user_agent(&config.user_agent)
        .build()
}

/// Reject NaN, infinite and out-of-range coordinates from a backend.
fn checked_point(lat: f64, lon: f64, address: String) -> Result<GeoPoint, LocationError> {
    if !Coord::new(lat, lon).is_valid() {
        return Err(LocationError::InvalidResponse(format!(
            "coordinates out of range: {}, {}",
            lat, lon
        )));
    }
    Ok(GeoPoint::new(lat, lon, address))
}

// ─── ArcGIS ─────────────────────────────────────────────────────

pub struct ArcGis {
    agent: ureq::Agent,
}

impl ArcGis {
    pub fn new(config: &GeocoderConfig) -> Self {
        Self {
            agent: build_agent(config),
        }
    }
}

#[derive(Deserialize, Debug)]
struct ArcGisResponse {
    #[serde(default)]
    candidates: Vec<ArcGisCandidate>,
    #[serde(default)]
    error: Option<ArcGisError>,
}

#[derive(Deserialize, Debug)]
struct ArcGisCandidate {
    address: String,
    location: ArcGisLocation,
}

#[derive(Deserialize, Debug)]
struct ArcGisLocation {
    x: f64,
    y: f64,
}

#[derive(Deserialize, Debug)]
struct ArcGisError {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: String,
}

fn arcgis_to_point(response: ArcGisResponse) -> Result<Option<GeoPoint>, LocationError> {
    if let Some(err) = response.error {
        return Err(LocationError::InvalidResponse(format!(
            "ArcGIS error {}: {}",
            err.code.unwrap_or_default(),
            err.message
        )));
    }
    response
        .candidates
        .into_iter()
        .next()
        .map(|c| checked_point(c.location.y, c.location.x, c.address))
        .transpose()
}

impl GeocodeBackend for ArcGis {
    fn name(&self) -> &str {
        "ArcGIS"
    }

    fn lookup(&self, address: &str) -> Result<Option<GeoPoint>, LocationError> {
        let response = self
            .agent
            .get(ARCGIS_URL)
            .query("singleLine", address)
            .query("f", "json")
            .query("maxLocations", "1")
            .call()
            .map_err(classify_error)?;

        let body: ArcGisResponse = response
            .into_json()
            .map_err(|e| LocationError::InvalidResponse(e.to_string()))?;

        arcgis_to_point(body)
    }
}

// ─── Nominatim ──────────────────────────────────────────────────

pub struct Nominatim {
    agent: ureq::Agent,
}

impl Nominatim {
    pub fn new(config: &GeocoderConfig) -> Self {
        Self {
            agent: build_agent(config),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
struct NominatimResult {
    lat: String,
    lon: String,
    display_name: String,
}

fn nominatim_to_point(results: Vec<NominatimResult>) -> Result<Option<GeoPoint>, LocationError> {
    let Some(top) = results.into_iter().next() else {
        return Ok(None);
    };
    let lat: f64 = top
        .lat
        .parse()
        .map_err(|_| LocationError::InvalidResponse(format!("bad latitude '{}'", top.lat)))?;
    let lon: f64 = top
        .lon
        .parse()
        .map_err(|_| LocationError::InvalidResponse(format!("bad longitude '{}'", top.lon)))?;
    checked_point(lat, lon, top.display_name).map(Some)
}

impl GeocodeBackend for Nominatim {
    fn name(&self) -> &str {
        "Nominatim"
    }

    fn lookup(&self, address: &str) -> Result<Option<GeoPoint>, LocationError> {
        let response = self
            .agent
            .get(NOMINATIM_URL)
            .query("q", address)
            .query("format", "json")
            .query("limit", "1")
            .call()
            .map_err(classify_error)?;

        let results: Vec<NominatimResult> = response
            .into_json()
            .map_err(|e| LocationError::InvalidResponse(e.to_string()))?;

        nominatim_to_point(results)
    }
}

// ─── Error mapping ──────────────────────────────────────────────

fn classify_error(e: ureq::Error) -> LocationError {
    match e {
        ureq::Error::Status(code, response) => {
            LocationError::Network(format!("HTTP {} from {}", code, response.get_url()))
        }
        ureq::Error::Transport(transport) => {
            if is_timeout(&transport) {
                LocationError::Timeout(transport.to_string())
            } else {
                LocationError::Network(transport.to_string())
            }
        }
    }
}

fn is_timeout(transport: &ureq::Transport) -> bool {
    let mut source = std::error::Error::source(transport);
    while let Some(err) = source {
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            if matches!(io_err.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) {
                return true;
            }
        }
        source = err.source();
    }
    false
}
