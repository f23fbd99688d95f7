//! HTML map renderer.
//!
//! Produces a single Leaflet page with three toggleable overlays: every
//! match, the closest entries, and the farthest entries. Marker data is
//! embedded as JSON and popups are assembled from text nodes in the browser.

use serde::Serialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::distance::Coord;
use crate::pipeline::PipelineOutput;
use crate::ranking::{MapLayers, RankedEntry};

pub const DEFAULT_OUTPUT: &str = "filmsmap.html";

const ZOOM_START: u8 = 4;
const COLOR_ALL: &str = "darkblue";
const COLOR_CLOSEST: &str = "purple";
const COLOR_FARTHEST: &str = "red";

/// What gets drawn: a centre point, the year, and the three layers.
#[derive(Debug, Clone, Copy)]
pub struct MapScene<'a> {
    pub reference: Coord,
    pub year: i32,
    pub layers: &'a MapLayers,
}

impl<'a> MapScene<'a> {
    pub fn from_output(output: &'a PipelineOutput) -> Self {
        Self {
            reference: output.reference,
            year: output.year,
            layers: &output.layers,
        }
    }
}

#[derive(Debug)]
pub struct RenderError {
    pub path: PathBuf,
    pub source: io::Error,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cannot write map '{}': {}", self.path.display(), self.source)
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

// ─── Embedded payload ───────────────────────────────────────────

#[derive(Serialize)]
struct Payload<'a> {
    center: [f64; 2],
    zoom: u8,
    layers: Vec<LayerPayload<'a>>,
}

#[derive(Serialize)]
struct LayerPayload<'a> {
    name: String,
    color: &'static str,
    markers: Vec<MarkerPayload<'a>>,
}

#[derive(Serialize)]
struct MarkerPayload<'a> {
    lat: f64,
    lon: f64,
    title: &'a str,
    lat_label: String,
    lon_label: String,
    address: &'a str,
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

fn marker(entry: &RankedEntry) -> MarkerPayload<'_> {
    MarkerPayload {
        lat: entry.point.lat,
        lon: entry.point.lon,
        title: &entry.title,
        lat_label: round3(entry.point.lat).to_string(),
        lon_label: round3(entry.point.lon).to_string(),
        address: &entry.point.address,
    }
}

fn layer<'a>(name: String, color: &'static str, entries: &'a [RankedEntry]) -> LayerPayload<'a> {
    LayerPayload {
        name,
        color,
        markers: entries.iter().map(marker).collect(),
    }
}

/// Overlay names as shown in the layer control.
pub fn layer_names(year: i32) -> [String; 3] {
    [
        format!("All filming locations in {}", year),
        format!("Closest filming locations in {}", year),
        format!("Furthermost filming locations in {}", year),
    ]
}

/// Render the scene as a complete HTML document.
pub fn render_html(scene: &MapScene<'_>) -> String {
    let [all_name, closest_name, farthest_name] = layer_names(scene.year);
    let payload = Payload {
        center: [scene.reference.lat, scene.reference.lon],
        zoom: ZOOM_START,
        layers: vec![
            layer(all_name, COLOR_ALL, &scene.layers.all),
            layer(closest_name, COLOR_CLOSEST, &scene.layers.closest),
            layer(farthest_name, COLOR_FARTHEST, &scene.layers.farthest),
        ],
    };

    // Serializing plain structs of strings and floats cannot fail; NaN
    // coordinates become null.
    let json = serde_json::to_string(&payload).unwrap_or_else(|_| "null".into());
    let json = json.replace("</", "<\\/").replace("<!", "<\\u0021");

    TEMPLATE
        .replace("__YEAR__", &scene.year.to_string())
        .replace("__MAP_DATA__", &json)
}

/// Render and write the map to `path`.
pub fn save_html(scene: &MapScene<'_>, path: &Path) -> Result<(), RenderError> {
    fs::write(path, render_html(scene)).map_err(|source| RenderError {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "map written");
    Ok(())
}

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Filming locations in __YEAR__</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>
html, body { height: 100%; margin: 0; }
#map { position: absolute; top: 0; bottom: 0; left: 0; right: 0; }
</style>
</head>
<body>
<div id="map"></div>
<script>
const data = __MAP_DATA__;

function popup(m) {
  const div = document.createElement("div");
  const lines = [
    "Film name:", m.title,
    "Coordinates:", "latitude: " + m.lat_label, "longitude: " + m.lon_label,
    "Place:", m.address,
  ];
  lines.forEach(function (text, i) {
    if (i > 0) div.appendChild(document.createElement("br"));
    div.appendChild(document.createTextNode(text));
  });
  return div;
}

const map = L.map("map").setView(data.center, data.zoom);
L.tileLayer("https://tile.openstreetmap.org/{z}/{x}/{y}.png", {
  maxZoom: 19,
  attribution: "&copy; OpenStreetMap contributors",
}).addTo(map);

const overlays = {};
data.layers.forEach(function (layer) {
  const group = L.featureGroup();
  layer.markers.forEach(function (m) {
    L.circleMarker([m.lat, m.lon], {
      radius: 7,
      color: layer.color,
      fillColor: layer.color,
      fillOpacity: 0.8,
    }).bindPopup(popup(m), { maxWidth: 220 }).addTo(group);
  });
  group.addTo(map);
  overlays[layer.name] = group;
});
L.control.layers(null, overlays, { collapsed: false }).addTo(map);
</script>
</body>
</html>
"#;
