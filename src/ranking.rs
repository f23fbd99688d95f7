//! Ranking engine: geocode, measure, sort, and split into map layers.

use serde::Serialize;

use crate::distance::{distance_km, Coord};
use crate::location::{GeoPoint, Geocoder};
use crate::parser::FilmLocationPair;

/// Number of entries in the closest and farthest layers.
pub const DEFAULT_LAYER_SIZE: usize = 10;

/// A resolved film location with its distance from the reference point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub title: String,
    pub point: GeoPoint,
    pub distance_km: f64,
}

/// Why records fell out of the ranking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RankStats {
    pub considered: usize,
    pub untitled: usize,
    pub no_location: usize,
    pub unresolved: usize,
}

/// Entries sorted by ascending distance, plus drop counts.
#[derive(Debug, Clone, Default)]
pub struct Ranking {
    pub entries: Vec<RankedEntry>,
    pub stats: RankStats,
}

/// Resolve every pair and sort the survivors by distance from `reference`.
///
/// Records without a title or without a location are dropped before any
/// lookup. Equal distances keep their input order.
pub fn rank(pairs: &[FilmLocationPair], reference: Coord, geocoder: &mut Geocoder) -> Ranking {
    let mut stats = RankStats {
        considered: pairs.len(),
        ..RankStats::default()
    };
    let mut entries = Vec::with_capacity(pairs.len());

    for pair in pairs {
        let Some(title) = pair.title.as_deref() else {
            tracing::debug!(location = %pair.location, "dropping record without a readable title");
            stats.untitled += 1;
            continue;
        };
        if pair.location.is_empty() {
            tracing::debug!(title, "dropping record without a location");
            stats.no_location += 1;
            continue;
        }
        let Some(point) = geocoder.geocode(&pair.location) else {
            stats.unresolved += 1;
            continue;
        };

        let distance_km = distance_km(reference, point.coord());
        entries.push(RankedEntry {
            title: title.to_string(),
            point,
            distance_km,
        });
    }

    sort_by_distance(&mut entries);
    Ranking { entries, stats }
}

/// Stable ascending sort on `distance_km`.
pub fn sort_by_distance(entries: &mut [RankedEntry]) {
    entries.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
}

/// The three overlays drawn on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLayers {
    pub all: Vec<RankedEntry>,
    pub closest: Vec<RankedEntry>,
    pub farthest: Vec<RankedEntry>,
}

impl MapLayers {
    /// Split a distance-sorted list. With more than `n` entries the closest
    /// layer is the first `n` and the farthest the last `n`; otherwise both
    /// are the whole list.
    pub fn partition(ranked: Vec<RankedEntry>, n: usize) -> Self {
        let (closest, farthest) = if ranked.len() > n {
            (
                ranked[..n].to_vec(),
                ranked[ranked.len() - n..].to_vec(),
            )
        } else {
            (ranked.clone(), ranked.clone())
        };
        Self {
            all: ranked,
            closest,
            farthest,
        }
    }
}
