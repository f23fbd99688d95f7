//! The full batch run: year filter → parse → geocode and rank → layers.

use serde::Serialize;

use crate::dataset::filter_by_year;
use crate::distance::Coord;
use crate::location::Geocoder;
use crate::parser::parse_records;
use crate::ranking::{rank, MapLayers, RankStats};

/// Everything the renderer and the CLI summary need from a run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub year: i32,
    pub reference: Coord,
    /// Lines that passed the year filter.
    pub matched: usize,
    pub stats: RankStats,
    pub layers: MapLayers,
}

/// Run the pipeline over already loaded dataset lines.
pub fn run<S: AsRef<str>>(
    lines: &[S],
    year: i32,
    reference: Coord,
    layer_size: usize,
    geocoder: &mut Geocoder,
) -> PipelineOutput {
    let matched = filter_by_year(lines, year);
    tracing::info!(year, total = lines.len(), matched = matched.len(), "year filter applied");

    let pairs = parse_records(matched.iter().copied());
    let ranking = rank(&pairs, reference, geocoder);
    tracing::info!(
        ranked = ranking.entries.len(),
        untitled = ranking.stats.untitled,
        unresolved = ranking.stats.unresolved,
        "ranking complete"
    );

    PipelineOutput {
        year,
        reference,
        matched: matched.len(),
        stats: ranking.stats,
        layers: MapLayers::partition(ranking.entries, layer_size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::distance_km;
    use crate::location::resolver::tests::StubBackend;
    use crate::location::{FailurePolicy, GeocodeBackend};
    use crate::ranking::DEFAULT_LAYER_SIZE;

    const DATASET: &[&str] = &[
        "\"Far East\" (2015)\t\tNew York City, New York, USA\t(street scenes)",
        "\"Old One\" (1999)\t\tBoise, Idaho, USA",
        "\"North Shore\" (2015) {Pilot (#1.1)}\tVancouver, British Columbia, Canada",
        "\"Sunset\" (2015)\t\t\tLos Angeles, California, USA",
        "Broken \"Quote (2015)\tParis, France",
    ];

    fn geocoder() -> Geocoder {
        let primary = StubBackend::new("primary")
            .with("Vancouver, British Columbia, Canada", 49.2604, -123.1134)
            .with("Boise, Idaho, USA", 43.6150, -116.2023);
        let secondary = StubBackend::new("secondary")
            .with("New York City, New York, USA", 40.7128, -74.0060)
            .with("Los Angeles, California, USA", 34.0522, -118.2437)
            .with("Paris, France", 48.8566, 2.3522);
        Geocoder::with_backends(
            vec![
                Box::new(primary) as Box<dyn GeocodeBackend>,
                Box::new(secondary) as Box<dyn GeocodeBackend>,
            ],
            FailurePolicy::ShortCircuit,
        )
    }

    #[test]
    fn test_end_to_end_order() {
        let reference = Coord::new(43.0, -120.0);
        let mut geocoder = geocoder();
        let output = run(DATASET, 2015, reference, DEFAULT_LAYER_SIZE, &mut geocoder);

        assert_eq!(output.matched, 4);
        assert_eq!(output.stats.untitled, 1);

        let expected = [
            ("North Shore", Coord::new(49.2604, -123.1134)),
            ("Sunset", Coord::new(34.0522, -118.2437)),
            ("Far East", Coord::new(40.7128, -74.0060)),
        ];
        let titles: Vec<&str> = output.layers.all.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, expected.iter().map(|(t, _)| *t).collect::<Vec<_>>());

        for (entry, (_, coord)) in output.layers.all.iter().zip(expected) {
            let manual = distance_km(reference, coord);
            assert!((entry.distance_km - manual).abs() < 1e-9);
        }
        assert!(output.layers.all[0].distance_km < output.layers.all[1].distance_km);
        assert!(output.layers.all[1].distance_km < output.layers.all[2].distance_km);

        // Three entries: every layer is the full list.
        assert_eq!(output.layers.closest, output.layers.all);
        assert_eq!(output.layers.farthest, output.layers.all);
    }

    #[test]
    fn test_end_to_end_no_matches() {
        let mut geocoder = geocoder();
        let output = run(DATASET, 1888, Coord::new(0.0, 0.0), DEFAULT_LAYER_SIZE, &mut geocoder);
        assert_eq!(output.matched, 0);
        assert!(output.layers.all.is_empty());
        assert!(output.layers.closest.is_empty());
        assert!(output.layers.farthest.is_empty());
    }

    #[test]
    fn test_output_serializes() {
        let mut geocoder = geocoder();
        let output = run(DATASET, 1999, Coord::new(43.0, -120.0), DEFAULT_LAYER_SIZE, &mut geocoder);
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["year"], 1999);
        assert_eq!(json["layers"]["all"][0]["title"], "Old One");
        assert_eq!(json["layers"]["all"][0]["point"]["address"], "Boise, Idaho, USA (primary)");
    }
}
