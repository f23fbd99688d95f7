use clap::Parser;
use filmmap::dataset;
use filmmap::distance::Coord;
use filmmap::location::{FailurePolicy, Geocoder, GeocoderConfig, DEFAULT_USER_AGENT};
use filmmap::pipeline::{self, PipelineOutput};
use filmmap::ranking::{RankedEntry, DEFAULT_LAYER_SIZE};
use filmmap::render::{self, MapScene, DEFAULT_OUTPUT};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// filmmap — where were the films of a given year shot?
///
/// Reads a locations list, keeps the records of YEAR, geocodes them, and
/// writes an HTML map with all locations, the closest ones to LAT/LON,
/// and the farthest ones.
///
/// Examples:
///   filmmap 2015 49.83 24.02 locations.list
///   filmmap 1969 43.0 -120.0 locations.list --output moon.html
///   filmmap 2001 51.5 -0.12 locations.list --failover short-circuit --json
#[derive(Parser)]
#[command(name = "filmmap", version, about, long_about = None, allow_negative_numbers = true)]
struct Cli {
    /// Year of the films to map.
    year: i32,

    /// Latitude of the reference point (-90 to 90).
    lat: f64,

    /// Longitude of the reference point (-180 to 180).
    lon: f64,

    /// Path to the locations dataset.
    path_to_dataset: PathBuf,

    /// Where to write the HTML map.
    #[arg(long, short = 'o', default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Per-request geocoder timeout in seconds.
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// User-Agent sent to the geocoding services.
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// What to do when a geocoder errors: "fall-through" (try the next one)
    /// or "short-circuit" (give up on that location).
    #[arg(long, default_value = "fall-through")]
    failover: FailurePolicy,

    /// Entries in the closest and farthest layers.
    #[arg(long, default_value_t = DEFAULT_LAYER_SIZE)]
    layer_size: usize,

    /// Also print the ranked layers as JSON to stdout.
    #[arg(long)]
    json: bool,

    /// Log pipeline progress.
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let reference = Coord::new(cli.lat, cli.lon);
    if !reference.is_valid() {
        eprintln!("Error: Invalid coordinates. Lat: -90..90, Lon: -180..180");
        std::process::exit(1);
    }
    if cli.layer_size == 0 {
        eprintln!("Error: --layer-size must be at least 1");
        std::process::exit(1);
    }

    // ── Load ────────────────────────────────────────────────────

    let lines = dataset::load_lines(&cli.path_to_dataset).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    // ── Geocode and rank ────────────────────────────────────────

    let config = GeocoderConfig {
        timeout: Duration::from_secs(cli.timeout),
        user_agent: cli.user_agent.clone(),
        failure_policy: cli.failover,
    };
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    let mut geocoder = Geocoder::new(&config);
    let output = pipeline::run(&lines, cli.year, reference, cli.layer_size, &mut geocoder);

    // ── Render ──────────────────────────────────────────────────

    let scene = MapScene::from_output(&output);
    if let Err(e) = render::save_html(&scene, &cli.output) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    eprint!("{}", summary(&output, &geocoder, &cli.output));

    if cli.json {
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "filmmap=info" } else { "filmmap=warn" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn summary(output: &PipelineOutput, geocoder: &Geocoder, path: &std::path::Path) -> String {
    let mut s = String::new();
    let stats = &output.stats;
    s.push_str(&format!(
        "  Year {}: {} matching records, {} mapped\n",
        output.year,
        output.matched,
        output.layers.all.len()
    ));
    s.push_str(&format!(
        "  Dropped: {} untitled, {} without location, {} not geocoded\n",
        stats.untitled, stats.no_location, stats.unresolved
    ));
    s.push_str(&format!(
        "  Geocoder: {} distinct lookups, {} answered from memory ({})\n",
        geocoder.cache().len(),
        geocoder.cache().hits(),
        geocoder.policy()
    ));
    if let Some(nearest) = output.layers.closest.first() {
        s.push_str(&format!("  Closest:  {}\n", entry_line(nearest)));
    }
    if let Some(farthest) = output.layers.farthest.last() {
        s.push_str(&format!("  Farthest: {}\n", entry_line(farthest)));
    }
    s.push_str(&format!("  Map written to {}\n", path.display()));
    s
}

fn entry_line(entry: &RankedEntry) -> String {
    format!(
        "{} \u{2014} {} ({:.0} km)",
        entry.title, entry.point.address, entry.distance_km
    )
}
