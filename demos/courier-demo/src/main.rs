//! courier-demo — end-to-end tour of the streetmap workspace.
//!
//! Builds a small synthetic downtown grid (or loads a CSV map directory),
//! prints one point-to-point route with its directions, then plans a
//! courier tour over a handful of deliveries.
//!
//! ```text
//! courier-demo [MAP_DIR] [CONFIG_JSON]
//! ```
//!
//! `CONFIG_JSON` holds a `RoutingConfig`; missing fields take their
//! defaults.  Set `RUST_LOG=debug` to see per-search logging.

mod network;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, ensure};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sm_core::{IntersectionId, RoutingConfig};
use sm_courier::{Delivery, Tour, plan_courier_tour};
use sm_graph::{StreetMap, load_csv_dir};
use sm_route::{directions, find_path};

use network::build_downtown;

// ── Scenario ──────────────────────────────────────────────────────────────────

struct Scenario {
    map:        StreetMap,
    route:      (IntersectionId, IntersectionId),
    deliveries: Vec<Delivery>,
    depots:     Vec<IntersectionId>,
}

/// Fixed errands on the synthetic grid.
fn downtown_scenario() -> Result<Scenario> {
    let (map, g) = build_downtown()?;
    Ok(Scenario {
        map,
        route: (g[0][0], g[2][3]),
        deliveries: vec![
            Delivery::new(g[1][0], g[2][2]),
            Delivery::new(g[0][3], g[1][1]),
            Delivery::new(g[2][1], g[0][2]),
        ],
        depots: vec![g[0][1], g[2][0]],
    })
}

/// Errands spread evenly over the ids of a loaded map.
fn loaded_scenario(dir: &Path) -> Result<Scenario> {
    let map = load_csv_dir(dir).with_context(|| format!("loading map from {}", dir.display()))?;
    let [a, b, c, _, e, f, g] = spread_ids(map.intersection_count())?;
    Ok(Scenario {
        route: (a, g),
        deliveries: vec![Delivery::new(b, f), Delivery::new(c, e)],
        depots: vec![a, g],
        map,
    })
}

/// Seven distinct ids spaced evenly over `0..n`.  Depots and stops must not
/// share an intersection, so smaller maps are rejected.
fn spread_ids(n: usize) -> Result<[IntersectionId; 7]> {
    ensure!(n >= 7, "map has {n} intersections; need at least 7");
    let mut ids = [IntersectionId(0); 7];
    for (k, id) in ids.iter_mut().enumerate() {
        *id = IntersectionId::try_from(k * (n - 1) / 6)?;
    }
    Ok(ids)
}

fn load_config(path: Option<&Path>) -> Result<RoutingConfig> {
    let config = match path {
        Some(p) => {
            let file = File::open(p).with_context(|| format!("opening {}", p.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("parsing {}", p.display()))?
        }
        None => RoutingConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

// ── Output ────────────────────────────────────────────────────────────────────

fn label(map: &StreetMap, id: IntersectionId) -> String {
    match &map.intersection(id).name {
        Some(name) => name.clone(),
        None => id.to_string(),
    }
}

fn print_tour(map: &StreetMap, tour: &Tour) {
    if tour.is_empty() {
        println!("No feasible courier tour.");
        return;
    }
    for leg in &tour.subpaths {
        println!(
            "  {:<18} -> {:<18} {:>8.1} s  {:>2} segments  ({:?})",
            label(map, leg.start),
            label(map, leg.end),
            leg.travel_time_secs,
            leg.segments.len(),
            leg.kind,
        );
    }
    println!("  total {:.1} s", tour.travel_time_secs);
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1).map(PathBuf::from);
    let map_dir = args.next();
    let config_path = args.next();

    println!("=== courier-demo ===");

    let config = load_config(config_path.as_deref())?;
    println!(
        "Turn penalty: {} s  |  tail swap window: {}  |  parallel matrix: {}",
        config.turn_penalty_secs, config.tail_swap_window, config.parallel_matrix
    );

    // 1. Street map.
    let t0 = Instant::now();
    let scenario = match map_dir.as_deref() {
        Some(dir) => loaded_scenario(dir)?,
        None => downtown_scenario()?,
    };
    let map = &scenario.map;
    println!(
        "Street map: {} intersections, {} segments, {} streets ({:.1?})",
        map.intersection_count(),
        map.segment_count(),
        map.street_count(),
        t0.elapsed()
    );
    println!();

    // 2. One route with directions.
    let (from, to) = scenario.route;
    println!("Route {} -> {}", label(map, from), label(map, to));
    match find_path(map, from, to, config.turn_penalty_secs)? {
        Some(route) => {
            println!("  {} segments, {:.1} s", route.segments.len(), route.travel_time_secs);
            for line in directions(map, from, &route.segments) {
                println!("  {line}");
            }
        }
        None => println!("  unreachable"),
    }
    println!();

    // 3. Courier tour.
    let t1 = Instant::now();
    let tour = plan_courier_tour(map, &scenario.deliveries, &scenario.depots, &config)?;
    info!(elapsed = ?t1.elapsed(), "courier planning finished");
    println!(
        "Courier tour: {} deliveries, {} depots",
        scenario.deliveries.len(),
        scenario.depots.len()
    );
    print_tour(map, &tour);

    Ok(())
}
