//! waymark CLI - Debug tool for route planning and navigation tracking
//!
//! Usage:
//!   waymark-cli plan <candidates.json> --from <lat,lng> --to <lat,lng> [--mode <mode>]
//!   waymark-cli simulate <candidates.json> --from <lat,lng> --to <lat,lng> [--mode <mode>]
//!
//! The candidates file is a JSON array of waypoint records:
//!   [{"id": "cafe-1", "coordinate": {"latitude": 0.01, "longitude": 0.5}, "importance": 5}]
//!
//! `plan` prints the selected waypoints, legs, and any alternative routes.
//! `simulate` plans a route and replays position updates along it through the
//! navigation tracker, printing a snapshot per update.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use waymark::planner::{plan_route, plan_route_with_alternatives, PlanRequest};
use waymark::{
    AlternativeConfig, AlternativeStrategy, Coordinate, NavigationTracker, Route, SelectorConfig,
    SessionStatus, TransportMode, WaypointCandidate,
};

#[derive(Parser)]
#[command(name = "waymark-cli")]
#[command(about = "Debug tool for detour-aware route planning", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose debug output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a route through stored waypoint candidates
    Plan {
        /// JSON file containing waypoint candidates
        candidates: PathBuf,

        /// Origin as "lat,lng"
        #[arg(long)]
        from: String,

        /// Destination as "lat,lng"
        #[arg(long)]
        to: String,

        /// Travel mode (walking, bicycling, transit, driving)
        #[arg(long, default_value = "driving")]
        mode: String,

        /// Maximum detour budget in minutes
        #[arg(long, default_value = "30")]
        max_detour: f64,

        /// Maximum number of waypoints on the route
        #[arg(long, default_value = "10")]
        max_stops: usize,

        /// Number of alternative routes to generate
        #[arg(long, default_value = "0")]
        alternatives: usize,

        /// Seed for alternative-route sampling
        #[arg(long, default_value = "0")]
        seed: u64,
    },

    /// Plan a route and replay a simulated drive through the tracker
    Simulate {
        /// JSON file containing waypoint candidates
        candidates: PathBuf,

        /// Origin as "lat,lng"
        #[arg(long)]
        from: String,

        /// Destination as "lat,lng"
        #[arg(long)]
        to: String,

        /// Travel mode (walking, bicycling, transit, driving)
        #[arg(long, default_value = "driving")]
        mode: String,

        /// Maximum detour budget in minutes
        #[arg(long, default_value = "30")]
        max_detour: f64,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let result = match cli.command {
        Commands::Plan {
            candidates,
            from,
            to,
            mode,
            max_detour,
            max_stops,
            alternatives,
            seed,
        } => run_plan(
            &candidates,
            &from,
            &to,
            &mode,
            max_detour,
            max_stops,
            alternatives,
            seed,
        ),
        Commands::Simulate {
            candidates,
            from,
            to,
            mode,
            max_detour,
        } => run_simulate(&candidates, &from, &to, &mode, max_detour),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_candidates(path: &PathBuf) -> Result<Vec<WaypointCandidate>, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("reading {}: {}", path.display(), e))?;
    serde_json::from_str(&raw).map_err(|e| format!("parsing {}: {}", path.display(), e))
}

fn parse_coordinate(s: &str) -> Result<Coordinate, String> {
    let (lat, lng) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"lat,lng\", got \"{}\"", s))?;
    let latitude: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("latitude \"{}\": {}", lat, e))?;
    let longitude: f64 = lng
        .trim()
        .parse()
        .map_err(|e| format!("longitude \"{}\": {}", lng, e))?;
    Coordinate::new(latitude, longitude)
        .validated()
        .map_err(|e| e.to_string())
}

fn build_request(
    from: &str,
    to: &str,
    mode: &str,
    max_detour: f64,
    max_stops: usize,
) -> Result<PlanRequest, String> {
    Ok(PlanRequest::new()
        .with_origin(parse_coordinate(from)?)
        .with_destination(parse_coordinate(to)?)
        .with_mode(TransportMode::parse(mode))
        .with_selector(SelectorConfig {
            max_detour_minutes: max_detour,
            max_results: max_stops,
            ..SelectorConfig::default()
        }))
}

#[allow(clippy::too_many_arguments)]
fn run_plan(
    candidates_path: &PathBuf,
    from: &str,
    to: &str,
    mode: &str,
    max_detour: f64,
    max_stops: usize,
    alternatives: usize,
    seed: u64,
) -> Result<(), String> {
    let candidates = load_candidates(candidates_path)?;
    let request = build_request(from, to, mode, max_detour, max_stops)?;

    let alt_config = AlternativeConfig {
        max_alternatives: alternatives,
        strategy: AlternativeStrategy::SeededSubsets { seed },
    };

    let routes = plan_route_with_alternatives(&request, &candidates, &alt_config)
        .map_err(|e| e.to_string())?;

    for (i, route) in routes.iter().enumerate() {
        if i == 0 {
            println!("Primary route:");
        } else {
            println!("\nAlternative {}:", i);
        }
        print_route(route);
    }

    Ok(())
}

fn print_route(route: &Route) {
    println!(
        "  {:.1} km, {:.0} min, {} stop(s)",
        route.total_distance / 1000.0,
        route.total_duration / 60.0,
        route.waypoints.len()
    );

    for wp in &route.waypoints {
        println!(
            "  stop {} - {} (score {:.1}, detour {:.1} min)",
            wp.sequence_index.map(|i| i.to_string()).unwrap_or_default(),
            wp.id(),
            wp.score,
            wp.detour_minutes
        );
    }

    for (i, leg) in route.legs.iter().enumerate() {
        let heading = leg
            .steps
            .first()
            .map(|s| waymark::initial_bearing(&s.start, &s.end))
            .unwrap_or(0.0);
        println!(
            "  leg {}: {:.1} km, {:.0} min, heading {:.0}\u{b0}",
            i,
            leg.distance / 1000.0,
            leg.duration / 60.0,
            heading
        );
    }
}

fn run_simulate(
    candidates_path: &PathBuf,
    from: &str,
    to: &str,
    mode: &str,
    max_detour: f64,
) -> Result<(), String> {
    let candidates = load_candidates(candidates_path)?;
    let request = build_request(from, to, mode, max_detour, 10)?;

    let route = plan_route(&request, &candidates).map_err(|e| e.to_string())?;
    println!("Planned route:");
    print_route(&route);

    // Replay each step's endpoint as a position update
    let positions: Vec<Coordinate> = route.steps().map(|s| s.end).collect();

    let mut tracker = NavigationTracker::new();
    tracker.start(route, request).map_err(|e| e.to_string())?;

    println!("\nSimulating {} position update(s):", positions.len());
    for position in positions {
        let snapshot = tracker
            .on_location_update(position)
            .map_err(|e| e.to_string())?;
        println!("  {}", tracker.snapshot_json());
        if snapshot.status == SessionStatus::Completed {
            println!("Arrived.");
            break;
        }
    }

    Ok(())
}
