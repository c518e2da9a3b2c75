//! Route assembly into legs and navigation steps.
//!
//! Turns an ordered point sequence (origin, sequenced waypoints, destination)
//! into a [`Route`]: one leg per consecutive pair, per-leg distance and
//! duration, and a flattened step sequence for the tracker. Also generates
//! informational alternative routes from a qualifying superset of waypoints.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::geo::haversine_distance;
use crate::sequencer::sequence_waypoints;
use crate::transport::{SpeedModel, TransportMode};
use crate::{Coordinate, Route, RouteLeg, RouteStep, ScoredWaypoint};

/// Assemble a route through the sequenced waypoints.
///
/// Builds one leg for each consecutive pair of points and one step per leg
/// (a real directions backend would decompose a leg into multiple
/// turn-by-turn steps; the step shape already supports that). Totals are the
/// sums over all legs.
///
/// An empty waypoint list produces the single direct leg
/// origin -> destination.
pub fn assemble_route(
    origin: Coordinate,
    destination: Coordinate,
    sequenced: &[ScoredWaypoint],
    mode: TransportMode,
    speeds: &dyn SpeedModel,
) -> Route {
    let mut points: Vec<(Coordinate, Option<String>)> = Vec::with_capacity(sequenced.len() + 2);
    points.push((origin, None));
    for wp in sequenced {
        points.push((wp.coordinate(), Some(wp.id().to_string())));
    }
    points.push((destination, None));

    let mut legs = Vec::with_capacity(points.len() - 1);
    let mut total_distance = 0.0;
    let mut total_duration = 0.0;

    for pair in points.windows(2) {
        let (start, _) = pair[0];
        let (end, ref waypoint_id) = pair[1];

        let distance = haversine_distance(&start, &end);
        let duration = speeds.duration(distance, mode);

        let step = RouteStep {
            start,
            end,
            distance,
            duration,
            waypoint_id: waypoint_id.clone(),
        };

        total_distance += distance;
        total_duration += duration;

        legs.push(RouteLeg {
            distance,
            duration,
            steps: vec![step],
        });
    }

    Route {
        legs,
        waypoints: sequenced.to_vec(),
        total_distance,
        total_duration,
    }
}

/// How alternative routes choose their waypoint subsets.
///
/// The source behavior this replaces used uncontrolled randomness; both
/// strategies here are reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AlternativeStrategy {
    /// Sample a random subset (50-90% of the superset) per alternative,
    /// driven by an explicit seed.
    SeededSubsets { seed: u64 },
    /// Alternative `m` drops the `m + 1` lowest-scored waypoints.
    DropLowestScored,
}

/// Configuration for alternative-route generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeConfig {
    /// Maximum number of additional routes to produce.
    /// Default: 2
    pub max_alternatives: usize,
    /// Subset selection strategy. Default: seeded sampling with seed 0.
    pub strategy: AlternativeStrategy,
}

impl Default for AlternativeConfig {
    fn default() -> Self {
        Self {
            max_alternatives: 2,
            strategy: AlternativeStrategy::SeededSubsets { seed: 0 },
        }
    }
}

/// Generate up to `config.max_alternatives` alternative routes from a
/// qualifying waypoint superset.
///
/// Each alternative re-runs sequencing and assembly over its subset. The
/// routes are informational: they are not guaranteed distinct from each other
/// or from the primary route. An empty superset yields no alternatives.
pub fn alternative_routes(
    origin: Coordinate,
    destination: Coordinate,
    superset: &[ScoredWaypoint],
    mode: TransportMode,
    speeds: &dyn SpeedModel,
    config: &AlternativeConfig,
) -> Vec<Route> {
    if superset.is_empty() || config.max_alternatives == 0 {
        return Vec::new();
    }

    match config.strategy {
        AlternativeStrategy::SeededSubsets { seed } => {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..config.max_alternatives)
                .map(|_| {
                    let fraction = rng.gen_range(0.5..0.9);
                    let size = ((superset.len() as f64 * fraction).round() as usize).max(1);
                    let subset: Vec<ScoredWaypoint> = superset
                        .choose_multiple(&mut rng, size)
                        .cloned()
                        .collect();
                    build_alternative(origin, destination, subset, mode, speeds)
                })
                .collect()
        }
        AlternativeStrategy::DropLowestScored => (0..config.max_alternatives)
            .filter_map(|m| {
                let keep = superset.len().checked_sub(m + 1)?;
                if keep == 0 {
                    return None;
                }
                // Selector output is ordered by score, so truncation drops
                // the lowest-scored tail
                let subset: Vec<ScoredWaypoint> = superset[..keep].to_vec();
                Some(build_alternative(origin, destination, subset, mode, speeds))
            })
            .collect(),
    }
}

fn build_alternative(
    origin: Coordinate,
    destination: Coordinate,
    subset: Vec<ScoredWaypoint>,
    mode: TransportMode,
    speeds: &dyn SpeedModel,
) -> Route {
    let sequenced = sequence_waypoints(origin, subset);
    assemble_route(origin, destination, &sequenced, mode, speeds)
}
