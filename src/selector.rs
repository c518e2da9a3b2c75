//! Waypoint selection by detour cost and importance.
//!
//! For each candidate the selector computes how far out of the way the
//! waypoint lies versus the direct origin-destination path, discards
//! candidates whose detour exceeds the time budget, scores the remainder by
//! importance against detour time, and returns the top-K by score.

use log::warn;

use crate::geo::haversine_distance;
use crate::transport::{SpeedModel, TransportMode};
use crate::{Coordinate, ScoredWaypoint, SelectorConfig, WaypointCandidate};

/// Select and rank waypoints worth detouring through.
///
/// The detour cost of a candidate `c` is
/// `distance(origin, c) + distance(c, destination) - distance(origin, destination)`,
/// which the triangle inequality keeps non-negative; numerical artifacts are
/// clamped to zero. Candidates over `config.max_detour_minutes` are dropped.
///
/// Scoring is `importance_weight * importance - detour_weight * detour_minutes`,
/// sorted descending with ties broken by candidate id so output is
/// reproducible. The result is truncated to `config.max_results` and carries
/// no `sequence_index` yet.
///
/// An empty candidate list, or one where nothing qualifies, yields an empty
/// vector — never an error. Downstream falls back to a direct route.
///
/// Hidden candidates are skipped, as are candidates with malformed
/// coordinates (the external store owns those records; one bad row must not
/// fail the whole plan).
pub fn select_waypoints(
    origin: Coordinate,
    destination: Coordinate,
    candidates: &[WaypointCandidate],
    config: &SelectorConfig,
    mode: TransportMode,
    speeds: &dyn SpeedModel,
) -> Vec<ScoredWaypoint> {
    let direct = haversine_distance(&origin, &destination);
    let speed = speeds.speed(mode);

    let mut scored: Vec<ScoredWaypoint> = candidates
        .iter()
        .filter(|c| c.visible)
        .filter(|c| {
            if c.coordinate.is_valid() {
                true
            } else {
                warn!(
                    "Skipping candidate '{}' with invalid coordinate ({}, {})",
                    c.id, c.coordinate.latitude, c.coordinate.longitude
                );
                false
            }
        })
        .filter_map(|c| {
            let via = haversine_distance(&origin, &c.coordinate)
                + haversine_distance(&c.coordinate, &destination);
            let detour_distance = (via - direct).max(0.0);
            let detour_minutes = detour_distance / speed / 60.0;

            if detour_minutes > config.max_detour_minutes {
                return None;
            }

            let score = config.importance_weight * f64::from(c.importance)
                - config.detour_weight * detour_minutes;

            Some(ScoredWaypoint {
                candidate: c.clone(),
                detour_distance,
                detour_minutes,
                score,
                sequence_index: None,
            })
        })
        .collect();

    // Descending by score, ties by candidate id for deterministic output
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.candidate.id.cmp(&b.candidate.id))
    });

    scored.truncate(config.max_results);
    scored
}
