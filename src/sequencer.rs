//! Greedy nearest-neighbor waypoint ordering.
//!
//! Orders selected waypoints into a visiting sequence starting from the
//! origin. This is a known traveling-salesman approximation, not an optimal
//! tour; a 2-opt improvement pass could replace it without changing the
//! contract (ordered waypoints in, ordered waypoints out).

use crate::geo::haversine_distance;
use crate::{Coordinate, ScoredWaypoint};

/// Order waypoints by repeatedly visiting the nearest unvisited one.
///
/// Starts at `origin` and walks greedily; the destination is always the final
/// point of the route and never participates in the ordering. Each returned
/// waypoint carries `sequence_index` 0..N-1 in visiting order. Distance ties
/// are broken by the input position, which the selector guarantees is the
/// score rank.
///
/// Zero or one waypoint needs no reordering; the index is assigned trivially.
/// Determinism: identical input always yields an identical sequence.
pub fn sequence_waypoints(origin: Coordinate, selected: Vec<ScoredWaypoint>) -> Vec<ScoredWaypoint> {
    if selected.len() <= 1 {
        let mut out = selected;
        for (i, wp) in out.iter_mut().enumerate() {
            wp.sequence_index = Some(i as u32);
        }
        return out;
    }

    let mut remaining: Vec<ScoredWaypoint> = selected;
    let mut ordered: Vec<ScoredWaypoint> = Vec::with_capacity(remaining.len());
    let mut current = origin;

    while !remaining.is_empty() {
        let mut best_idx = 0;
        let mut best_dist = f64::INFINITY;

        for (i, wp) in remaining.iter().enumerate() {
            let dist = haversine_distance(&current, &wp.coordinate());
            // Strict less-than keeps the earliest (highest score rank) on ties
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
            }
        }

        let mut next = remaining.remove(best_idx);
        next.sequence_index = Some(ordered.len() as u32);
        current = next.coordinate();
        ordered.push(next);
    }

    ordered
}
