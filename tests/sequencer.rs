//! Tests for the sequencer module

use waymark::{sequence_waypoints, Coordinate, ScoredWaypoint, WaypointCandidate};

fn scored(id: &str, lat: f64, lng: f64, score: f64) -> ScoredWaypoint {
    ScoredWaypoint {
        candidate: WaypointCandidate::new(id, Coordinate::new(lat, lng), 3),
        detour_distance: 0.0,
        detour_minutes: 0.0,
        score,
        sequence_index: None,
    }
}

#[test]
fn test_empty_input() {
    let ordered = sequence_waypoints(Coordinate::new(0.0, 0.0), vec![]);
    assert!(ordered.is_empty());
}

#[test]
fn test_single_waypoint_gets_index_zero() {
    let ordered = sequence_waypoints(
        Coordinate::new(0.0, 0.0),
        vec![scored("only", 0.0, 0.5, 10.0)],
    );
    assert_eq!(ordered.len(), 1);
    assert_eq!(ordered[0].sequence_index, Some(0));
}

#[test]
fn test_greedy_nearest_neighbor_order() {
    // Input deliberately shuffled relative to geographic order
    let input = vec![
        scored("far", 0.0, 0.6, 30.0),
        scored("near", 0.0, 0.2, 20.0),
        scored("mid", 0.0, 0.4, 10.0),
    ];
    let ordered = sequence_waypoints(Coordinate::new(0.0, 0.0), input);

    let ids: Vec<&str> = ordered.iter().map(|wp| wp.id()).collect();
    assert_eq!(ids, vec!["near", "mid", "far"]);
}

#[test]
fn test_visits_every_waypoint_exactly_once() {
    let input: Vec<ScoredWaypoint> = (0..8)
        .map(|i| {
            scored(
                &format!("wp-{}", i),
                (i % 3) as f64 * 0.1,
                i as f64 * 0.1,
                i as f64,
            )
        })
        .collect();
    let ordered = sequence_waypoints(Coordinate::new(0.0, 0.0), input.clone());

    assert_eq!(ordered.len(), input.len());
    let mut ids: Vec<&str> = ordered.iter().map(|wp| wp.id()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), input.len());
}

#[test]
fn test_sequence_indices_are_permutation_of_visiting_order() {
    let input = vec![
        scored("c", 0.0, 0.3, 1.0),
        scored("a", 0.0, 0.1, 2.0),
        scored("b", 0.0, 0.2, 3.0),
    ];
    let ordered = sequence_waypoints(Coordinate::new(0.0, 0.0), input);

    for (i, wp) in ordered.iter().enumerate() {
        assert_eq!(wp.sequence_index, Some(i as u32));
    }
}

#[test]
fn test_distance_tie_broken_by_score_rank() {
    // Two waypoints at the same spot, so identical distance; the one earlier
    // in the input (higher score rank) is visited first
    let input = vec![
        scored("ranked-first", 0.1, 0.0, 50.0),
        scored("ranked-second", 0.1, 0.0, 40.0),
    ];
    let ordered = sequence_waypoints(Coordinate::new(0.0, 0.0), input);
    assert_eq!(ordered[0].id(), "ranked-first");
}

#[test]
fn test_determinism() {
    let input: Vec<ScoredWaypoint> = (0..6)
        .map(|i| scored(&format!("wp-{}", i), 0.05 * i as f64, 0.1 * i as f64, 0.0))
        .collect();
    let a = sequence_waypoints(Coordinate::new(0.0, 0.0), input.clone());
    let b = sequence_waypoints(Coordinate::new(0.0, 0.0), input);
    assert_eq!(a, b);
}
