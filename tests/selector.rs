//! Tests for the selector module

use waymark::{
    select_waypoints, ConstantSpeedModel, Coordinate, SelectorConfig, TransportMode,
    WaypointCandidate,
};

fn origin() -> Coordinate {
    Coordinate::new(0.0, 0.0)
}

fn destination() -> Coordinate {
    Coordinate::new(0.0, 1.0) // ~111 km east
}

fn select(
    candidates: &[WaypointCandidate],
    config: &SelectorConfig,
) -> Vec<waymark::ScoredWaypoint> {
    select_waypoints(
        origin(),
        destination(),
        candidates,
        config,
        TransportMode::Driving,
        &ConstantSpeedModel,
    )
}

#[test]
fn test_empty_candidates_is_not_an_error() {
    let selected = select(&[], &SelectorConfig::default());
    assert!(selected.is_empty());
}

#[test]
fn test_near_route_candidate_selected() {
    let candidates = vec![WaypointCandidate::new(
        "cafe",
        Coordinate::new(0.01, 0.5),
        5,
    )];
    let selected = select(&candidates, &SelectorConfig::default());

    assert_eq!(selected.len(), 1);
    let wp = &selected[0];
    assert_eq!(wp.id(), "cafe");
    // Barely off the direct path: small positive detour, well under budget
    assert!(wp.detour_distance >= 0.0);
    assert!(wp.detour_distance < 2_000.0);
    assert!(wp.detour_minutes < 60.0);
    assert!(wp.sequence_index.is_none());
}

#[test]
fn test_over_budget_candidate_discarded() {
    // A full degree of latitude off the path costs hours of driving
    let candidates = vec![WaypointCandidate::new(
        "far",
        Coordinate::new(1.0, 0.5),
        5,
    )];
    let config = SelectorConfig {
        max_detour_minutes: 60.0,
        ..SelectorConfig::default()
    };
    assert!(select(&candidates, &config).is_empty());
}

#[test]
fn test_detour_distance_never_negative() {
    // Candidate exactly on the direct path
    let candidates = vec![WaypointCandidate::new(
        "on-path",
        Coordinate::new(0.0, 0.5),
        3,
    )];
    let selected = select(&candidates, &SelectorConfig::default());
    assert_eq!(selected.len(), 1);
    assert!(selected[0].detour_distance >= 0.0);
}

#[test]
fn test_importance_dominates_near_equal_detours() {
    let candidates = vec![
        WaypointCandidate::new("minor", Coordinate::new(0.01, 0.5), 1),
        WaypointCandidate::new("major", Coordinate::new(0.01, 0.4), 5),
    ];
    let selected = select(&candidates, &SelectorConfig::default());
    assert_eq!(selected.len(), 2);
    assert_eq!(selected[0].id(), "major");
    assert!(selected[0].score > selected[1].score);
}

#[test]
fn test_score_ties_broken_by_id() {
    // Mirror-image candidates have identical detour cost and importance
    let candidates = vec![
        WaypointCandidate::new("b-stop", Coordinate::new(-0.01, 0.5), 3),
        WaypointCandidate::new("a-stop", Coordinate::new(0.01, 0.5), 3),
    ];
    let selected = select(&candidates, &SelectorConfig::default());
    assert_eq!(selected.len(), 2);
    assert_eq!(selected[0].id(), "a-stop");
    assert_eq!(selected[1].id(), "b-stop");
}

#[test]
fn test_truncates_to_max_results() {
    let candidates: Vec<WaypointCandidate> = (0..5)
        .map(|i| {
            WaypointCandidate::new(
                &format!("wp-{}", i),
                Coordinate::new(0.01, 0.2 + i as f64 * 0.1),
                3,
            )
        })
        .collect();
    let config = SelectorConfig {
        max_results: 2,
        ..SelectorConfig::default()
    };
    assert_eq!(select(&candidates, &config).len(), 2);
}

#[test]
fn test_hidden_candidates_skipped() {
    let mut hidden = WaypointCandidate::new("hidden", Coordinate::new(0.01, 0.5), 5);
    hidden.visible = false;
    let candidates = vec![
        hidden,
        WaypointCandidate::new("shown", Coordinate::new(0.01, 0.4), 2),
    ];
    let selected = select(&candidates, &SelectorConfig::default());
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].id(), "shown");
}

#[test]
fn test_malformed_candidate_skipped_not_fatal() {
    let candidates = vec![
        WaypointCandidate::new("bogus", Coordinate::new(95.0, 0.5), 5),
        WaypointCandidate::new("good", Coordinate::new(0.01, 0.5), 3),
    ];
    let selected = select(&candidates, &SelectorConfig::default());
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].id(), "good");
}

#[test]
fn test_never_exceeds_budget() {
    let candidates: Vec<WaypointCandidate> = (0..10)
        .map(|i| {
            WaypointCandidate::new(
                &format!("wp-{}", i),
                Coordinate::new(i as f64 * 0.05, 0.5),
                3,
            )
        })
        .collect();
    let config = SelectorConfig {
        max_detour_minutes: 20.0,
        ..SelectorConfig::default()
    };
    for wp in select(&candidates, &config) {
        assert!(wp.detour_minutes <= 20.0);
    }
}

#[test]
fn test_deterministic_output() {
    let candidates: Vec<WaypointCandidate> = (0..6)
        .map(|i| {
            WaypointCandidate::new(
                &format!("wp-{}", i),
                Coordinate::new(0.01 * (i % 3) as f64, 0.2 + i as f64 * 0.1),
                (i % 5) as u8 + 1,
            )
        })
        .collect();
    let a = select(&candidates, &SelectorConfig::default());
    let b = select(&candidates, &SelectorConfig::default());
    assert_eq!(a, b);
}
