//! Tests for the geo module

use waymark::geo::{haversine_distance, initial_bearing, path_distance};
use waymark::Coordinate;

fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

#[test]
fn test_distance_same_point_is_zero() {
    let p = Coordinate::new(51.5074, -0.1278);
    assert_eq!(haversine_distance(&p, &p), 0.0);
}

#[test]
fn test_distance_known_value() {
    // London to Paris is approximately 344 km
    let london = Coordinate::new(51.5074, -0.1278);
    let paris = Coordinate::new(48.8566, 2.3522);
    let dist = haversine_distance(&london, &paris);
    assert!(approx_eq(dist, 343_560.0, 5_000.0));
}

#[test]
fn test_distance_one_degree_longitude_at_equator() {
    let a = Coordinate::new(0.0, 0.0);
    let b = Coordinate::new(0.0, 1.0);
    // 1 degree of arc on a 6371 km sphere is ~111.19 km
    assert!(approx_eq(haversine_distance(&a, &b), 111_195.0, 100.0));
}

#[test]
fn test_distance_is_symmetric() {
    let a = Coordinate::new(47.37, 8.55);
    let b = Coordinate::new(46.95, 7.45);
    let ab = haversine_distance(&a, &b);
    let ba = haversine_distance(&b, &a);
    assert!(approx_eq(ab, ba, 1e-9));
}

#[test]
fn test_triangle_inequality() {
    let points = [
        (Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0), Coordinate::new(0.5, 0.5)),
        (
            Coordinate::new(51.5074, -0.1278),
            Coordinate::new(48.8566, 2.3522),
            Coordinate::new(50.0, 1.0),
        ),
        (
            Coordinate::new(-33.87, 151.21),
            Coordinate::new(35.68, 139.69),
            Coordinate::new(1.35, 103.82),
        ),
    ];

    for (a, c, b) in points {
        let direct = haversine_distance(&a, &c);
        let via = haversine_distance(&a, &b) + haversine_distance(&b, &c);
        assert!(via >= direct - 1e-6, "via {} < direct {}", via, direct);
    }
}

#[test]
fn test_bearing_due_east() {
    let a = Coordinate::new(0.0, 0.0);
    let b = Coordinate::new(0.0, 1.0);
    assert!(approx_eq(initial_bearing(&a, &b), 90.0, 0.01));
}

#[test]
fn test_bearing_due_north() {
    let a = Coordinate::new(0.0, 0.0);
    let b = Coordinate::new(1.0, 0.0);
    assert!(approx_eq(initial_bearing(&a, &b), 0.0, 0.01));
}

#[test]
fn test_bearing_is_normalized() {
    let a = Coordinate::new(0.0, 0.0);
    let b = Coordinate::new(0.0, -1.0); // due west
    let bearing = initial_bearing(&a, &b);
    assert!((0.0..360.0).contains(&bearing));
    assert!(approx_eq(bearing, 270.0, 0.01));
}

#[test]
fn test_path_distance_sums_segments() {
    let points = vec![
        Coordinate::new(0.0, 0.0),
        Coordinate::new(0.0, 0.5),
        Coordinate::new(0.0, 1.0),
    ];
    let total = path_distance(&points);
    let direct = haversine_distance(&points[0], &points[2]);
    assert!(approx_eq(total, direct, 1.0));
}

#[test]
fn test_path_distance_short_inputs() {
    assert_eq!(path_distance(&[]), 0.0);
    assert_eq!(path_distance(&[Coordinate::new(1.0, 1.0)]), 0.0);
}
