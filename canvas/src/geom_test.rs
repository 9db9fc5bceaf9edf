#![allow(clippy::float_cmp)]

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use super::*;

const EPS: f64 = 1e-9;

// =============================================================
// Point
// =============================================================

#[test]
fn point_arithmetic() {
    let a = Point::new(1.0, 2.0);
    let b = Point::new(3.0, 5.0);
    assert_eq!(a + b, Point::new(4.0, 7.0));
    assert_eq!(b - a, Point::new(2.0, 3.0));
    assert_eq!(a * 2.0, Point::new(2.0, 4.0));
    assert_eq!(-a, Point::new(-1.0, -2.0));
}

#[test]
fn point_distance_is_euclidean() {
    assert_eq!(Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)), 5.0);
}

#[test]
fn rotate_quarter_turn_about_center() {
    let p = Point::new(10.0, 0.0).rotate_around(Point::new(0.0, 0.0), FRAC_PI_2);
    assert!(p.approx_eq(Point::new(0.0, 10.0), EPS));
}

#[test]
fn rotate_half_turn_about_offset_center() {
    let p = Point::new(20.0, 10.0).rotate_around(Point::new(10.0, 10.0), PI);
    assert!(p.approx_eq(Point::new(0.0, 10.0), EPS));
}

#[test]
fn rotate_zero_is_identity() {
    let p = Point::new(3.5, -2.0);
    assert_eq!(p.rotate_around(Point::new(100.0, 100.0), 0.0), p);
}

// =============================================================
// Bounds
// =============================================================

#[test]
fn bounds_derived_helpers() {
    let b = Bounds::new(10.0, 20.0, 100.0, 50.0);
    assert_eq!(b.right(), 110.0);
    assert_eq!(b.bottom(), 70.0);
    assert_eq!(b.center(), Point::new(60.0, 45.0));
}

#[test]
fn bounds_from_corners_normalizes() {
    let b = Bounds::from_corners(Point::new(50.0, 10.0), Point::new(20.0, 40.0));
    assert_eq!(b, Bounds::new(20.0, 10.0, 30.0, 30.0));
}

#[test]
fn bounds_from_points_empty_is_none() {
    assert!(Bounds::from_points(&[]).is_none());
}

#[test]
fn bounds_from_points_spans_all() {
    let b = Bounds::from_points(&[Point::new(5.0, 5.0), Point::new(-5.0, 10.0), Point::new(0.0, -1.0)]);
    assert_eq!(b, Some(Bounds::new(-5.0, -1.0, 10.0, 11.0)));
}

#[test]
fn bounds_union() {
    let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
    let b = Bounds::new(20.0, -5.0, 5.0, 5.0);
    assert_eq!(a.union(&b), Bounds::new(0.0, -5.0, 25.0, 15.0));
}

#[test]
fn bounds_contains_point_is_inclusive() {
    let b = Bounds::new(0.0, 0.0, 10.0, 10.0);
    assert!(b.contains_point(Point::new(0.0, 0.0)));
    assert!(b.contains_point(Point::new(10.0, 10.0)));
    assert!(!b.contains_point(Point::new(10.1, 5.0)));
}

#[test]
fn bounds_contains_bounds_requires_both_corners() {
    let outer = Bounds::new(0.0, 0.0, 100.0, 100.0);
    assert!(outer.contains_bounds(&Bounds::new(10.0, 10.0, 20.0, 20.0)));
    assert!(!outer.contains_bounds(&Bounds::new(90.0, 90.0, 20.0, 20.0)));
}

#[test]
fn distance_to_edge_inside_uses_nearest_edge() {
    let b = Bounds::new(0.0, 0.0, 100.0, 100.0);
    assert_eq!(b.distance_to_edge(Point::new(5.0, 50.0)), 5.0);
    assert_eq!(b.distance_to_edge(Point::new(50.0, 97.0)), 3.0);
}

#[test]
fn distance_to_edge_outside_uses_closest_point() {
    let b = Bounds::new(0.0, 0.0, 100.0, 100.0);
    assert_eq!(b.distance_to_edge(Point::new(110.0, 50.0)), 10.0);
    assert_eq!(b.distance_to_edge(Point::new(103.0, 104.0)), 5.0);
}

#[test]
fn rotated_aabb_quarter_turn_swaps_extent() {
    let b = Bounds::new(0.0, 0.0, 100.0, 20.0);
    let r = b.rotated_aabb(FRAC_PI_2);
    assert!((r.width - 20.0).abs() < EPS);
    assert!((r.height - 100.0).abs() < EPS);
    assert!(r.center().approx_eq(b.center(), EPS));
}

// =============================================================
// normalize_angle
// =============================================================

#[test]
fn normalize_angle_wraps_into_range() {
    assert!((normalize_angle(-FRAC_PI_2) - 3.0 * FRAC_PI_2).abs() < EPS);
    assert!((normalize_angle(TAU + 1.0) - 1.0).abs() < EPS);
    assert_eq!(normalize_angle(0.0), 0.0);
}
