#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;
use crate::geom::Point;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- Viewport defaults ---

#[test]
fn viewport_default_pan_is_zero() {
    let vp = Viewport::default();
    assert_eq!(vp.pan_x, 0.0);
    assert_eq!(vp.pan_y, 0.0);
}

#[test]
fn viewport_default_zoom_is_one() {
    let vp = Viewport::default();
    assert_eq!(vp.zoom, 1.0);
}

// --- screen_to_scene ---

#[test]
fn screen_to_scene_identity() {
    let vp = Viewport::default();
    let scene = vp.screen_to_scene(Point::new(50.0, 75.0));
    assert!(point_approx_eq(scene, Point::new(50.0, 75.0)));
}

#[test]
fn screen_to_scene_with_zoom() {
    let vp = Viewport { pan_x: 0.0, pan_y: 0.0, zoom: 4.0 };
    let scene = vp.screen_to_scene(Point::new(40.0, 80.0));
    assert!(approx_eq(scene.x, 10.0));
    assert!(approx_eq(scene.y, 20.0));
}

#[test]
fn screen_to_scene_with_pan() {
    let vp = Viewport { pan_x: 100.0, pan_y: 50.0, zoom: 1.0 };
    let scene = vp.screen_to_scene(Point::new(100.0, 50.0));
    assert!(point_approx_eq(scene, Point::new(0.0, 0.0)));
}

#[test]
fn screen_to_scene_with_pan_and_zoom() {
    let vp = Viewport { pan_x: 20.0, pan_y: 10.0, zoom: 2.0 };
    // screen (20, 10) -> scene (0, 0) because (20-20)/2 = 0, (10-10)/2 = 0
    let scene = vp.screen_to_scene(Point::new(20.0, 10.0));
    assert!(point_approx_eq(scene, Point::new(0.0, 0.0)));
}

#[test]
fn screen_to_scene_negative_coords() {
    let vp = Viewport { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 };
    let scene = vp.screen_to_scene(Point::new(-10.0, -20.0));
    assert!(point_approx_eq(scene, Point::new(-10.0, -20.0)));
}

#[test]
fn screen_to_scene_origin() {
    let vp = Viewport { pan_x: 50.0, pan_y: 30.0, zoom: 2.0 };
    let scene = vp.screen_to_scene(Point::new(0.0, 0.0));
    assert!(approx_eq(scene.x, -25.0));
    assert!(approx_eq(scene.y, -15.0));
}

// --- scene_to_screen ---

#[test]
fn scene_to_screen_identity() {
    let vp = Viewport::default();
    let screen = vp.scene_to_screen(Point::new(50.0, 75.0));
    assert!(point_approx_eq(screen, Point::new(50.0, 75.0)));
}

#[test]
fn scene_to_screen_with_zoom() {
    let vp = Viewport { pan_x: 0.0, pan_y: 0.0, zoom: 2.0 };
    let screen = vp.scene_to_screen(Point::new(10.0, 20.0));
    assert!(approx_eq(screen.x, 20.0));
    assert!(approx_eq(screen.y, 40.0));
}

#[test]
fn scene_to_screen_with_pan() {
    let vp = Viewport { pan_x: 100.0, pan_y: 50.0, zoom: 1.0 };
    let screen = vp.scene_to_screen(Point::new(0.0, 0.0));
    assert!(approx_eq(screen.x, 100.0));
    assert!(approx_eq(screen.y, 50.0));
}

#[test]
fn scene_to_screen_with_pan_and_zoom() {
    let vp = Viewport { pan_x: 20.0, pan_y: 10.0, zoom: 3.0 };
    let screen = vp.scene_to_screen(Point::new(5.0, 5.0));
    // 5*3 + 20 = 35, 5*3 + 10 = 25
    assert!(approx_eq(screen.x, 35.0));
    assert!(approx_eq(screen.y, 25.0));
}

#[test]
fn scene_to_screen_negative_scene() {
    let vp = Viewport { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 };
    let screen = vp.scene_to_screen(Point::new(-10.0, -20.0));
    assert!(point_approx_eq(screen, Point::new(-10.0, -20.0)));
}

// --- Round trips ---

#[test]
fn round_trip_identity() {
    let vp = Viewport::default();
    let scene = Point::new(100.0, 200.0);
    let screen = vp.scene_to_screen(scene);
    let back = vp.screen_to_scene(screen);
    assert!(point_approx_eq(scene, back));
}

#[test]
fn round_trip_with_pan_and_zoom() {
    let vp = Viewport { pan_x: 50.0, pan_y: -30.0, zoom: 2.0 };
    let scene = Point::new(100.0, 200.0);
    let screen = vp.scene_to_screen(scene);
    let back = vp.screen_to_scene(screen);
    assert!(point_approx_eq(scene, back));
}

#[test]
fn round_trip_fractional_zoom() {
    let vp = Viewport { pan_x: 13.7, pan_y: -42.3, zoom: 0.75 };
    let scene = Point::new(333.3, -999.9);
    let back = vp.screen_to_scene(vp.scene_to_screen(scene));
    assert!(point_approx_eq(scene, back));
}

#[test]
fn round_trip_screen_first() {
    let vp = Viewport { pan_x: 10.0, pan_y: 20.0, zoom: 1.5 };
    let screen = Point::new(400.0, 300.0);
    let back = vp.scene_to_screen(vp.screen_to_scene(screen));
    assert!(point_approx_eq(screen, back));
}

// --- screen_dist_to_scene ---

#[test]
fn screen_dist_to_scene_identity_at_zoom_one() {
    let vp = Viewport::default();
    assert!(approx_eq(vp.screen_dist_to_scene(42.0), 42.0));
}

#[test]
fn screen_dist_to_scene_with_zoom() {
    let vp = Viewport { pan_x: 0.0, pan_y: 0.0, zoom: 2.0 };
    assert!(approx_eq(vp.screen_dist_to_scene(10.0), 5.0));
}

#[test]
fn screen_dist_to_scene_fractional_zoom() {
    let vp = Viewport { pan_x: 0.0, pan_y: 0.0, zoom: 0.5 };
    assert!(approx_eq(vp.screen_dist_to_scene(10.0), 20.0));
}

#[test]
fn screen_dist_to_scene_zero() {
    let vp = Viewport { pan_x: 0.0, pan_y: 0.0, zoom: 3.0 };
    assert!(approx_eq(vp.screen_dist_to_scene(0.0), 0.0));
}

#[test]
fn screen_dist_to_scene_ignores_pan() {
    let vp = Viewport { pan_x: 999.0, pan_y: -999.0, zoom: 4.0 };
    assert!(approx_eq(vp.screen_dist_to_scene(8.0), 2.0));
}

// --- zoomed_at / panned_by ---

#[test]
fn zoomed_at_keeps_anchor_fixed() {
    let vp = Viewport { pan_x: 30.0, pan_y: -10.0, zoom: 1.0 };
    let anchor = Point::new(200.0, 150.0);
    let before = vp.screen_to_scene(anchor);
    let zoomed = vp.zoomed_at(anchor, 2.5);
    assert!(approx_eq(zoomed.zoom, 2.5));
    assert!(point_approx_eq(zoomed.screen_to_scene(anchor), before));
}

#[test]
fn zoomed_at_clamps_to_limits() {
    let vp = Viewport::default();
    assert!(approx_eq(vp.zoomed_at(Point::new(0.0, 0.0), 1e6).zoom, MAX_ZOOM));
    assert!(approx_eq(vp.zoomed_at(Point::new(0.0, 0.0), 1e-6).zoom, MIN_ZOOM));
}

#[test]
fn panned_by_shifts_pan_only() {
    let vp = Viewport { pan_x: 1.0, pan_y: 2.0, zoom: 3.0 }.panned_by(10.0, -5.0);
    assert_eq!(vp, Viewport { pan_x: 11.0, pan_y: -3.0, zoom: 3.0 });
}
