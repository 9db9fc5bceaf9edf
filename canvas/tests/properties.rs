//! Property tests for the geometric invariants.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_6, PI, TAU};

use canvas_core::binding::{PointBinding, compute_fixed_point, resolve_binding_point};
use canvas_core::elbow::{Heading, RouteOptions, is_orthogonal, route};
use canvas_core::element::Element;
use canvas_core::geom::Point;
use canvas_core::hit::ResizeHandle;
use canvas_core::transform::resize_single;
use proptest::prelude::*;

fn heading() -> impl Strategy<Value = Option<Heading>> {
    prop_oneof![
        Just(None),
        Just(Some(Heading::Up)),
        Just(Some(Heading::Down)),
        Just(Some(Heading::Left)),
        Just(Some(Heading::Right)),
    ]
}

/// Arbitrary angles, with the axis-aligned and sixth turns drawn often.
fn turn() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(0.0),
        Just(FRAC_PI_6),
        Just(FRAC_PI_2),
        Just(PI),
        0.0f64..TAU,
    ]
}

fn coord() -> impl Strategy<Value = f64> {
    (-1000i32..1000).prop_map(f64::from)
}

fn anchor_of(el: &Element, handle: ResizeHandle) -> Point {
    let b = el.bounds();
    handle.opposite().position(&b).rotate_around(b.center(), el.angle)
}

proptest! {
    #[test]
    fn elbow_routes_are_orthogonal(
        sx in coord(),
        sy in coord(),
        ex in coord(),
        ey in coord(),
        start_heading in heading(),
        end_heading in heading(),
    ) {
        let opts = RouteOptions::for_bindings(start_heading.is_some(), end_heading.is_some());
        let start = Point::new(sx, sy);
        let end = Point::new(ex, ey);
        let path = route(start, end, start_heading, end_heading, opts);
        prop_assert!(is_orthogonal(&path), "{path:?}");
        prop_assert_eq!(path.first().copied(), Some(start));
        prop_assert_eq!(path.last().copied(), Some(end));
    }

    #[test]
    fn elbow_routing_is_deterministic(sx in coord(), sy in coord(), ex in coord(), ey in coord(), h in heading()) {
        let opts = RouteOptions::for_bindings(h.is_some(), false);
        let a = route(Point::new(sx, sy), Point::new(ex, ey), h, None, opts);
        let b = route(Point::new(sx, sy), Point::new(ex, ey), h, None, opts);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn binding_round_trip_lands_on_nearest_edge(
        x in coord(),
        y in coord(),
        w in 1.0f64..400.0,
        h in 1.0f64..400.0,
        u in -0.2f64..1.2,
        v in -0.2f64..1.2,
    ) {
        let target = Element::rectangle(x, y, w, h);
        let p = Point::new(x + u * w, y + v * h);
        let fixed = compute_fixed_point(&target, p);
        prop_assert!((0.0..=1.0).contains(&fixed.x) && (0.0..=1.0).contains(&fixed.y));

        let resolved = resolve_binding_point(&target, &PointBinding { element_id: target.id, fixed_point: fixed });
        let b = target.bounds();
        prop_assert!(b.distance_to_edge(resolved) < 1e-6, "{resolved:?} is off the outline of {b:?}");
        prop_assert!((p.distance(resolved) - b.distance_to_edge(p)).abs() < 1e-6);
    }

    #[test]
    fn resize_keeps_opposite_handle_fixed(
        angle in turn(),
        handle_index in 0usize..8,
        dx in -300.0f64..300.0,
        dy in -300.0f64..300.0,
    ) {
        let handle = ResizeHandle::ALL[handle_index];
        let mut el = Element::rectangle(40.0, -20.0, 120.0, 80.0);
        el.angle = angle;
        let out = resize_single(&el, handle, Point::new(dx, dy), false, 4.0);
        let before = anchor_of(&el, handle);
        let after = anchor_of(&out, handle);
        prop_assert!(before.approx_eq(after, 1e-6), "{before:?} vs {after:?}");
        prop_assert!(out.width >= 4.0 - 1e-9 && out.height >= 4.0 - 1e-9);
    }
}
