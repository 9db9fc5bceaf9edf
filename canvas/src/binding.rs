//! Binding engine: attaching connector endpoints to shapes.
//!
//! A binding stores a target id and a normalized `fixed_point` inside the
//! target's bounds (`(0,0)` top-left, `(1,1)` bottom-right). Whenever a target
//! moves or resizes, [`update_bound_arrow_endpoints`] re-derives the
//! connector's endpoints from those fractions so the arrow follows.
//!
//! Reverse references (`bound_elements` on the target) are kept in step with
//! forward bindings by [`set_endpoint_binding`] and [`clear_bindings_to`].

#[cfg(test)]
#[path = "binding_test.rs"]
mod binding_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::elbow::{self, Heading, RouteOptions};
use crate::element::{BoundElement, BoundElementKind, Element, ElementId, Endpoint};
use crate::geom::Point;
use crate::scene::Scene;

/// Attachment of one connector endpoint to a target element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointBinding {
    pub element_id: ElementId,
    /// Normalized position inside the target's bounds, each axis in `0..=1`.
    pub fixed_point: Point,
}

impl PointBinding {
    /// Binding to `target` at the edge position nearest `point`.
    #[must_use]
    pub fn to_target(target: &Element, point: Point) -> Self {
        Self { element_id: target.id, fixed_point: compute_fixed_point(target, point) }
    }
}

/// Whether connectors may attach to `el`.
#[must_use]
pub fn is_bindable(el: &Element) -> bool {
    el.is_active() && el.kind.is_shape()
}

/// The nearest bindable element whose edge lies within `snap_radius` of
/// `point`. Points inside a shape measure to its nearest edge. Ties go to the
/// topmost element.
#[must_use]
pub fn find_bind_target<'a>(scene: &'a Scene, point: Point, snap_radius: f64, exclude: &[ElementId]) -> Option<&'a Element> {
    let mut best: Option<(f64, &Element)> = None;
    // Topmost first, so strict `<` keeps the higher element on ties.
    for el in scene.ordered_elements().into_iter().rev() {
        if !is_bindable(el) || exclude.contains(&el.id) {
            continue;
        }
        let dist = el.bounds().distance_to_edge(point);
        if dist > snap_radius {
            continue;
        }
        if best.is_none_or(|(d, _)| dist < d) {
            best = Some((dist, el));
        }
    }
    best.map(|(_, el)| el)
}

/// Normalized position of the edge point of `target` nearest `point`.
///
/// Edges are tried in the order left, right, top, bottom and the first
/// strictly-nearest one wins. Degenerate axes map to `0`.
#[must_use]
pub fn compute_fixed_point(target: &Element, point: Point) -> Point {
    let b = target.bounds();
    let cy = point.y.clamp(b.top, b.bottom());
    let cx = point.x.clamp(b.left, b.right());
    let edges = [
        Point::new(b.left, cy),
        Point::new(b.right(), cy),
        Point::new(cx, b.top),
        Point::new(cx, b.bottom()),
    ];
    let mut nearest = edges[0];
    let mut nearest_dist = point.distance(nearest);
    for edge in &edges[1..] {
        let d = point.distance(*edge);
        if d < nearest_dist {
            nearest = *edge;
            nearest_dist = d;
        }
    }
    let fx = if b.width > 0.0 { ((nearest.x - b.left) / b.width).clamp(0.0, 1.0) } else { 0.0 };
    let fy = if b.height > 0.0 { ((nearest.y - b.top) / b.height).clamp(0.0, 1.0) } else { 0.0 };
    Point::new(fx, fy)
}

/// Scene position of `binding` on `target`: bilinear interpolation over the
/// target's unrotated bounds.
#[must_use]
pub fn resolve_binding_point(target: &Element, binding: &PointBinding) -> Point {
    let b = target.bounds();
    Point::new(b.left + binding.fixed_point.x * b.width, b.top + binding.fixed_point.y * b.height)
}

/// Outward side of the target a fixed point sits on: the nearest edge in
/// normalized space, left, right, top, bottom on ties.
#[must_use]
pub fn heading_for_fixed_point(fixed: Point) -> Heading {
    let sides = [
        (fixed.x, Heading::Left),
        (1.0 - fixed.x, Heading::Right),
        (fixed.y, Heading::Up),
        (1.0 - fixed.y, Heading::Down),
    ];
    let mut best = sides[0];
    for side in &sides[1..] {
        if side.0 < best.0 {
            best = *side;
        }
    }
    best.1
}

/// Connectors with a binding to `target`, in scene order.
#[must_use]
pub fn find_bound_arrows(scene: &Scene, target: ElementId) -> Vec<&Element> {
    scene
        .active_elements()
        .filter(|el| {
            el.connector().is_some_and(|c| {
                c.start_binding.is_some_and(|b| b.element_id == target) || c.end_binding.is_some_and(|b| b.element_id == target)
            })
        })
        .collect()
}

/// Re-derive a connector's bound endpoints against the current `scene`.
///
/// Returns an unchanged copy when `connector` is not a connector or neither
/// binding resolves to an active bindable target. Otherwise the bound
/// endpoints are moved onto their targets, orthogonal connectors are
/// re-routed, and the copy's version is bumped.
#[must_use]
pub fn update_bound_arrow_endpoints(connector: &Element, scene: &Scene) -> Element {
    let Some(data) = connector.connector() else {
        return connector.clone();
    };
    let resolve = |b: Option<&PointBinding>| {
        b.and_then(|b| scene.active_element(b.element_id).filter(|t| is_bindable(t)).map(|t| resolve_binding_point(t, b)))
    };
    let start = resolve(data.start_binding.as_ref());
    let end = resolve(data.end_binding.as_ref());
    if start.is_none() && end.is_none() {
        return connector.clone();
    }

    let mut points = connector.absolute_points();
    let Some(last) = points.len().checked_sub(1) else {
        return connector.clone();
    };
    if let Some(s) = start {
        points[0] = s;
    }
    if let Some(e) = end {
        points[last] = e;
    }

    let mut next = connector.clone();
    next.set_absolute_points(&points);
    route_connector(&mut next);
    next.bump_version();
    trace!(connector = %connector.id, "re-derived bound endpoints");
    next
}

/// Re-route an orthogonal connector between its current first and last
/// points. Headings come from the bindings; unbound ends face the other end.
/// Non-orthogonal connectors are left alone.
pub fn route_connector(el: &mut Element) {
    let Some(data) = el.connector() else {
        return;
    };
    if !data.orthogonal {
        return;
    }
    let start_heading = data.start_binding.map(|b| heading_for_fixed_point(b.fixed_point));
    let end_heading = data.end_binding.map(|b| heading_for_fixed_point(b.fixed_point));
    let opts = RouteOptions::for_bindings(start_heading.is_some(), end_heading.is_some());

    let points = el.absolute_points();
    let (Some(&start), Some(&end)) = (points.first(), points.last()) else {
        return;
    };
    let mut routed = elbow::route(start, end, start_heading, end_heading, opts);
    if routed.len() == 1 {
        routed.push(end);
    }
    el.set_absolute_points(&routed);
}

/// Replace one endpoint's binding on the working copy `connector`, keeping
/// reverse references consistent.
///
/// Returns updated copies of every target whose `bound_elements` changed:
/// the old target loses its entry (unless the other endpoint still binds to
/// it) and the new target gains one.
pub fn set_endpoint_binding(scene: &Scene, connector: &mut Element, end: Endpoint, binding: Option<PointBinding>) -> Vec<Element> {
    let connector_id = connector.id;
    let Some(data) = connector.connector_mut() else {
        return Vec::new();
    };
    let slot = data.binding_slot(end);
    let old = slot.map(|b| b.element_id);
    let new = binding.map(|b| b.element_id);
    *slot = binding;
    let other = match end {
        Endpoint::Start => data.end_binding,
        Endpoint::End => data.start_binding,
    }
    .map(|b| b.element_id);

    if old == new {
        return Vec::new();
    }
    let mut changed = Vec::new();
    if let Some(old_id) = old.filter(|id| other != Some(*id)) {
        if let Some(target) = scene.element(old_id) {
            let mut t = target.clone();
            if t.remove_bound_element(connector_id) {
                t.bump_version();
                changed.push(t);
            }
        }
    }
    if let Some(new_id) = new {
        if let Some(target) = scene.element(new_id) {
            let mut t = target.clone();
            if t.add_bound_element(BoundElement { id: connector_id, kind: BoundElementKind::Arrow }) {
                t.bump_version();
                changed.push(t);
            }
        }
    }
    trace!(connector = %connector_id, ?end, ?old, ?new, "endpoint rebound");
    changed
}

/// Bind one endpoint of the working copy `connector` to `target` at the edge
/// position nearest `point`, and snap that endpoint onto it. Returns the
/// targets whose reverse references changed.
pub fn bind_endpoint(scene: &Scene, connector: &mut Element, end: Endpoint, target: &Element, point: Point) -> Vec<Element> {
    let binding = PointBinding::to_target(target, point);
    let changed = set_endpoint_binding(scene, connector, end, Some(binding));
    let mut points = connector.absolute_points();
    let slot = match end {
        Endpoint::Start => points.first_mut(),
        Endpoint::End => points.last_mut(),
    };
    if let Some(slot) = slot {
        *slot = resolve_binding_point(target, &binding);
        connector.set_absolute_points(&points);
    }
    changed
}

/// Clear one endpoint's binding on the working copy `connector`. The point
/// stays where it is.
pub fn unbind_endpoint(scene: &Scene, connector: &mut Element, end: Endpoint) -> Vec<Element> {
    set_endpoint_binding(scene, connector, end, None)
}

/// Drop every binding from `connector` to an element in `ids`. Returns the
/// updated connector, or `None` if it had no such binding.
#[must_use]
pub fn clear_bindings_to(connector: &Element, ids: &HashSet<ElementId>) -> Option<Element> {
    let mut next = connector.clone();
    let data = next.connector_mut()?;
    let mut cleared = false;
    for end in [Endpoint::Start, Endpoint::End] {
        let slot = data.binding_slot(end);
        if slot.is_some_and(|b| ids.contains(&b.element_id)) {
            *slot = None;
            cleared = true;
        }
    }
    if !cleared {
        return None;
    }
    next.bump_version();
    Some(next)
}
