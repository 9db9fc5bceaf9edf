//! Resize and rotate math for the selection tool.
//!
//! Everything here is pure: functions take element snapshots and return new
//! element values without touching versions. The caller stamps versions
//! against the live scene.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use crate::binding::route_connector;
use crate::element::{Element, ElementKind};
use crate::geom::{Bounds, Point, normalize_angle};
use crate::hit::ResizeHandle;

/// New local bounds after dragging `handle` of `orig` by `local_delta`
/// (already un-rotated into the box's frame).
///
/// Dragged edges move by the delta, then each dragged axis is floored at
/// `min_size` from the dragged side. With `keep_aspect` the box is brought
/// back to the original aspect ratio: corners shrink whichever axis
/// overshoots, edge handles derive the other axis centered on the midline.
#[must_use]
pub fn resize_bounds(orig: &Bounds, handle: ResizeHandle, local_delta: Point, keep_aspect: bool, min_size: f64) -> Bounds {
    let (mut l, mut t, mut r, mut b) = (orig.left, orig.top, orig.right(), orig.bottom());
    if handle.moves_left() {
        l = (l + local_delta.x).min(r - min_size);
    } else if handle.moves_right() {
        r = (r + local_delta.x).max(l + min_size);
    }
    if handle.moves_top() {
        t = (t + local_delta.y).min(b - min_size);
    } else if handle.moves_bottom() {
        b = (b + local_delta.y).max(t + min_size);
    }

    if keep_aspect && orig.width > 0.0 && orig.height > 0.0 {
        let ratio = orig.width / orig.height;
        let (w, h) = locked_size(r - l, b - t, ratio, handle, min_size);
        if handle.is_corner() {
            if handle.moves_left() { l = r - w } else { r = l + w }
            if handle.moves_top() { t = b - h } else { b = t + h }
        } else if handle.moves_top() || handle.moves_bottom() {
            let cx = orig.center().x;
            (l, r) = (cx - w / 2.0, cx + w / 2.0);
            if handle.moves_top() { t = b - h } else { b = t + h }
        } else {
            let cy = orig.center().y;
            (t, b) = (cy - h / 2.0, cy + h / 2.0);
            if handle.moves_left() { l = r - w } else { r = l + w }
        }
    }
    Bounds::new(l, t, r - l, b - t)
}

/// Size with the given aspect `ratio`, scaled back up if locking pushed an
/// axis under `min_size`.
fn locked_size(w: f64, h: f64, ratio: f64, handle: ResizeHandle, min_size: f64) -> (f64, f64) {
    let (mut w, mut h) = if handle.is_corner() {
        if w / h > ratio { (h * ratio, h) } else { (w, w / ratio) }
    } else if handle.moves_top() || handle.moves_bottom() {
        (h * ratio, h)
    } else {
        (w, w / ratio)
    };
    if w < min_size || h < min_size {
        let k = (min_size / w).max(min_size / h);
        w *= k;
        h *= k;
    }
    (w, h)
}

/// Resize a single element by dragging `handle` by `world_delta`, keeping the
/// opposite handle fixed in scene space even when the element is rotated.
#[must_use]
pub fn resize_single(el: &Element, handle: ResizeHandle, world_delta: Point, keep_aspect: bool, min_size: f64) -> Element {
    let before = el.bounds();
    let local_delta = world_delta.rotate(-el.angle);
    let after = resize_bounds(&before, handle, local_delta, keep_aspect, min_size);

    let anchor = handle.opposite();
    let anchor_world = anchor.position(&before).rotate_around(before.center(), el.angle);
    let offset = anchor.position(&after) - after.center();
    let center = anchor_world - offset.rotate(el.angle);
    let target = Bounds::new(center.x - after.width / 2.0, center.y - after.height / 2.0, after.width, after.height);
    fit_element(el, &target)
}

/// Scale every element proportionally from `from` (the selection union) to
/// `to`. Angles are preserved.
#[must_use]
pub fn resize_multi(elements: &[&Element], from: &Bounds, to: &Bounds) -> Vec<Element> {
    elements.iter().map(|el| fit_element(el, &map_bounds(&el.bounds(), from, to))).collect()
}

/// Where `b` lands when `from` is stretched onto `to`. A zero-extent axis of
/// `from` keeps its offset and size.
#[must_use]
pub fn map_bounds(b: &Bounds, from: &Bounds, to: &Bounds) -> Bounds {
    let sx = if from.width > 0.0 { to.width / from.width } else { 1.0 };
    let sy = if from.height > 0.0 { to.height / from.height } else { 1.0 };
    Bounds::new(to.left + (b.left - from.left) * sx, to.top + (b.top - from.top) * sy, b.width * sx, b.height * sy)
}

/// Copy of `el` whose bounds become `target`. Point-based elements scale
/// their points per axis (a zero-extent axis stays flat); text scales its
/// font with the height.
#[must_use]
pub fn fit_element(el: &Element, target: &Bounds) -> Element {
    let from = el.bounds();
    let mut next = el.clone();
    if el.kind.is_linear() {
        let sx = if from.width > 0.0 { target.width / from.width } else { 1.0 };
        let sy = if from.height > 0.0 { target.height / from.height } else { 1.0 };
        let points: Vec<Point> = el
            .absolute_points()
            .into_iter()
            .map(|p| Point::new(target.left + (p.x - from.left) * sx, target.top + (p.y - from.top) * sy))
            .collect();
        next.set_absolute_points(&points);
        return next;
    }
    if let ElementKind::Text(text) = &mut next.kind {
        if from.height > 0.0 {
            text.font_size *= target.height / from.height;
        }
    }
    next.x = target.left;
    next.y = target.top;
    next.width = target.width;
    next.height = target.height;
    next
}

/// Angle swept from `start` to `current` around `center`, optionally snapped
/// to a multiple of `snap`.
#[must_use]
pub fn rotation_delta(center: Point, start: Point, current: Point, snap: Option<f64>) -> f64 {
    let a0 = (start.y - center.y).atan2(start.x - center.x);
    let a1 = (current.y - center.y).atan2(current.x - center.x);
    let delta = a1 - a0;
    match snap {
        Some(step) if step > 0.0 => (delta / step).round() * step,
        _ => delta,
    }
}

/// Rotate an element in place about its own center. Connectors bake the
/// rotation into their points so bindings keep resolving on absolute points.
#[must_use]
pub fn rotate_element(el: &Element, delta: f64) -> Element {
    revolve_element(el, el.center(), delta)
}

/// Revolve an element's center about `pivot` by `delta` and add `delta` to
/// its own angle. Orthogonal connectors revolve their endpoints and are
/// re-routed between them.
#[must_use]
pub fn revolve_element(el: &Element, pivot: Point, delta: f64) -> Element {
    let mut next = el.clone();
    if matches!(el.kind, ElementKind::Arrow(_)) {
        let points: Vec<Point> = el.absolute_points().into_iter().map(|p| p.rotate_around(pivot, delta)).collect();
        next.set_absolute_points(&points);
        route_connector(&mut next);
        return next;
    }
    let center = el.center();
    next.translate(center.rotate_around(pivot, delta) - center);
    next.angle = normalize_angle(el.angle + delta);
    next
}
