//! Hit-testing for selection handles and connector vertices.
//!
//! Handles live in the selection's local (un-rotated) frame. To test a
//! pointer against them it is first rotated by `-angle` about the frame's
//! center, then compared against the local handle positions.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementKind};
use crate::geom::{Bounds, Point};
use crate::mutation::Selection;
use crate::scene::Scene;

/// One of the eight resize handles, named by compass direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeHandle {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeHandle {
    /// Hit-test order: corners win over edge midpoints where they overlap.
    pub const ALL: [ResizeHandle; 8] = [Self::Nw, Self::Ne, Self::Se, Self::Sw, Self::N, Self::E, Self::S, Self::W];

    /// The handle on the far side of the box: its position is the resize anchor.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::N => Self::S,
            Self::Ne => Self::Sw,
            Self::E => Self::W,
            Self::Se => Self::Nw,
            Self::S => Self::N,
            Self::Sw => Self::Ne,
            Self::W => Self::E,
            Self::Nw => Self::Se,
        }
    }

    #[must_use]
    pub fn is_corner(self) -> bool {
        matches!(self, Self::Ne | Self::Se | Self::Sw | Self::Nw)
    }

    #[must_use]
    pub fn moves_left(self) -> bool {
        matches!(self, Self::W | Self::Nw | Self::Sw)
    }

    #[must_use]
    pub fn moves_right(self) -> bool {
        matches!(self, Self::E | Self::Ne | Self::Se)
    }

    #[must_use]
    pub fn moves_top(self) -> bool {
        matches!(self, Self::N | Self::Nw | Self::Ne)
    }

    #[must_use]
    pub fn moves_bottom(self) -> bool {
        matches!(self, Self::S | Self::Sw | Self::Se)
    }

    /// Position of this handle on `bounds`, in the bounds' own frame.
    #[must_use]
    pub fn position(self, bounds: &Bounds) -> Point {
        let c = bounds.center();
        let (l, t, r, b) = (bounds.left, bounds.top, bounds.right(), bounds.bottom());
        match self {
            Self::N => Point::new(c.x, t),
            Self::Ne => Point::new(r, t),
            Self::E => Point::new(r, c.y),
            Self::Se => Point::new(r, b),
            Self::S => Point::new(c.x, b),
            Self::Sw => Point::new(l, b),
            Self::W => Point::new(l, c.y),
            Self::Nw => Point::new(l, t),
        }
    }
}

/// What a pointer landed on when testing the selection frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleKind {
    Resize(ResizeHandle),
    Rotate,
}

/// Oriented bounding box of the current selection.
///
/// A single element keeps its own bounds and angle; several elements share
/// the axis-aligned union of their rotated boxes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionFrame {
    pub bounds: Bounds,
    pub angle: f64,
}

impl SelectionFrame {
    /// Frame around the active, unlocked members of `selection`. `None` for an
    /// empty selection or one with a locked member.
    #[must_use]
    pub fn for_selection(scene: &Scene, selection: &Selection) -> Option<Self> {
        let elements: Vec<&Element> = selection.iter().filter_map(|id| scene.active_element(id)).collect();
        if elements.iter().any(|el| el.locked) {
            return None;
        }
        match elements.as_slice() {
            [] => None,
            [el] => Some(Self { bounds: el.bounds(), angle: el.angle }),
            many => many
                .iter()
                .map(|el| el.aabb())
                .reduce(|acc, b| acc.union(&b))
                .map(|bounds| Self { bounds, angle: 0.0 }),
        }
    }

    #[must_use]
    pub fn center(&self) -> Point {
        self.bounds.center()
    }

    /// Map a scene point into the frame's un-rotated local space.
    #[must_use]
    pub fn to_local(&self, p: Point) -> Point {
        p.rotate_around(self.center(), -self.angle)
    }

    /// Map a local point back into scene space.
    #[must_use]
    pub fn to_scene(&self, p: Point) -> Point {
        p.rotate_around(self.center(), self.angle)
    }

    /// Local position of the rotation handle, `offset` above the top edge.
    #[must_use]
    pub fn rotate_handle_local(&self, offset: f64) -> Point {
        Point::new(self.center().x, self.bounds.top - offset)
    }

    /// Scene position of a resize handle.
    #[must_use]
    pub fn handle_position(&self, handle: ResizeHandle) -> Point {
        self.to_scene(handle.position(&self.bounds))
    }

    /// Which handle, if any, lies within `radius` of `p`. The rotation handle
    /// is tested first, then corners, then edge midpoints.
    #[must_use]
    pub fn hit_handle(&self, p: Point, radius: f64, rotate_offset: f64) -> Option<HandleKind> {
        let local = self.to_local(p);
        if local.distance(self.rotate_handle_local(rotate_offset)) <= radius {
            return Some(HandleKind::Rotate);
        }
        ResizeHandle::ALL
            .into_iter()
            .find(|h| local.distance(h.position(&self.bounds)) <= radius)
            .map(HandleKind::Resize)
    }
}

/// Indices of the points a user may drag on a linear element. Orthogonal
/// connectors expose only their endpoints; their interior is derived.
#[must_use]
pub fn draggable_vertices(el: &Element) -> Vec<usize> {
    let count = match &el.kind {
        ElementKind::Line(d) => d.points.len(),
        ElementKind::Arrow(c) => {
            let n = c.linear.points.len();
            if c.orthogonal {
                return if n > 1 { vec![0, n - 1] } else { (0..n).collect() };
            }
            n
        }
        _ => 0,
    };
    (0..count).collect()
}

/// Index of the draggable vertex of `el` nearest `p` within `radius`.
/// Endpoints win ties over interior points.
#[must_use]
pub fn hit_vertex(el: &Element, p: Point, radius: f64) -> Option<usize> {
    let absolute = el.absolute_points();
    let last = absolute.len().checked_sub(1)?;
    let mut best: Option<(bool, f64, usize)> = None;
    for index in draggable_vertices(el) {
        let Some(vertex) = absolute.get(index) else {
            continue;
        };
        let dist = vertex.distance(p);
        if dist > radius {
            continue;
        }
        let interior = index != 0 && index != last;
        let better = match best {
            None => true,
            Some((best_interior, best_dist, _)) => (interior, dist) < (best_interior, best_dist),
        };
        if better {
            best = Some((interior, dist, index));
        }
    }
    best.map(|(_, _, index)| index)
}

/// Topmost active, unlocked element under `p` (bounding-box test, rotation
/// ignored). Bound text resolves to its container.
#[must_use]
pub fn hit_element(scene: &Scene, p: Point) -> Option<&Element> {
    let el = scene.elements_at_point(p).into_iter().find(|el| !el.locked)?;
    match el.container_id().and_then(|c| scene.active_element(c)) {
        Some(container) if !container.locked => Some(container),
        _ => Some(el),
    }
}
