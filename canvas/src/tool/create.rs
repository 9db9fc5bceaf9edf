//! Creation tools: drag out a shape or a connector.
//!
//! The element is added on pointer-down at zero size and updated on every
//! move, so the renderer draws it live. Releases below the minimum size
//! remove it again; anything else is selected and control returns to the
//! select tool.

#[cfg(test)]
#[path = "create_test.rs"]
mod create_test;

use tracing::debug;

use super::{Tool, ToolContext, ToolOverlay, successor, updates};
use crate::binding::{bind_endpoint, find_bind_target, route_connector, unbind_endpoint};
use crate::config::EditorConfig;
use crate::element::{Element, ElementId, ElementKind, Endpoint};
use crate::geom::{Bounds, Point};
use crate::input::{Key, Modifiers, ShapeKind, ToolKind};
use crate::mutation::ToolResult;
use crate::scene::Scene;

#[derive(Debug, Clone, Copy)]
struct Drawing {
    id: ElementId,
    anchor: Point,
}

/// Frame dragged from `anchor` to `p`. With `square` the shorter side grows
/// to match the longer one, keeping the drag direction.
#[must_use]
pub fn shape_bounds(anchor: Point, p: Point, square: bool) -> Bounds {
    if !square {
        return Bounds::from_corners(anchor, p);
    }
    let d = p - anchor;
    let side = d.x.abs().max(d.y.abs());
    let corner = Point::new(anchor.x + side * sign(d.x), anchor.y + side * sign(d.y));
    Bounds::from_corners(anchor, corner)
}

fn sign(v: f64) -> f64 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

fn shape_element_kind(shape: ShapeKind) -> ElementKind {
    match shape {
        ShapeKind::Rectangle => ElementKind::Rectangle,
        ShapeKind::Ellipse => ElementKind::Ellipse,
        ShapeKind::Diamond => ElementKind::Diamond,
    }
}

/// Remove a provisional element, dropping the selection with it.
fn discard(id: ElementId) -> ToolResult {
    ToolResult::RemoveElement { id }.and(ToolResult::SetSelection(Vec::new()))
}

fn finish(id: ElementId) -> ToolResult {
    ToolResult::SetSelection(vec![id]).and(ToolResult::SwitchTool(ToolKind::Select))
}

// =============================================================================
// SHAPE TOOL
// =============================================================================

/// Drag out a rectangle, ellipse or diamond.
#[derive(Debug, Clone)]
pub struct ShapeTool {
    shape: ShapeKind,
    config: EditorConfig,
    drawing: Option<Drawing>,
    overlay: ToolOverlay,
}

impl ShapeTool {
    #[must_use]
    pub fn new(shape: ShapeKind, config: EditorConfig) -> Self {
        Self { shape, config, drawing: None, overlay: ToolOverlay::default() }
    }

    fn resized(&self, scene: &Scene, p: Point, square: bool) -> Option<Element> {
        let drawing = self.drawing?;
        let live = scene.active_element(drawing.id)?;
        let frame = shape_bounds(drawing.anchor, p, square);
        let mut next = live.clone();
        next.x = frame.left;
        next.y = frame.top;
        next.width = frame.width;
        next.height = frame.height;
        Some(successor(scene, next))
    }
}

impl Tool for ShapeTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Shape(self.shape)
    }

    fn on_pointer_down(&mut self, ctx: &ToolContext<'_>, p: Point, _modifiers: Modifiers) -> ToolResult {
        self.reset();
        let mut el = Element::new(shape_element_kind(self.shape), Bounds::new(p.x, p.y, 0.0, 0.0));
        el.order_index = ctx.scene.next_order_key();
        self.drawing = Some(Drawing { id: el.id, anchor: p });
        self.overlay.creation_points = vec![p, p];
        debug!(id = %el.id, kind = el.kind.name(), "create start");
        ToolResult::AddElement(el).and(ToolResult::SetSelection(Vec::new()))
    }

    fn on_pointer_move(&mut self, ctx: &ToolContext<'_>, p: Point, modifiers: Modifiers) -> ToolResult {
        let Some(next) = self.resized(ctx.scene, p, modifiers.shift) else {
            return ToolResult::none();
        };
        self.overlay.creation_points = vec![next.frame_bounds().top_left(), next.frame_bounds().bottom_right()];
        ToolResult::UpdateElement(next)
    }

    fn on_pointer_up(&mut self, ctx: &ToolContext<'_>, p: Point, modifiers: Modifiers) -> ToolResult {
        let Some(next) = self.resized(ctx.scene, p, modifiers.shift) else {
            self.reset();
            return ToolResult::none();
        };
        self.reset();
        let id = next.id;
        if next.width < self.config.min_size || next.height < self.config.min_size {
            debug!(%id, "create discarded");
            return discard(id);
        }
        debug!(%id, width = next.width, height = next.height, "create done");
        ToolResult::UpdateElement(next).and(finish(id))
    }

    fn on_key_down(&mut self, _ctx: &ToolContext<'_>, key: &Key, _modifiers: Modifiers) -> ToolResult {
        if !key.is_escape() {
            return ToolResult::none();
        }
        let drawing = self.drawing;
        self.reset();
        drawing.map_or_else(ToolResult::none, |d| discard(d.id))
    }

    fn overlay(&self) -> &ToolOverlay {
        &self.overlay
    }

    fn reset(&mut self) {
        self.drawing = None;
        self.overlay = ToolOverlay::default();
    }
}

// =============================================================================
// CONNECTOR TOOL
// =============================================================================

/// Drag out an arrow whose ends bind to shapes under the snap radius.
#[derive(Debug, Clone)]
pub struct ConnectorTool {
    orthogonal: bool,
    config: EditorConfig,
    drawing: Option<Drawing>,
    overlay: ToolOverlay,
}

impl ConnectorTool {
    #[must_use]
    pub fn new(orthogonal: bool, config: EditorConfig) -> Self {
        Self { orthogonal, config, drawing: None, overlay: ToolOverlay::default() }
    }

    /// Live connector with its end at `p`, bound if a target is in range,
    /// plus the targets whose reverse references changed.
    fn dragged(&mut self, scene: &Scene, p: Point) -> Option<(Element, Vec<Element>)> {
        let drawing = self.drawing?;
        let live = scene.active_element(drawing.id)?;
        let mut next = live.clone();
        let mut points = next.absolute_points();
        let start = *points.first()?;
        points = vec![start, p];
        next.set_absolute_points(&points);
        let changed = match find_bind_target(scene, p, self.config.snap_radius, &[drawing.id]) {
            Some(target) => {
                self.overlay.bind_target = Some(target.id);
                bind_endpoint(scene, &mut next, Endpoint::End, target, p)
            }
            None => {
                self.overlay.bind_target = None;
                unbind_endpoint(scene, &mut next, Endpoint::End)
            }
        };
        route_connector(&mut next);
        self.overlay.creation_points = next.absolute_points();
        Some((successor(scene, next), changed))
    }
}

impl Tool for ConnectorTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Connector { orthogonal: self.orthogonal }
    }

    fn on_pointer_down(&mut self, ctx: &ToolContext<'_>, p: Point, _modifiers: Modifiers) -> ToolResult {
        self.reset();
        let mut el = Element::arrow(&[p, p]);
        el.order_index = ctx.scene.next_order_key();
        if let Some(data) = el.connector_mut() {
            data.orthogonal = self.orthogonal;
        }
        let changed = match find_bind_target(ctx.scene, p, self.config.snap_radius, &[]) {
            Some(target) => bind_endpoint(ctx.scene, &mut el, Endpoint::Start, target, p),
            None => Vec::new(),
        };
        // Both ends start on the (possibly snapped) start point.
        let start = el.absolute_points().first().copied().unwrap_or(p);
        el.set_absolute_points(&[start, start]);
        self.drawing = Some(Drawing { id: el.id, anchor: start });
        self.overlay.creation_points = vec![start, start];
        debug!(id = %el.id, orthogonal = self.orthogonal, bound = !changed.is_empty(), "connector start");
        ToolResult::AddElement(el).and(updates(changed)).and(ToolResult::SetSelection(Vec::new()))
    }

    fn on_pointer_move(&mut self, ctx: &ToolContext<'_>, p: Point, _modifiers: Modifiers) -> ToolResult {
        match self.dragged(ctx.scene, p) {
            Some((next, changed)) => ToolResult::UpdateElement(next).and(updates(changed)),
            None => ToolResult::none(),
        }
    }

    fn on_pointer_up(&mut self, ctx: &ToolContext<'_>, p: Point, _modifiers: Modifiers) -> ToolResult {
        let Some(drawing) = self.drawing else {
            return ToolResult::none();
        };
        let Some((mut next, changed)) = self.dragged(ctx.scene, p) else {
            self.reset();
            return ToolResult::none();
        };
        self.reset();
        let id = drawing.id;
        let points = next.absolute_points();
        let (Some(&start), Some(&end)) = (points.first(), points.last()) else {
            return discard(id);
        };
        if start.distance(end) < self.config.min_size {
            // Release every back reference the provisional arrow picked up.
            let after = ctx.scene.update_elements(changed.iter().cloned());
            let released: Vec<Element> = [Endpoint::Start, Endpoint::End]
                .into_iter()
                .flat_map(|end| unbind_endpoint(&after, &mut next, end))
                .collect();
            debug!(%id, "connector discarded");
            return updates(changed).and(updates(released)).and(discard(id));
        }
        debug!(%id, points = points.len(), "connector done");
        ToolResult::UpdateElement(next).and(updates(changed)).and(finish(id))
    }

    fn on_key_down(&mut self, ctx: &ToolContext<'_>, key: &Key, _modifiers: Modifiers) -> ToolResult {
        if !key.is_escape() {
            return ToolResult::none();
        }
        let drawing = self.drawing;
        self.reset();
        let Some(drawing) = drawing else {
            return ToolResult::none();
        };
        let Some(live) = ctx.scene.active_element(drawing.id) else {
            return ToolResult::none();
        };
        let mut next = live.clone();
        let released: Vec<Element> =
            [Endpoint::Start, Endpoint::End].into_iter().flat_map(|end| unbind_endpoint(ctx.scene, &mut next, end)).collect();
        updates(released).and(discard(drawing.id))
    }

    fn overlay(&self) -> &ToolOverlay {
        &self.overlay
    }

    fn reset(&mut self) {
        self.drawing = None;
        self.overlay = ToolOverlay::default();
    }
}
