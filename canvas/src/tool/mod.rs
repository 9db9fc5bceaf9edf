//! Interactive tools.
//!
//! A tool turns pointer and key events into [`ToolResult`] values. It reads
//! the editor through a [`ToolContext`] snapshot and never writes to it; the
//! [`crate::editor::Editor`] folds every result and hands the next event a
//! fresh context. Transient gesture state (captured snapshots, the active
//! handle) is owned by the tool and cleared by [`Tool::reset`].

mod create;
mod select;

pub use create::{ConnectorTool, ShapeTool};
pub use select::{SelectState, SelectTool};

use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::element::{Element, ElementId};
use crate::geom::{Bounds, Point};
use crate::input::{Key, Modifiers, ToolKind};
use crate::mutation::{Selection, ToolResult};
use crate::scene::Scene;
use crate::viewport::Viewport;

/// Read-only view of the editor handed to every tool callback.
#[derive(Debug, Clone, Copy)]
pub struct ToolContext<'a> {
    pub scene: &'a Scene,
    pub viewport: &'a Viewport,
    pub selection: &'a Selection,
}

impl ToolContext<'_> {
    /// A screen-pixel slop converted to scene units at the current zoom.
    #[must_use]
    pub fn scene_radius(&self, px: f64) -> f64 {
        self.viewport.screen_dist_to_scene(px)
    }
}

/// Transient visuals for the renderer. Nothing here is part of the scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolOverlay {
    /// Marquee rectangle being dragged.
    pub marquee: Option<Bounds>,
    /// Points of an element being created.
    pub creation_points: Vec<Point>,
    /// Element a dragged connector endpoint would bind to.
    pub bind_target: Option<ElementId>,
}

/// An interactive tool. Pointer positions are in scene coordinates.
pub trait Tool {
    fn kind(&self) -> ToolKind;

    fn on_pointer_down(&mut self, ctx: &ToolContext<'_>, point: Point, modifiers: Modifiers) -> ToolResult;

    fn on_pointer_move(&mut self, ctx: &ToolContext<'_>, point: Point, modifiers: Modifiers) -> ToolResult;

    fn on_pointer_up(&mut self, ctx: &ToolContext<'_>, point: Point, modifiers: Modifiers) -> ToolResult;

    fn on_key_down(&mut self, ctx: &ToolContext<'_>, key: &Key, modifiers: Modifiers) -> ToolResult;

    fn overlay(&self) -> &ToolOverlay;

    /// Drop any in-progress gesture without emitting mutations.
    fn reset(&mut self);
}

/// Build a fresh tool for `kind`.
#[must_use]
pub fn make_tool(kind: ToolKind, config: EditorConfig) -> Box<dyn Tool> {
    match kind {
        ToolKind::Select => Box::new(SelectTool::new(config)),
        ToolKind::Shape(shape) => Box::new(ShapeTool::new(shape, config)),
        ToolKind::Connector { orthogonal } => Box::new(ConnectorTool::new(orthogonal, config)),
    }
}

/// `next` stamped as the successor of the live copy in `scene`. Unknown ids
/// pass through unchanged.
fn successor(scene: &Scene, next: Element) -> Element {
    match scene.element(next.id) {
        Some(live) => next.with_version_after(live),
        None => next,
    }
}

fn updates(elements: impl IntoIterator<Item = Element>) -> ToolResult {
    ToolResult::compound(elements.into_iter().map(ToolResult::UpdateElement))
}
