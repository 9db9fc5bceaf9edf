use tracing::debug;

use crate::config::EditorConfig;
use crate::element::{Element, ElementId};
use crate::geom::Point;
use crate::input::{InputEvent, Key, Modifiers, ToolKind};
use crate::mutation::{EditorState, Selection, ToolResult};
use crate::scene::Scene;
use crate::tool::{Tool, ToolContext, ToolOverlay, make_tool};
use crate::viewport::Viewport;

#[cfg(test)]
#[path = "editor_test.rs"]
mod editor_test;

/// Editor facade: owns the state, the active tool and every parked tool.
///
/// Each input goes to the active tool with a fresh [`ToolContext`]; the
/// returned [`ToolResult`] is folded into the state before the next input.
/// When a result switches tools, the old instance is reset and parked so its
/// clipboard survives a round trip through a creation tool.
pub struct Editor {
    state: EditorState,
    config: EditorConfig,
    tool: Box<dyn Tool>,
    parked: Vec<Box<dyn Tool>>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        let state = EditorState::default();
        let tool = make_tool(state.active_tool, config);
        Self { state, config, tool, parked: Vec::new() }
    }

    /// Editor over an existing scene.
    #[must_use]
    pub fn with_scene(config: EditorConfig, scene: Scene) -> Self {
        let mut editor = Self::new(config);
        editor.state.scene = scene;
        editor
    }

    // --- Queries ---

    #[must_use]
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.state.scene
    }

    /// Look up an element by id, deleted or not.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.state.scene.element(id)
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.state.selection
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.state.viewport
    }

    #[must_use]
    pub fn active_tool(&self) -> ToolKind {
        self.tool.kind()
    }

    /// Transient visuals of the active tool.
    #[must_use]
    pub fn overlay(&self) -> &ToolOverlay {
        self.tool.overlay()
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    // --- Input ---

    pub fn pointer_down(&mut self, p: Point, modifiers: Modifiers) -> ToolResult {
        self.run(|tool, ctx| tool.on_pointer_down(ctx, p, modifiers))
    }

    pub fn pointer_move(&mut self, p: Point, modifiers: Modifiers) -> ToolResult {
        self.run(|tool, ctx| tool.on_pointer_move(ctx, p, modifiers))
    }

    pub fn pointer_up(&mut self, p: Point, modifiers: Modifiers) -> ToolResult {
        self.run(|tool, ctx| tool.on_pointer_up(ctx, p, modifiers))
    }

    pub fn key_down(&mut self, key: &Key, modifiers: Modifiers) -> ToolResult {
        self.run(|tool, ctx| tool.on_key_down(ctx, key, modifiers))
    }

    /// Switch tools, dropping any gesture in progress.
    pub fn set_tool(&mut self, kind: ToolKind) -> ToolResult {
        self.apply(ToolResult::SwitchTool(kind))
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> ToolResult {
        self.apply(ToolResult::SetViewport(viewport))
    }

    /// Route a recorded event to the matching handler.
    pub fn dispatch(&mut self, event: &InputEvent) -> ToolResult {
        match event {
            InputEvent::PointerDown { x, y, modifiers } => self.pointer_down(Point::new(*x, *y), *modifiers),
            InputEvent::PointerMove { x, y, modifiers } => self.pointer_move(Point::new(*x, *y), *modifiers),
            InputEvent::PointerUp { x, y, modifiers } => self.pointer_up(Point::new(*x, *y), *modifiers),
            InputEvent::KeyDown { key, modifiers } => self.key_down(key, *modifiers),
            InputEvent::SetTool { tool } => self.set_tool(*tool),
        }
    }

    /// Fold a result produced outside the tools (host edits, undo).
    pub fn apply(&mut self, result: ToolResult) -> ToolResult {
        if result.is_empty() {
            return result;
        }
        self.state = std::mem::take(&mut self.state).apply_result(&result);
        if self.state.active_tool != self.tool.kind() {
            self.swap_tool(self.state.active_tool);
        }
        result
    }

    // --- Internals ---

    fn run(&mut self, f: impl FnOnce(&mut dyn Tool, &ToolContext<'_>) -> ToolResult) -> ToolResult {
        let result = {
            let ctx = ToolContext { scene: &self.state.scene, viewport: &self.state.viewport, selection: &self.state.selection };
            f(self.tool.as_mut(), &ctx)
        };
        self.apply(result)
    }

    fn swap_tool(&mut self, kind: ToolKind) {
        let next = match self.parked.iter().position(|t| t.kind() == kind) {
            Some(i) => self.parked.swap_remove(i),
            None => make_tool(kind, self.config),
        };
        let mut prev = std::mem::replace(&mut self.tool, next);
        prev.reset();
        debug!(from = ?prev.kind(), to = ?kind, "tool swapped");
        self.parked.push(prev);
    }
}
