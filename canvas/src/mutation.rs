//! Mutation protocol: tools never write to the scene directly.
//!
//! Every gesture step returns one [`ToolResult`] value, however many scene
//! writes it implies. [`EditorState::apply_result`] is the single reducer
//! that folds those values into the next editor state; a `Compound` applies
//! its members strictly in order, each one seeing the effect of the last.

#[cfg(test)]
#[path = "mutation_test.rs"]
mod mutation_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::element::{Element, ElementId};
use crate::input::ToolKind;
use crate::scene::Scene;
use crate::viewport::Viewport;

// =============================================================================
// SELECTION
// =============================================================================

/// Ordered, duplicate-free set of selected element ids.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    ids: Vec<ElementId>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection of `ids` in first-seen order.
    #[must_use]
    pub fn from_ids(ids: impl IntoIterator<Item = ElementId>) -> Self {
        let mut sel = Self::new();
        for id in ids {
            sel.insert(id);
        }
        sel
    }

    #[must_use]
    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.ids.contains(&id)
    }

    /// The only selected id, if exactly one element is selected.
    #[must_use]
    pub fn single(&self) -> Option<ElementId> {
        match self.ids.as_slice() {
            [id] => Some(*id),
            _ => None,
        }
    }

    /// Add `id` at the end. Returns whether it was new.
    pub fn insert(&mut self, id: ElementId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Returns whether `id` was present.
    pub fn remove(&mut self, id: ElementId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|x| *x != id);
        self.ids.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.ids.iter().copied()
    }
}

// =============================================================================
// TOOL RESULT
// =============================================================================

/// One mutation, or an ordered batch of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data", rename_all = "snake_case")]
pub enum ToolResult {
    AddElement(Element),
    UpdateElement(Element),
    RemoveElement { id: ElementId },
    SetSelection(Vec<ElementId>),
    SetViewport(Viewport),
    SwitchTool(ToolKind),
    Compound(Vec<ToolResult>),
}

impl Default for ToolResult {
    fn default() -> Self {
        Self::none()
    }
}

impl ToolResult {
    /// The empty result: applying it changes nothing.
    #[must_use]
    pub fn none() -> Self {
        Self::Compound(Vec::new())
    }

    /// Whether this result carries no leaf mutation at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Batch `results` in order, flattening nested compounds and dropping
    /// empty ones.
    #[must_use]
    pub fn compound(results: impl IntoIterator<Item = ToolResult>) -> Self {
        let mut out = Vec::new();
        for r in results {
            r.flatten_into(&mut out);
        }
        Self::Compound(out)
    }

    /// `self` followed by `other`.
    #[must_use]
    pub fn and(self, other: ToolResult) -> Self {
        Self::compound([self, other])
    }

    /// Number of leaf mutations.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Compound(items) => items.iter().map(ToolResult::len).sum(),
            _ => 1,
        }
    }

    /// Leaf mutations in application order.
    #[must_use]
    pub fn leaves(&self) -> Vec<&ToolResult> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    /// Every element written by an `UpdateElement` leaf for `id`.
    #[must_use]
    pub fn updates_for(&self, id: ElementId) -> Vec<&Element> {
        self.leaves()
            .into_iter()
            .filter_map(|r| match r {
                Self::UpdateElement(el) if el.id == id => Some(el),
                _ => None,
            })
            .collect()
    }

    fn flatten_into(self, out: &mut Vec<ToolResult>) {
        match self {
            Self::Compound(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
            leaf => out.push(leaf),
        }
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a ToolResult>) {
        match self {
            Self::Compound(items) => {
                for item in items {
                    item.collect_leaves(out);
                }
            }
            leaf => out.push(leaf),
        }
    }
}

impl From<Vec<ToolResult>> for ToolResult {
    fn from(results: Vec<ToolResult>) -> Self {
        Self::compound(results)
    }
}

/// One line per leaf, for logs and the CLI summary.
impl fmt::Display for ToolResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddElement(el) => write!(f, "add {} {} v{}", el.kind.name(), el.id, el.version),
            Self::UpdateElement(el) => write!(f, "update {} {} v{}", el.kind.name(), el.id, el.version),
            Self::RemoveElement { id } => write!(f, "remove {id}"),
            Self::SetSelection(ids) => write!(f, "select {}", ids.len()),
            Self::SetViewport(v) => write!(f, "viewport {:.1},{:.1} x{:.2}", v.pan_x, v.pan_y, v.zoom),
            Self::SwitchTool(kind) => write!(f, "tool {kind:?}"),
            Self::Compound(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

// =============================================================================
// EDITOR STATE
// =============================================================================

/// Everything a tool result can change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditorState {
    pub scene: Scene,
    pub viewport: Viewport,
    pub selection: Selection,
    pub active_tool: ToolKind,
}

impl EditorState {
    #[must_use]
    pub fn new(scene: Scene) -> Self {
        Self { scene, ..Self::default() }
    }

    /// Fold `result` into the state.
    ///
    /// `RemoveElement` soft-deletes and drops the id from the selection.
    /// Selections never keep ids the scene cannot resolve to an active element.
    #[must_use]
    pub fn apply_result(mut self, result: &ToolResult) -> Self {
        match result {
            ToolResult::AddElement(el) => {
                self.scene = self.scene.add_element(el.clone());
            }
            ToolResult::UpdateElement(el) => {
                self.scene = self.scene.update_element(el.clone());
            }
            ToolResult::RemoveElement { id } => {
                self.scene = self.scene.soft_delete_element(*id);
                self.selection.remove(*id);
            }
            ToolResult::SetSelection(ids) => {
                let scene = &self.scene;
                self.selection = Selection::from_ids(ids.iter().copied().filter(|id| scene.active_element(*id).is_some()));
            }
            ToolResult::SetViewport(viewport) => {
                self.viewport = *viewport;
            }
            ToolResult::SwitchTool(kind) => {
                debug!(from = ?self.active_tool, to = ?kind, "switch tool");
                self.active_tool = *kind;
            }
            ToolResult::Compound(items) => {
                for item in items {
                    self = self.apply_result(item);
                }
            }
        }
        self
    }
}
