//! Input model: tool kinds, modifier keys, key names, and replayable events.
//!
//! Pointer coordinates reaching the core are already in scene space; the
//! host maps device pixels through the [`crate::viewport::Viewport`] first.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::geom::Point;

/// Shape produced by the shape-creation tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Ellipse,
    Diamond,
}

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    /// Drag out a rectangle, ellipse or diamond.
    Shape(ShapeKind),
    /// Drag out an arrow, optionally routed orthogonally.
    Connector { orthogonal: bool },
}

impl ToolKind {
    /// Whether this tool creates new elements.
    #[must_use]
    pub fn is_creation(self) -> bool {
        !matches!(self, Self::Select)
    }
}

/// Keyboard modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Shift: aspect lock, rotation snap, additive selection, large nudge.
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self { shift: false, ctrl: false, alt: false, meta: false };
    pub const SHIFT: Self = Self { shift: true, ctrl: false, alt: false, meta: false };
    pub const CTRL: Self = Self { shift: false, ctrl: true, alt: false, meta: false };

    /// Ctrl on most platforms, Cmd on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// A keyboard key, named as the browser reports it in `KeyboardEvent.key`
/// (e.g. `"Delete"`, `"Escape"`, `"ArrowLeft"`, `"d"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape"
    }

    /// `Delete` or `Backspace`.
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self.0.as_str(), "Delete" | "Backspace")
    }

    /// Unit direction of an arrow key in y-down scene space.
    #[must_use]
    pub fn arrow_direction(&self) -> Option<Point> {
        match self.0.as_str() {
            "ArrowUp" => Some(Point::new(0.0, -1.0)),
            "ArrowDown" => Some(Point::new(0.0, 1.0)),
            "ArrowLeft" => Some(Point::new(-1.0, 0.0)),
            "ArrowRight" => Some(Point::new(1.0, 0.0)),
            _ => None,
        }
    }

    /// Whether this key is the single character `c`, ignoring ASCII case
    /// (shift turns `d` into `D`).
    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        let mut chars = self.0.chars();
        chars.next().is_some_and(|k| k.eq_ignore_ascii_case(&c)) && chars.next().is_none()
    }
}

/// One recorded input event, as replayed by hosts and test scripts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerMove {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerUp {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    KeyDown {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
    SetTool {
        tool: ToolKind,
    },
}
