//! Shared numeric constants for the canvas crate.
//!
//! These seed [`crate::config::EditorConfig::default`]; code paths that have
//! no config in reach (the binding engine's elbow re-route) read them directly.

use std::f64::consts::PI;

// ── Viewport ────────────────────────────────────────────────────

/// Smallest allowed zoom factor.
pub const MIN_ZOOM: f64 = 0.1;

/// Largest allowed zoom factor.
pub const MAX_ZOOM: f64 = 30.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for resize and rotate handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Screen-space hit slop in pixels for connector vertices.
pub const VERTEX_RADIUS_PX: f64 = 10.0;

/// Distance from the selection box's top edge to the rotate handle, in screen pixels.
pub const ROTATE_HANDLE_OFFSET_PX: f64 = 24.0;

// ── Gestures ────────────────────────────────────────────────────

/// Pointer travel (scene units) before a press commits to a drag.
pub const DRAG_THRESHOLD: f64 = 3.0;

/// Radius (scene units) within which a connector endpoint binds to a shape.
pub const BIND_SNAP_RADIUS: f64 = 12.0;

/// Smallest width/height a resize or creation gesture may produce.
pub const MIN_ELEMENT_SIZE: f64 = 4.0;

/// Rotation snap increment when the snap modifier is held (15°).
pub const ROTATION_SNAP: f64 = PI / 12.0;

// ── Keyboard ────────────────────────────────────────────────────

/// Arrow-key nudge distance.
pub const NUDGE_STEP: f64 = 1.0;

/// Arrow-key nudge distance with shift held.
pub const NUDGE_STEP_LARGE: f64 = 10.0;

/// Offset applied to duplicated and pasted elements.
pub const PASTE_OFFSET: f64 = 10.0;

// ── Routing ─────────────────────────────────────────────────────

/// Gap an elbow connector keeps from a bound shape before its first turn.
pub const ELBOW_CLEARANCE: f64 = 16.0;
