#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_ZOOM, MIN_ZOOM};
use crate::geom::Point;

/// Pan/zoom state mapping scene coordinates to screen pixels.
///
/// `pan_x` / `pan_y` are in screen pixels.
/// `zoom` is a scale factor (1.0 = no zoom), clamped to `[MIN_ZOOM, MAX_ZOOM]`.
///
/// The core only consumes this to size hit slop; pointer coordinates arrive
/// already in scene space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Viewport {
    /// Convert a screen-space point (pixels) to scene coordinates.
    #[must_use]
    pub fn screen_to_scene(&self, screen: Point) -> Point {
        Point { x: (screen.x - self.pan_x) / self.zoom, y: (screen.y - self.pan_y) / self.zoom }
    }

    /// Convert a scene-space point to screen coordinates (pixels).
    #[must_use]
    pub fn scene_to_screen(&self, scene: Point) -> Point {
        Point { x: scene.x * self.zoom + self.pan_x, y: scene.y * self.zoom + self.pan_y }
    }

    /// Convert a screen-space distance (pixels) to a scene-space distance.
    #[must_use]
    pub fn screen_dist_to_scene(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// Zoom by `factor` keeping the scene point under `screen_anchor` fixed.
    #[must_use]
    pub fn zoomed_at(&self, screen_anchor: Point, factor: f64) -> Viewport {
        let anchor_scene = self.screen_to_scene(screen_anchor);
        let zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        Viewport {
            pan_x: screen_anchor.x - anchor_scene.x * zoom,
            pan_y: screen_anchor.y - anchor_scene.y * zoom,
            zoom,
        }
    }

    /// Pan by a screen-space delta.
    #[must_use]
    pub fn panned_by(&self, dx: f64, dy: f64) -> Viewport {
        Viewport { pan_x: self.pan_x + dx, pan_y: self.pan_y + dy, zoom: self.zoom }
    }
}
