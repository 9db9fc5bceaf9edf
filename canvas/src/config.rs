//! Editor tunables with environment overrides.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts;

/// Error returned by [`EditorConfig::from_env`].
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    /// An override variable was set but did not parse as a number.
    #[error("invalid number in {var}: {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    /// An override parsed but is outside the accepted range.
    #[error("{var} must be {expected}, got {value}")]
    OutOfRange { var: &'static str, expected: &'static str, value: f64 },
}

/// Interaction tunables for tools and the editor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Pointer travel (scene units) before a press commits to a drag.
    pub drag_threshold: f64,
    /// Resize/rotate handle hit slop in screen pixels.
    pub handle_radius_px: f64,
    /// Connector vertex hit slop in screen pixels.
    pub vertex_radius_px: f64,
    /// Rotate handle distance above the selection box in screen pixels.
    pub rotate_handle_offset_px: f64,
    /// Radius (scene units) within which connector endpoints bind.
    pub snap_radius: f64,
    /// Minimum width/height produced by resize and creation.
    pub min_size: f64,
    pub nudge_step: f64,
    pub nudge_step_large: f64,
    /// Offset for duplicate and paste.
    pub paste_offset: f64,
    /// Rotation snap increment in radians.
    pub rotation_snap: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            drag_threshold: consts::DRAG_THRESHOLD,
            handle_radius_px: consts::HANDLE_RADIUS_PX,
            vertex_radius_px: consts::VERTEX_RADIUS_PX,
            rotate_handle_offset_px: consts::ROTATE_HANDLE_OFFSET_PX,
            snap_radius: consts::BIND_SNAP_RADIUS,
            min_size: consts::MIN_ELEMENT_SIZE,
            nudge_step: consts::NUDGE_STEP,
            nudge_step_large: consts::NUDGE_STEP_LARGE,
            paste_offset: consts::PASTE_OFFSET,
            rotation_snap: consts::ROTATION_SNAP,
        }
    }
}

impl EditorConfig {
    /// Build config from defaults overlaid with environment variables.
    ///
    /// Optional, all numeric:
    /// - `CANVAS_DRAG_THRESHOLD`
    /// - `CANVAS_HANDLE_RADIUS_PX`
    /// - `CANVAS_VERTEX_RADIUS_PX`
    /// - `CANVAS_ROTATE_HANDLE_OFFSET_PX`
    /// - `CANVAS_SNAP_RADIUS`
    /// - `CANVAS_MIN_SIZE` (must be > 0)
    /// - `CANVAS_NUDGE_STEP`
    /// - `CANVAS_NUDGE_STEP_LARGE`
    /// - `CANVAS_PASTE_OFFSET`
    /// - `CANVAS_ROTATION_SNAP_DEG` (degrees, >= 0; 0 disables snapping)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidNumber`] for unparseable values and
    /// [`ConfigError::OutOfRange`] for negative radii or a non-positive
    /// minimum size.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut cfg = Self::default();
        cfg.drag_threshold = env_non_negative("CANVAS_DRAG_THRESHOLD", cfg.drag_threshold)?;
        cfg.handle_radius_px = env_non_negative("CANVAS_HANDLE_RADIUS_PX", cfg.handle_radius_px)?;
        cfg.vertex_radius_px = env_non_negative("CANVAS_VERTEX_RADIUS_PX", cfg.vertex_radius_px)?;
        cfg.rotate_handle_offset_px = env_non_negative("CANVAS_ROTATE_HANDLE_OFFSET_PX", cfg.rotate_handle_offset_px)?;
        cfg.snap_radius = env_non_negative("CANVAS_SNAP_RADIUS", cfg.snap_radius)?;
        cfg.min_size = env_parse_f64("CANVAS_MIN_SIZE", cfg.min_size)?;
        if cfg.min_size <= 0.0 {
            return Err(ConfigError::OutOfRange { var: "CANVAS_MIN_SIZE", expected: "> 0", value: cfg.min_size });
        }
        cfg.nudge_step = env_parse_f64("CANVAS_NUDGE_STEP", cfg.nudge_step)?;
        cfg.nudge_step_large = env_parse_f64("CANVAS_NUDGE_STEP_LARGE", cfg.nudge_step_large)?;
        cfg.paste_offset = env_parse_f64("CANVAS_PASTE_OFFSET", cfg.paste_offset)?;
        let snap_deg = env_non_negative("CANVAS_ROTATION_SNAP_DEG", cfg.rotation_snap.to_degrees())?;
        cfg.rotation_snap = snap_deg.to_radians();
        Ok(cfg)
    }
}

fn env_parse_f64(var: &'static str, default: f64) -> Result<f64, ConfigError> {
    let Ok(raw) = std::env::var(var) else {
        return Ok(default);
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ConfigError::InvalidNumber { var, value: raw }),
    }
}

fn env_non_negative(var: &'static str, default: f64) -> Result<f64, ConfigError> {
    let value = env_parse_f64(var, default)?;
    if value < 0.0 {
        return Err(ConfigError::OutOfRange { var, expected: ">= 0", value });
    }
    Ok(value)
}
