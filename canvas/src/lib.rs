//! Vector-scene editing core for a diagram editor.
//!
//! This crate owns everything between "a pointer event arrived in scene
//! coordinates" and "here is the next immutable scene": the element model,
//! connector bindings that keep arrows attached to shapes, orthogonal
//! routing, and the selection/transform state machine. Tools never write to
//! the scene; they return [`mutation::ToolResult`] values that the
//! [`editor::Editor`] folds into [`mutation::EditorState`]. Rendering,
//! persistence and undo live with the host.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`editor`] | Facade that feeds input to the active tool and folds results |
//! | [`tool`] | `Tool` trait, select tool and creation tools |
//! | [`mutation`] | `ToolResult`, `Selection` and the `EditorState` reducer |
//! | [`transform`] | Resize and rotate math |
//! | [`hit`] | Handles, vertices and element hit-testing |
//! | [`binding`] | Connector bindings and reverse references |
//! | [`elbow`] | Orthogonal connector router |
//! | [`scene`] | Immutable element collection |
//! | [`element`] | Element variants and versioning |
//! | [`order`] | Fractional paint-order keys |
//! | [`input`] | Tool kinds, modifiers, keys and recorded input events |
//! | [`viewport`] | Pan/zoom and coordinate conversions |
//! | [`geom`] | Points and bounds |
//! | [`config`] | Interaction tunables with environment overrides |
//! | [`consts`] | Shared numeric constants (zoom limits, hit slop, etc.) |

pub mod binding;
pub mod config;
pub mod consts;
pub mod editor;
pub mod elbow;
pub mod element;
pub mod geom;
pub mod hit;
pub mod input;
pub mod mutation;
pub mod order;
pub mod scene;
pub mod tool;
pub mod transform;
pub mod viewport;
