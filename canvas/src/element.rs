//! Element model: the tagged-variant entity set every scene is made of.
//!
//! An [`Element`] is a value. Every edit produces a new copy with a strictly
//! greater `version` and a fresh random `revision`; the `id` never changes.
//! Two elements compare equal (and hash identically) when their ids match,
//! because they are the same logical entity at possibly different versions.
//!
//! Cross-element references (`frame_id`, `bound_elements`, text
//! `container_id`, connector bindings) are plain ids resolved through the
//! owning [`crate::scene::Scene`] at use time.

#[cfg(test)]
#[path = "element_test.rs"]
mod element_test;

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::binding::PointBinding;
use crate::geom::{Bounds, Point};
use crate::order::OrderKey;

/// Unique identifier for an element.
pub type ElementId = Uuid;

/// Identifier shared by every member of a group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub String);

impl GroupId {
    /// A fresh, globally unique group id.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }
}

// =============================================================================
// PAINT
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillStyle {
    #[default]
    Hachure,
    CrossHatch,
    Solid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Corner rounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Roundness {
    /// Radius proportional to the shorter side.
    Proportional,
    /// Fixed radius in scene units.
    Fixed { radius: f64 },
}

/// Visual attributes shared by every element variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Paint {
    /// Stroke color as a CSS color string.
    pub stroke_color: String,
    /// Fill color as a CSS color string.
    pub background_color: String,
    pub fill_style: FillStyle,
    pub stroke_width: f64,
    pub stroke_style: StrokeStyle,
    /// Hand-drawn jitter level (0 = architect, 2 = cartoonist).
    pub roughness: u8,
    /// Opacity in percent, 0–100.
    pub opacity: u8,
    pub roundness: Option<Roundness>,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            stroke_color: "#1e1e1e".into(),
            background_color: "transparent".into(),
            fill_style: FillStyle::default(),
            stroke_width: 2.0,
            stroke_style: StrokeStyle::default(),
            roughness: 1,
            opacity: 100,
            roundness: None,
        }
    }
}

// =============================================================================
// VARIANT DATA
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arrowhead {
    Arrow,
    Bar,
    Dot,
    Triangle,
}

/// Point sequence shared by lines and connectors. Points are relative to the
/// element's `(x, y)` and the first one is always the origin.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LinearData {
    pub points: Vec<Point>,
    pub start_arrowhead: Option<Arrowhead>,
    pub end_arrowhead: Option<Arrowhead>,
}

/// A linear element whose endpoints may attach to shapes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConnectorData {
    pub linear: LinearData,
    pub start_binding: Option<PointBinding>,
    pub end_binding: Option<PointBinding>,
    /// Route with horizontal/vertical segments only.
    pub orthogonal: bool,
}

impl ConnectorData {
    /// Binding for one endpoint.
    #[must_use]
    pub fn binding(&self, end: Endpoint) -> Option<&PointBinding> {
        match end {
            Endpoint::Start => self.start_binding.as_ref(),
            Endpoint::End => self.end_binding.as_ref(),
        }
    }

    /// Mutable slot for one endpoint's binding.
    pub fn binding_slot(&mut self, end: Endpoint) -> &mut Option<PointBinding> {
        match end {
            Endpoint::Start => &mut self.start_binding,
            Endpoint::End => &mut self.end_binding,
        }
    }
}

/// Which end of a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Start,
    End,
}

/// Freehand stroke with per-point pen pressure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FreehandData {
    pub points: Vec<Point>,
    /// One entry per point; empty when the device reported no pressure.
    pub pressures: Vec<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextData {
    pub text: String,
    pub font_size: f64,
    pub font_family: String,
    pub line_height: f64,
    pub text_align: TextAlign,
    /// Shape this text is bound inside, if any.
    pub container_id: Option<ElementId>,
}

impl Default for TextData {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: 20.0,
            font_family: "Virgil".into(),
            line_height: 1.25,
            text_align: TextAlign::default(),
            container_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameData {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageStatus {
    #[default]
    Pending,
    Saved,
    Error,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageData {
    /// Key into the host's file store.
    pub file_id: Option<String>,
    pub status: ImageStatus,
}

/// Variant-specific data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementKind {
    Rectangle,
    Ellipse,
    Diamond,
    Line(LinearData),
    Arrow(ConnectorData),
    Freehand(FreehandData),
    Text(TextData),
    Frame(FrameData),
    Image(ImageData),
}

impl ElementKind {
    /// Short lowercase name, used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Ellipse => "ellipse",
            Self::Diamond => "diamond",
            Self::Line(_) => "line",
            Self::Arrow(_) => "arrow",
            Self::Freehand(_) => "freehand",
            Self::Text(_) => "text",
            Self::Frame(_) => "frame",
            Self::Image(_) => "image",
        }
    }

    /// Rectangle, ellipse or diamond.
    #[must_use]
    pub fn is_shape(&self) -> bool {
        matches!(self, Self::Rectangle | Self::Ellipse | Self::Diamond)
    }

    /// Variants whose geometry is a point sequence.
    #[must_use]
    pub fn is_linear(&self) -> bool {
        matches!(self, Self::Line(_) | Self::Arrow(_) | Self::Freehand(_))
    }
}

/// What kind of element sits in a target's reverse-reference list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundElementKind {
    Arrow,
    Text,
}

/// Reverse reference: an element that points at the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundElement {
    pub id: ElementId,
    pub kind: BoundElementKind,
}

// =============================================================================
// ELEMENT
// =============================================================================

/// A scene element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    /// Immutable identity.
    pub id: ElementId,
    /// Left edge of the frame (first absolute point for linear variants).
    pub x: f64,
    /// Top edge of the frame (first absolute point for linear variants).
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Clockwise rotation in radians about the bounds' center.
    pub angle: f64,
    pub paint: Paint,
    /// Monotonically increasing edit counter.
    pub version: u32,
    /// Random token re-rolled on every edit.
    pub revision: u32,
    /// Soft-delete tombstone.
    pub is_deleted: bool,
    /// Group membership, innermost first.
    pub group_ids: Vec<GroupId>,
    /// Frame this element is clipped to, if any.
    pub frame_id: Option<ElementId>,
    /// Elements that reference this one (bound arrows, bound text).
    pub bound_elements: Vec<BoundElement>,
    /// Paint/selection order; `None` sorts last.
    pub order_index: Option<OrderKey>,
    pub locked: bool,
    pub kind: ElementKind,
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Element {}

impl Hash for Element {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Element {
    /// A fresh element of `kind` occupying `frame`, at version 1.
    #[must_use]
    pub fn new(kind: ElementKind, frame: Bounds) -> Self {
        Self {
            id: Uuid::new_v4(),
            x: frame.left,
            y: frame.top,
            width: frame.width,
            height: frame.height,
            angle: 0.0,
            paint: Paint::default(),
            version: 1,
            revision: rand::random(),
            is_deleted: false,
            group_ids: Vec::new(),
            frame_id: None,
            bound_elements: Vec::new(),
            order_index: None,
            locked: false,
            kind,
        }
    }

    #[must_use]
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(ElementKind::Rectangle, Bounds::new(x, y, width, height))
    }

    #[must_use]
    pub fn ellipse(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(ElementKind::Ellipse, Bounds::new(x, y, width, height))
    }

    #[must_use]
    pub fn diamond(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(ElementKind::Diamond, Bounds::new(x, y, width, height))
    }

    #[must_use]
    pub fn frame(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(ElementKind::Frame(FrameData::default()), Bounds::new(x, y, width, height))
    }

    #[must_use]
    pub fn image(x: f64, y: f64, width: f64, height: f64, file_id: Option<String>) -> Self {
        Self::new(ElementKind::Image(ImageData { file_id, status: ImageStatus::Pending }), Bounds::new(x, y, width, height))
    }

    /// Text element sized from a rough glyph-metric estimate.
    #[must_use]
    pub fn text(x: f64, y: f64, text: &str, font_size: f64) -> Self {
        let data = TextData { text: text.to_owned(), font_size, ..TextData::default() };
        let (width, height) = estimate_text_size(&data);
        Self::new(ElementKind::Text(data), Bounds::new(x, y, width, height))
    }

    /// Straight or polyline element through absolute `points`.
    #[must_use]
    pub fn line(points: &[Point]) -> Self {
        let mut el = Self::new(ElementKind::Line(LinearData::default()), Bounds::default());
        el.set_absolute_points(points);
        el
    }

    /// Connector through absolute `points` with an end arrowhead and no bindings.
    #[must_use]
    pub fn arrow(points: &[Point]) -> Self {
        let data = ConnectorData {
            linear: LinearData { end_arrowhead: Some(Arrowhead::Arrow), ..LinearData::default() },
            ..ConnectorData::default()
        };
        let mut el = Self::new(ElementKind::Arrow(data), Bounds::default());
        el.set_absolute_points(points);
        el
    }

    /// Freehand stroke through absolute `points`.
    #[must_use]
    pub fn freehand(points: &[Point], pressures: Vec<f32>) -> Self {
        let mut el = Self::new(ElementKind::Freehand(FreehandData { points: Vec::new(), pressures }), Bounds::default());
        el.set_absolute_points(points);
        el
    }

    // --- Lifecycle ---

    /// Not soft-deleted.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }

    /// Advance `version` by one and re-roll `revision`.
    pub fn bump_version(&mut self) {
        self.version = self.version.saturating_add(1);
        self.revision = rand::random();
    }

    /// This element stamped as the successor of `prior`: version
    /// `prior.version + 1` and a fresh revision.
    #[must_use]
    pub fn with_version_after(mut self, prior: &Element) -> Self {
        self.version = prior.version;
        self.bump_version();
        self
    }

    // --- Geometry ---

    /// The stored `(x, y, width, height)` frame.
    #[must_use]
    pub fn frame_bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }

    /// Unrotated bounds: the point extents for linear variants, the frame
    /// otherwise.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        if self.kind.is_linear() {
            if let Some(b) = Bounds::from_points(&self.absolute_points()) {
                return b;
            }
        }
        self.frame_bounds()
    }

    #[must_use]
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Axis-aligned box of the rotated bounds.
    #[must_use]
    pub fn aabb(&self) -> Bounds {
        self.bounds().rotated_aabb(self.angle)
    }

    /// Relative point sequence of a linear variant.
    #[must_use]
    pub fn points(&self) -> Option<&[Point]> {
        match &self.kind {
            ElementKind::Line(d) => Some(&d.points),
            ElementKind::Arrow(c) => Some(&c.linear.points),
            ElementKind::Freehand(f) => Some(&f.points),
            ElementKind::Rectangle
            | ElementKind::Ellipse
            | ElementKind::Diamond
            | ElementKind::Text(_)
            | ElementKind::Frame(_)
            | ElementKind::Image(_) => None,
        }
    }

    fn points_mut(&mut self) -> Option<&mut Vec<Point>> {
        match &mut self.kind {
            ElementKind::Line(d) => Some(&mut d.points),
            ElementKind::Arrow(c) => Some(&mut c.linear.points),
            ElementKind::Freehand(f) => Some(&mut f.points),
            ElementKind::Rectangle
            | ElementKind::Ellipse
            | ElementKind::Diamond
            | ElementKind::Text(_)
            | ElementKind::Frame(_)
            | ElementKind::Image(_) => None,
        }
    }

    /// Scene-space points of a linear variant (empty for other variants).
    #[must_use]
    pub fn absolute_points(&self) -> Vec<Point> {
        let origin = Point::new(self.x, self.y);
        self.points().map_or_else(Vec::new, |pts| pts.iter().map(|p| origin + *p).collect())
    }

    /// Replace a linear variant's geometry with scene-space `points`,
    /// renormalizing so the first point is the origin and the frame size
    /// mirrors the point extents. No-op for other variants or an empty slice.
    pub fn set_absolute_points(&mut self, points: &[Point]) {
        let Some(&origin) = points.first() else {
            return;
        };
        let Some(slot) = self.points_mut() else {
            return;
        };
        *slot = points.iter().map(|p| *p - origin).collect();
        self.x = origin.x;
        self.y = origin.y;
        if let Some(b) = Bounds::from_points(points) {
            self.width = b.width;
            self.height = b.height;
        }
    }

    /// Shift the element by `delta` (frame origin only; relative points are untouched).
    pub fn translate(&mut self, delta: Point) {
        self.x += delta.x;
        self.y += delta.y;
    }

    // --- Variant accessors ---

    #[must_use]
    pub fn connector(&self) -> Option<&ConnectorData> {
        match &self.kind {
            ElementKind::Arrow(c) => Some(c),
            _ => None,
        }
    }

    pub fn connector_mut(&mut self) -> Option<&mut ConnectorData> {
        match &mut self.kind {
            ElementKind::Arrow(c) => Some(c),
            _ => None,
        }
    }

    #[must_use]
    pub fn text_data(&self) -> Option<&TextData> {
        match &self.kind {
            ElementKind::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Container of bound text.
    #[must_use]
    pub fn container_id(&self) -> Option<ElementId> {
        self.text_data().and_then(|t| t.container_id)
    }

    /// Outermost group, if the element is grouped.
    #[must_use]
    pub fn outermost_group(&self) -> Option<&GroupId> {
        self.group_ids.last()
    }

    // --- Reverse references ---

    /// Add a reverse reference, ignoring duplicates. Returns whether it was added.
    pub fn add_bound_element(&mut self, bound: BoundElement) -> bool {
        if self.bound_elements.iter().any(|b| b.id == bound.id) {
            return false;
        }
        self.bound_elements.push(bound);
        true
    }

    /// Drop a reverse reference. Returns whether anything was removed.
    pub fn remove_bound_element(&mut self, id: ElementId) -> bool {
        let before = self.bound_elements.len();
        self.bound_elements.retain(|b| b.id != id);
        self.bound_elements.len() != before
    }

    #[must_use]
    pub fn has_bound_element(&self, id: ElementId) -> bool {
        self.bound_elements.iter().any(|b| b.id == id)
    }
}

/// Rough layout size for text: 0.6em per character of the longest line.
#[allow(clippy::cast_precision_loss)]
fn estimate_text_size(data: &TextData) -> (f64, f64) {
    let longest = data.text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
    let lines = data.text.lines().count().max(1);
    let width = longest as f64 * data.font_size * 0.6;
    let height = lines as f64 * data.font_size * data.line_height;
    (width, height)
}
