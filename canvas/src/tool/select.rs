//! Selection / transform tool.
//!
//! Pointer-down dispatches in a fixed order: a vertex of the single selected
//! connector, then a handle of the selection frame, then the topmost element.
//! A plain press stays `Armed` until the pointer travels past the drag
//! threshold, at which point it commits to `Moving` (something was hit) or
//! `Marquee` (nothing was). Every committed transform captures a snapshot of
//! the affected elements and computes each step from that snapshot, never
//! from the live scene, so small moves do not accumulate drift.

#[cfg(test)]
#[path = "select_test.rs"]
mod select_test;

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};
use uuid::Uuid;

use super::{Tool, ToolContext, ToolOverlay, successor, updates};
use crate::binding::{
    PointBinding, bind_endpoint, clear_bindings_to, find_bind_target, find_bound_arrows, route_connector, unbind_endpoint,
    update_bound_arrow_endpoints,
};
use crate::config::EditorConfig;
use crate::element::{BoundElement, Element, ElementId, ElementKind, Endpoint, GroupId};
use crate::geom::{Bounds, Point};
use crate::hit::{HandleKind, ResizeHandle, SelectionFrame, hit_element, hit_vertex};
use crate::input::{Key, Modifiers, ToolKind};
use crate::mutation::{Selection, ToolResult};
use crate::order::keys_after;
use crate::scene::Scene;
use crate::transform::{resize_bounds, resize_multi, resize_single, revolve_element, rotation_delta};

/// Observable state of the selection tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectState {
    Idle,
    Armed,
    Moving,
    Resizing,
    Rotating,
    DraggingPoint,
    Marquee,
}

/// Pre-gesture copies of every element a gesture transforms.
#[derive(Debug, Clone, Default)]
struct Snapshot {
    order: Vec<ElementId>,
    elements: HashMap<ElementId, Element>,
}

impl Snapshot {
    fn capture(scene: &Scene, ids: &[ElementId]) -> Self {
        let mut snap = Self::default();
        for id in ids {
            if let Some(el) = scene.active_element(*id) {
                if snap.elements.insert(*id, el.clone()).is_none() {
                    snap.order.push(*id);
                }
            }
        }
        snap
    }

    fn iter(&self) -> impl Iterator<Item = &Element> {
        self.order.iter().filter_map(|id| self.elements.get(id))
    }

    fn len(&self) -> usize {
        self.order.len()
    }
}

#[derive(Debug, Clone, Default)]
enum Gesture {
    #[default]
    Idle,
    Armed {
        origin: Point,
        hit: Option<ElementId>,
        /// Ids a shift-click on an already-selected element removes on release.
        toggle_off: Vec<ElementId>,
        additive: bool,
    },
    Moving {
        origin: Point,
        snapshot: Snapshot,
    },
    Resizing {
        origin: Point,
        handle: ResizeHandle,
        frame: SelectionFrame,
        snapshot: Snapshot,
    },
    Rotating {
        origin: Point,
        center: Point,
        snapshot: Snapshot,
    },
    DraggingPoint {
        id: ElementId,
        index: usize,
        snapshot: Element,
    },
    Marquee {
        origin: Point,
        additive: bool,
    },
}

/// Pointer / selection tool.
#[derive(Debug, Clone)]
pub struct SelectTool {
    config: EditorConfig,
    gesture: Gesture,
    clipboard: Vec<Element>,
    overlay: ToolOverlay,
}

impl SelectTool {
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self { config, gesture: Gesture::Idle, clipboard: Vec::new(), overlay: ToolOverlay::default() }
    }

    #[must_use]
    pub fn state(&self) -> SelectState {
        match self.gesture {
            Gesture::Idle => SelectState::Idle,
            Gesture::Armed { .. } => SelectState::Armed,
            Gesture::Moving { .. } => SelectState::Moving,
            Gesture::Resizing { .. } => SelectState::Resizing,
            Gesture::Rotating { .. } => SelectState::Rotating,
            Gesture::DraggingPoint { .. } => SelectState::DraggingPoint,
            Gesture::Marquee { .. } => SelectState::Marquee,
        }
    }

    /// Elements held by the in-memory clipboard.
    #[must_use]
    pub fn clipboard(&self) -> &[Element] {
        &self.clipboard
    }

    // --- Pointer-move handlers ---

    fn drag_vertex(&mut self, scene: &Scene, id: ElementId, index: usize, snapshot: &Element, p: Point) -> ToolResult {
        let Some(live) = scene.active_element(id) else {
            return ToolResult::none();
        };
        let mut points = snapshot.absolute_points();
        let Some(last) = points.len().checked_sub(1) else {
            return ToolResult::none();
        };
        if index > last {
            return ToolResult::none();
        }
        let endpoint = if index == 0 {
            Some(Endpoint::Start)
        } else if index == last {
            Some(Endpoint::End)
        } else {
            None
        };

        let mut next = live.clone();
        points[index] = p;
        next.set_absolute_points(&points);
        self.overlay.bind_target = None;
        let mut changed_targets = Vec::new();
        if let (Some(end), Some(_)) = (endpoint, live.connector()) {
            changed_targets = match find_bind_target(scene, p, self.config.snap_radius, &[id]) {
                Some(target) => {
                    self.overlay.bind_target = Some(target.id);
                    bind_endpoint(scene, &mut next, end, target, p)
                }
                None => unbind_endpoint(scene, &mut next, end),
            };
        }
        route_connector(&mut next);
        trace!(%id, index, bound = self.overlay.bind_target.is_some(), "vertex drag");
        updates(std::iter::once(next.with_version_after(live)).chain(changed_targets))
    }

    fn finish_marquee(ctx: &ToolContext<'_>, origin: Point, p: Point, additive: bool) -> ToolResult {
        let area = Bounds::from_corners(origin, p);
        let hits = ctx.scene.elements_in_bounds(&area).into_iter().filter(|el| !el.locked).map(|el| el.id);
        let ids: Vec<ElementId> = if additive { ctx.selection.iter().chain(hits).collect() } else { hits.collect() };
        debug!(count = ids.len(), additive, "marquee select");
        ToolResult::SetSelection(ids)
    }

    // --- Keyboard handlers ---

    fn copy(&mut self, ctx: &ToolContext<'_>) {
        self.clipboard = ordered(ctx.scene, &with_bound_text(ctx.scene, ctx.selection.iter())).into_iter().cloned().collect();
        debug!(count = self.clipboard.len(), "copy");
    }

    fn duplicate(&self, ctx: &ToolContext<'_>) -> ToolResult {
        let sources: Vec<Element> = ordered(ctx.scene, &with_bound_text(ctx.scene, ctx.selection.iter())).into_iter().cloned().collect();
        let offset = Point::new(self.config.paste_offset, self.config.paste_offset);
        insert_clones(ctx.scene, &sources, offset)
    }

    fn paste(&mut self, ctx: &ToolContext<'_>) -> ToolResult {
        if self.clipboard.is_empty() {
            return ToolResult::none();
        }
        let offset = Point::new(self.config.paste_offset, self.config.paste_offset);
        let result = insert_clones(ctx.scene, &self.clipboard, offset);
        // Repeated pastes cascade instead of stacking.
        for el in &mut self.clipboard {
            el.translate(offset);
        }
        result
    }

    fn nudge(&self, ctx: &ToolContext<'_>, direction: Point, large: bool) -> ToolResult {
        let step = if large { self.config.nudge_step_large } else { self.config.nudge_step };
        let delta = direction * step;
        let ids = move_set(ctx.scene, ctx.selection);
        let detached = detach_from_unmoved(ctx.scene, &ids);
        let scene = ctx.scene.update_elements(detached.iter().cloned());
        let moved: Vec<Element> = ids
            .iter()
            .filter_map(|id| scene.active_element(*id))
            .map(|el| {
                let mut next = el.clone();
                next.translate(delta);
                next
            })
            .collect();
        let released = detached.into_iter().filter(|el| !ids.contains(&el.id));
        updates(released).and(commit_transformed(&scene, moved))
    }
}

impl Tool for SelectTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Select
    }

    fn on_pointer_down(&mut self, ctx: &ToolContext<'_>, p: Point, modifiers: Modifiers) -> ToolResult {
        self.reset();

        // Vertex of the single selected linear element.
        if let Some(el) = ctx.selection.single().and_then(|id| ctx.scene.active_element(id)).filter(|el| !el.locked) {
            if let Some(index) = hit_vertex(el, p, ctx.scene_radius(self.config.vertex_radius_px)) {
                debug!(id = %el.id, index, "drag point");
                self.gesture = Gesture::DraggingPoint { id: el.id, index, snapshot: el.clone() };
                return ToolResult::none();
            }
        }

        // Resize and rotate handles of the selection frame.
        if let Some(frame) = SelectionFrame::for_selection(ctx.scene, ctx.selection) {
            let radius = ctx.scene_radius(self.config.handle_radius_px);
            let offset = ctx.scene_radius(self.config.rotate_handle_offset_px);
            match frame.hit_handle(p, radius, offset) {
                Some(HandleKind::Resize(handle)) => {
                    let snapshot = Snapshot::capture(ctx.scene, ctx.selection.ids());
                    debug!(?handle, count = snapshot.len(), "resize");
                    self.gesture = Gesture::Resizing { origin: p, handle, frame, snapshot };
                    return ToolResult::none();
                }
                Some(HandleKind::Rotate) => {
                    let snapshot = Snapshot::capture(ctx.scene, &with_bound_text(ctx.scene, ctx.selection.iter()));
                    debug!(count = snapshot.len(), "rotate");
                    self.gesture = Gesture::Rotating { origin: p, center: frame.center(), snapshot };
                    return ToolResult::none();
                }
                None => {}
            }
        }

        // Element body.
        let Some(el) = hit_element(ctx.scene, p) else {
            self.gesture = Gesture::Armed { origin: p, hit: None, toggle_off: Vec::new(), additive: modifiers.shift };
            return ToolResult::none();
        };
        let group = group_members(ctx.scene, el);
        if ctx.selection.contains(el.id) {
            let toggle_off = if modifiers.shift { group } else { Vec::new() };
            self.gesture = Gesture::Armed { origin: p, hit: Some(el.id), toggle_off, additive: modifiers.shift };
            return ToolResult::none();
        }
        let ids: Vec<ElementId> = if modifiers.shift { ctx.selection.iter().chain(group).collect() } else { group };
        self.gesture = Gesture::Armed { origin: p, hit: Some(el.id), toggle_off: Vec::new(), additive: modifiers.shift };
        ToolResult::SetSelection(ids)
    }

    fn on_pointer_move(&mut self, ctx: &ToolContext<'_>, p: Point, modifiers: Modifiers) -> ToolResult {
        let gesture = std::mem::take(&mut self.gesture);
        let (next, result) = match gesture {
            Gesture::Idle => (Gesture::Idle, ToolResult::none()),
            Gesture::Armed { origin, hit, toggle_off, additive } => {
                if origin.distance(p) <= self.config.drag_threshold {
                    (Gesture::Armed { origin, hit, toggle_off, additive }, ToolResult::none())
                } else if hit.is_some() {
                    let snapshot = Snapshot::capture(ctx.scene, &move_set(ctx.scene, ctx.selection));
                    debug!(count = snapshot.len(), "commit move");
                    let result = translate_snapshot(ctx.scene, &snapshot, p - origin);
                    (Gesture::Moving { origin, snapshot }, result)
                } else {
                    debug!(additive, "commit marquee");
                    self.overlay.marquee = Some(Bounds::from_corners(origin, p));
                    (Gesture::Marquee { origin, additive }, ToolResult::none())
                }
            }
            Gesture::Moving { origin, snapshot } => {
                let result = translate_snapshot(ctx.scene, &snapshot, p - origin);
                (Gesture::Moving { origin, snapshot }, result)
            }
            Gesture::Resizing { origin, handle, frame, snapshot } => {
                let delta = p - origin;
                let min = self.config.min_size;
                let mut resized: Vec<Element> = if snapshot.len() == 1 {
                    snapshot.iter().map(|el| resize_single(el, handle, delta, modifiers.shift, min)).collect()
                } else {
                    let target = resize_bounds(&frame.bounds, handle, delta, modifiers.shift, min);
                    let elements: Vec<&Element> = snapshot.iter().collect();
                    resize_multi(&elements, &frame.bounds, &target)
                };
                let labels = recenter_bound_text(ctx.scene, &resized);
                resized.extend(labels);
                (Gesture::Resizing { origin, handle, frame, snapshot }, commit_transformed(ctx.scene, resized))
            }
            Gesture::Rotating { origin, center, snapshot } => {
                let snap = modifiers.shift.then_some(self.config.rotation_snap);
                let delta = rotation_delta(center, origin, p, snap);
                // Bound text revolves with its container about the frame center.
                let rotated: Vec<Element> = snapshot.iter().map(|el| revolve_element(el, center, delta)).collect();
                (Gesture::Rotating { origin, center, snapshot }, commit_transformed(ctx.scene, rotated))
            }
            Gesture::DraggingPoint { id, index, snapshot } => {
                let result = self.drag_vertex(ctx.scene, id, index, &snapshot, p);
                (Gesture::DraggingPoint { id, index, snapshot }, result)
            }
            Gesture::Marquee { origin, additive } => {
                self.overlay.marquee = Some(Bounds::from_corners(origin, p));
                (Gesture::Marquee { origin, additive }, ToolResult::none())
            }
        };
        self.gesture = next;
        result
    }

    fn on_pointer_up(&mut self, ctx: &ToolContext<'_>, p: Point, _modifiers: Modifiers) -> ToolResult {
        let gesture = std::mem::take(&mut self.gesture);
        self.overlay = ToolOverlay::default();
        match gesture {
            Gesture::Idle => ToolResult::none(),
            Gesture::Armed { hit: None, additive, .. } => {
                if additive || ctx.selection.is_empty() {
                    ToolResult::none()
                } else {
                    ToolResult::SetSelection(Vec::new())
                }
            }
            Gesture::Armed { toggle_off, .. } => {
                if toggle_off.is_empty() {
                    ToolResult::none()
                } else {
                    ToolResult::SetSelection(ctx.selection.iter().filter(|id| !toggle_off.contains(id)).collect())
                }
            }
            Gesture::Marquee { origin, additive } => Self::finish_marquee(ctx, origin, p, additive),
            Gesture::Moving { snapshot, .. } | Gesture::Resizing { snapshot, .. } | Gesture::Rotating { snapshot, .. } => {
                let detached = detach_from_unmoved(ctx.scene, &snapshot.order);
                debug!(detached = detached.len(), "gesture end");
                updates(detached)
            }
            Gesture::DraggingPoint { .. } => {
                debug!("gesture end");
                ToolResult::none()
            }
        }
    }

    fn on_key_down(&mut self, ctx: &ToolContext<'_>, key: &Key, modifiers: Modifiers) -> ToolResult {
        if key.is_escape() {
            let was_idle = matches!(self.gesture, Gesture::Idle);
            self.reset();
            return if was_idle && !ctx.selection.is_empty() { ToolResult::SetSelection(Vec::new()) } else { ToolResult::none() };
        }
        if !matches!(self.gesture, Gesture::Idle) {
            return ToolResult::none();
        }
        if modifiers.command() {
            if key.is_char('a') {
                return select_all(ctx.scene);
            }
            if ctx.selection.is_empty() {
                return if key.is_char('v') { self.paste(ctx) } else { ToolResult::none() };
            }
            if key.is_char('d') {
                return self.duplicate(ctx);
            }
            if key.is_char('c') {
                self.copy(ctx);
                return ToolResult::none();
            }
            if key.is_char('x') {
                self.copy(ctx);
                return delete_selection(ctx.scene, ctx.selection);
            }
            if key.is_char('v') {
                return self.paste(ctx);
            }
            return ToolResult::none();
        }
        if key.is_delete() {
            return delete_selection(ctx.scene, ctx.selection);
        }
        if let Some(direction) = key.arrow_direction() {
            return self.nudge(ctx, direction, modifiers.shift);
        }
        ToolResult::none()
    }

    fn overlay(&self) -> &ToolOverlay {
        &self.overlay
    }

    fn reset(&mut self) {
        self.gesture = Gesture::Idle;
        self.overlay = ToolOverlay::default();
    }
}

// =============================================================================
// SELECTION SETS
// =============================================================================

/// Every active member of `el`'s outermost group, or just `el`.
fn group_members(scene: &Scene, el: &Element) -> Vec<ElementId> {
    match el.outermost_group() {
        Some(group) => scene.active_elements().filter(|e| !e.locked && e.group_ids.contains(group)).map(|e| e.id).collect(),
        None => vec![el.id],
    }
}

/// `ids` plus the text bound inside each of them, in first-seen order.
fn with_bound_text(scene: &Scene, ids: impl IntoIterator<Item = ElementId>) -> Vec<ElementId> {
    let mut out = Selection::new();
    for id in ids {
        if scene.active_element(id).is_none_or(|el| el.locked) {
            continue;
        }
        out.insert(id);
        if let Some(text) = scene.bound_text_of(id) {
            out.insert(text.id);
        }
    }
    out.ids().to_vec()
}

/// What a move or nudge of `selection` transforms: the selection, its bound
/// text, and the children of selected frames.
fn move_set(scene: &Scene, selection: &Selection) -> Vec<ElementId> {
    let base = with_bound_text(scene, selection.iter());
    let mut out = Selection::from_ids(base.iter().copied());
    for id in &base {
        if let Some(ElementKind::Frame(_)) = scene.active_element(*id).map(|el| &el.kind) {
            let children: Vec<ElementId> = scene.frame_children(*id).into_iter().map(|el| el.id).collect();
            for child in with_bound_text(scene, children) {
                out.insert(child);
            }
        }
    }
    out.ids().to_vec()
}

/// Active elements for `ids` in paint order.
fn ordered<'a>(scene: &'a Scene, ids: &[ElementId]) -> Vec<&'a Element> {
    scene.ordered_elements().into_iter().filter(|el| el.is_active() && ids.contains(&el.id)).collect()
}

fn select_all(scene: &Scene) -> ToolResult {
    let ids: Vec<ElementId> = scene
        .active_elements()
        .filter(|el| !el.locked)
        .filter(|el| el.container_id().is_none_or(|c| scene.active_element(c).is_none()))
        .map(|el| el.id)
        .collect();
    debug!(count = ids.len(), "select all");
    ToolResult::SetSelection(ids)
}

// =============================================================================
// TRANSFORM COMMIT
// =============================================================================

fn translate_snapshot(scene: &Scene, snapshot: &Snapshot, delta: Point) -> ToolResult {
    let moved = snapshot
        .iter()
        .map(|el| {
            let mut next = el.clone();
            next.translate(delta);
            next
        })
        .collect();
    commit_transformed(scene, moved)
}

/// Stamp transformed copies against the live scene and re-derive every
/// connector bound to them that is not itself being transformed.
fn commit_transformed(scene: &Scene, transformed: Vec<Element>) -> ToolResult {
    let moved_ids: Vec<ElementId> = transformed.iter().map(|el| el.id).collect();
    let stamped: Vec<Element> = transformed.into_iter().map(|el| successor(scene, el)).collect();
    let after = scene.update_elements(stamped.iter().cloned());
    let cascade = rederive_bound_connectors(&after, &moved_ids);
    trace!(moved = stamped.len(), cascaded = cascade.len(), "transform step");
    updates(stamped.into_iter().chain(cascade))
}

/// Connectors bound to any of `moved`, re-derived against `after`. Connectors
/// that are themselves in `moved` were already transformed and are skipped.
fn rederive_bound_connectors(after: &Scene, moved: &[ElementId]) -> Vec<Element> {
    let moving: HashSet<ElementId> = moved.iter().copied().collect();
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for id in moved {
        for connector in find_bound_arrows(after, *id) {
            if moving.contains(&connector.id) || !seen.insert(connector.id) {
                continue;
            }
            let next = update_bound_arrow_endpoints(connector, after);
            if next.version != connector.version {
                out.push(next);
            }
        }
    }
    out
}

/// Bound text of each resized container, re-centered on it and turned to its
/// angle. Text resized in its own right is left alone.
fn recenter_bound_text(scene: &Scene, containers: &[Element]) -> Vec<Element> {
    let resized: HashSet<ElementId> = containers.iter().map(|el| el.id).collect();
    containers
        .iter()
        .filter_map(|container| {
            let text = scene.bound_text_of(container.id).filter(|t| !t.locked && !resized.contains(&t.id))?;
            let mut next = text.clone();
            next.translate(container.center() - text.center());
            next.angle = container.angle;
            Some(next)
        })
        .collect()
}

/// Unbind every end of a transformed connector whose target was not
/// transformed with it. Returns the connectors and every target whose
/// reverse references changed, later copies superseding earlier ones.
fn detach_from_unmoved(scene: &Scene, moved: &[ElementId]) -> Vec<Element> {
    let moving: HashSet<ElementId> = moved.iter().copied().collect();
    let mut working = scene.clone();
    let mut out = Vec::new();
    for id in moved {
        let Some(mut next) = working.active_element(*id).cloned() else {
            continue;
        };
        let Some(data) = next.connector() else {
            continue;
        };
        let stale: Vec<Endpoint> = [(Endpoint::Start, data.start_binding), (Endpoint::End, data.end_binding)]
            .into_iter()
            .filter(|(_, b)| b.is_some_and(|b| !moving.contains(&b.element_id)))
            .map(|(end, _)| end)
            .collect();
        if stale.is_empty() {
            continue;
        }
        let mut changed = Vec::new();
        for end in stale {
            changed.extend(unbind_endpoint(&working, &mut next, end));
        }
        next.bump_version();
        changed.push(next);
        debug!(%id, "connector detached");
        working = working.update_elements(changed.iter().cloned());
        out.extend(changed);
    }
    out
}

// =============================================================================
// DELETE / DUPLICATE
// =============================================================================

/// Soft-delete the selection and its bound text, then clear every reference
/// the survivors hold to a deleted element: connector bindings, reverse
/// references and frame membership.
fn delete_selection(scene: &Scene, selection: &Selection) -> ToolResult {
    let ids = with_bound_text(scene, selection.iter());
    if ids.is_empty() {
        return ToolResult::none();
    }
    let doomed: HashSet<ElementId> = ids.iter().copied().collect();

    let mut cleaned = Vec::new();
    for el in scene.active_elements().filter(|el| !doomed.contains(&el.id)) {
        let mut next = clear_bindings_to(el, &doomed);
        let stale_refs = el.bound_elements.iter().any(|b| doomed.contains(&b.id));
        let stale_frame = el.frame_id.is_some_and(|f| doomed.contains(&f));
        if stale_refs || stale_frame {
            let mut n = next.unwrap_or_else(|| {
                let mut copy = el.clone();
                copy.bump_version();
                copy
            });
            n.bound_elements.retain(|b| !doomed.contains(&b.id));
            if stale_frame {
                n.frame_id = None;
            }
            next = Some(n);
        }
        if let Some(n) = next {
            cleaned.push(n);
        }
    }

    debug!(count = ids.len(), cleaned = cleaned.len(), "delete");
    ToolResult::compound(
        cleaned
            .into_iter()
            .map(ToolResult::UpdateElement)
            .chain(ids.into_iter().map(|id| ToolResult::RemoveElement { id }))
            .chain(std::iter::once(ToolResult::SetSelection(Vec::new()))),
    )
}

/// Add offset clones of `sources` above everything in `scene` and select
/// them. Bound text is selected through its container.
fn insert_clones(scene: &Scene, sources: &[Element], offset: Point) -> ToolResult {
    let clones = clone_elements(scene, sources, offset);
    let cloned_ids: HashSet<ElementId> = clones.iter().map(|el| el.id).collect();
    let selected: Vec<ElementId> = clones
        .iter()
        .filter(|el| el.container_id().is_none_or(|c| !cloned_ids.contains(&c)))
        .map(|el| el.id)
        .collect();
    debug!(count = clones.len(), "insert clones");
    ToolResult::compound(
        clones
            .into_iter()
            .map(ToolResult::AddElement)
            .chain(std::iter::once(ToolResult::SetSelection(selected))),
    )
}

/// Fresh copies of `sources` with new ids, shifted by `offset` and keyed
/// above the current top. References among the copies are remapped;
/// references to anything outside the set are dropped. Frame membership is
/// kept.
fn clone_elements(scene: &Scene, sources: &[Element], offset: Point) -> Vec<Element> {
    let id_map: HashMap<ElementId, ElementId> = sources.iter().map(|el| (el.id, Uuid::new_v4())).collect();
    let mut group_map: HashMap<GroupId, GroupId> = HashMap::new();
    let keys = keys_after(scene.max_order_key(), sources.len());

    let mut out = Vec::with_capacity(sources.len());
    for (i, src) in sources.iter().enumerate() {
        let Some(&new_id) = id_map.get(&src.id) else {
            continue;
        };
        let mut el = src.clone();
        el.id = new_id;
        el.version = 1;
        el.revision = rand::random();
        el.is_deleted = false;
        el.translate(offset);
        el.order_index = keys.get(i).cloned();
        el.group_ids = src.group_ids.iter().map(|g| group_map.entry(g.clone()).or_insert_with(GroupId::random).clone()).collect();
        el.bound_elements =
            src.bound_elements.iter().filter_map(|b| id_map.get(&b.id).map(|id| BoundElement { id: *id, kind: b.kind })).collect();
        if let Some(frame) = src.frame_id.and_then(|f| id_map.get(&f)) {
            el.frame_id = Some(*frame);
        }
        if let Some(data) = el.connector_mut() {
            for end in [Endpoint::Start, Endpoint::End] {
                let slot = data.binding_slot(end);
                *slot = slot.and_then(|b| id_map.get(&b.element_id).map(|id| PointBinding { element_id: *id, fixed_point: b.fixed_point }));
            }
        }
        if let ElementKind::Text(text) = &mut el.kind {
            text.container_id = text.container_id.and_then(|c| id_map.get(&c).copied());
        }
        out.push(el);
    }
    out
}
