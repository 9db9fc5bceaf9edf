#![allow(clippy::float_cmp)]

use super::*;
use crate::mutation::EditorState;
use crate::order::OrderKey;
use crate::viewport::Viewport;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn make_state(elements: Vec<Element>) -> EditorState {
    EditorState::new(Scene::from_elements(elements))
}

/// Run one tool callback against `state` and fold its result.
fn step(state: EditorState, f: impl FnOnce(&ToolContext<'_>) -> ToolResult) -> (EditorState, ToolResult) {
    let viewport = Viewport::default();
    let result = {
        let ctx = ToolContext { scene: &state.scene, viewport: &viewport, selection: &state.selection };
        f(&ctx)
    };
    (state.apply_result(&result), result)
}

fn added_id(result: &ToolResult) -> ElementId {
    result
        .leaves()
        .into_iter()
        .find_map(|r| match r {
            ToolResult::AddElement(el) => Some(el.id),
            _ => None,
        })
        .unwrap()
}

// =============================================================
// shape_bounds
// =============================================================

#[test]
fn shape_bounds_normalizes_any_drag_direction() {
    assert_eq!(shape_bounds(pt(100.0, 100.0), pt(40.0, 70.0), false), Bounds::new(40.0, 70.0, 60.0, 30.0));
}

#[test]
fn shape_bounds_square_follows_longer_side() {
    assert_eq!(shape_bounds(pt(0.0, 0.0), pt(50.0, 20.0), true), Bounds::new(0.0, 0.0, 50.0, 50.0));
    assert_eq!(shape_bounds(pt(0.0, 0.0), pt(-20.0, 50.0), true), Bounds::new(-50.0, 0.0, 50.0, 50.0));
}

// =============================================================
// ShapeTool
// =============================================================

#[test]
fn shape_drag_creates_selects_and_returns_to_select() {
    let mut tool = ShapeTool::new(ShapeKind::Ellipse, EditorConfig::default());
    let state = make_state(Vec::new());
    let (state, down) = step(state, |ctx| tool.on_pointer_down(ctx, pt(10.0, 10.0), Modifiers::NONE));
    let id = added_id(&down);
    let (state, _) = step(state, |ctx| tool.on_pointer_move(ctx, pt(60.0, 40.0), Modifiers::NONE));
    assert_eq!(tool.overlay().creation_points, vec![pt(10.0, 10.0), pt(60.0, 40.0)]);
    let (state, _) = step(state, |ctx| tool.on_pointer_up(ctx, pt(110.0, 60.0), Modifiers::NONE));

    let el = state.scene.element(id).unwrap();
    assert!(matches!(el.kind, ElementKind::Ellipse));
    assert_eq!(el.frame_bounds(), Bounds::new(10.0, 10.0, 100.0, 50.0));
    assert_eq!(state.selection.ids(), &[id]);
    assert_eq!(state.active_tool, ToolKind::Select);
    assert!(tool.overlay().creation_points.is_empty());
}

#[test]
fn shape_shift_drag_is_square() {
    let mut tool = ShapeTool::new(ShapeKind::Rectangle, EditorConfig::default());
    let (state, down) = step(make_state(Vec::new()), |ctx| tool.on_pointer_down(ctx, pt(0.0, 0.0), Modifiers::NONE));
    let id = added_id(&down);
    let (state, _) = step(state, |ctx| tool.on_pointer_up(ctx, pt(80.0, 30.0), Modifiers::SHIFT));
    assert_eq!(state.scene.element(id).unwrap().frame_bounds(), Bounds::new(0.0, 0.0, 80.0, 80.0));
}

#[test]
fn tiny_shape_is_discarded() {
    let mut tool = ShapeTool::new(ShapeKind::Diamond, EditorConfig::default());
    let (state, down) = step(make_state(Vec::new()), |ctx| tool.on_pointer_down(ctx, pt(0.0, 0.0), Modifiers::NONE));
    let id = added_id(&down);
    let (state, _) = step(state, |ctx| tool.on_pointer_up(ctx, pt(2.0, 50.0), Modifiers::NONE));
    assert!(!state.scene.element(id).unwrap().is_active());
    assert!(state.selection.is_empty());
    assert_eq!(state.active_tool, ToolKind::Select);
}

#[test]
fn escape_removes_provisional_shape() {
    let mut tool = ShapeTool::new(ShapeKind::Rectangle, EditorConfig::default());
    let (state, down) = step(make_state(Vec::new()), |ctx| tool.on_pointer_down(ctx, pt(0.0, 0.0), Modifiers::NONE));
    let id = added_id(&down);
    let key = Key::new("Escape");
    let (state, _) = step(state, |ctx| tool.on_key_down(ctx, &key, Modifiers::NONE));
    assert!(!state.scene.element(id).unwrap().is_active());
    let (_, again) = step(state, |ctx| tool.on_key_down(ctx, &key, Modifiers::NONE));
    assert!(again.is_empty());
}

#[test]
fn new_shape_lands_on_top() {
    let mut below = Element::rectangle(0.0, 0.0, 10.0, 10.0);
    below.order_index = OrderKey::parse("V");
    let mut tool = ShapeTool::new(ShapeKind::Rectangle, EditorConfig::default());
    let (state, down) = step(make_state(vec![below.clone()]), |ctx| tool.on_pointer_down(ctx, pt(0.0, 0.0), Modifiers::NONE));
    let id = added_id(&down);
    assert!(state.scene.element(id).unwrap().order_index > below.order_index);
}

// =============================================================
// ConnectorTool
// =============================================================

#[test]
fn connector_binds_both_ends() {
    let a = Element::rectangle(0.0, 0.0, 100.0, 100.0);
    let b = Element::rectangle(300.0, 0.0, 100.0, 100.0);
    let mut tool = ConnectorTool::new(false, EditorConfig::default());
    let (state, down) = step(make_state(vec![a.clone(), b.clone()]), |ctx| tool.on_pointer_down(ctx, pt(95.0, 50.0), Modifiers::NONE));
    let id = added_id(&down);
    assert!(state.scene.element(a.id).unwrap().has_bound_element(id));

    let (state, _) = step(state, |ctx| tool.on_pointer_move(ctx, pt(304.0, 40.0), Modifiers::NONE));
    assert_eq!(tool.overlay().bind_target, Some(b.id));
    let (state, _) = step(state, |ctx| tool.on_pointer_up(ctx, pt(304.0, 40.0), Modifiers::NONE));

    let arrow = state.scene.element(id).unwrap();
    let data = arrow.connector().unwrap();
    assert_eq!(data.start_binding.unwrap().element_id, a.id);
    assert_eq!(data.end_binding.unwrap().element_id, b.id);
    let pts = arrow.absolute_points();
    assert!(pts[0].approx_eq(pt(100.0, 50.0), 1e-9));
    assert!(pts[1].approx_eq(pt(300.0, 40.0), 1e-9));
    assert!(state.scene.element(b.id).unwrap().has_bound_element(id));
    assert_eq!(state.selection.ids(), &[id]);
    assert_eq!(state.active_tool, ToolKind::Select);
}

#[test]
fn orthogonal_connector_routes_live() {
    let mut tool = ConnectorTool::new(true, EditorConfig::default());
    let (state, down) = step(make_state(Vec::new()), |ctx| tool.on_pointer_down(ctx, pt(0.0, 0.0), Modifiers::NONE));
    let id = added_id(&down);
    let (state, _) = step(state, |ctx| tool.on_pointer_move(ctx, pt(100.0, 100.0), Modifiers::NONE));
    let pts = state.scene.element(id).unwrap().absolute_points();
    assert_eq!(pts, vec![pt(0.0, 0.0), pt(50.0, 0.0), pt(50.0, 100.0), pt(100.0, 100.0)]);
    assert_eq!(tool.overlay().creation_points, pts);
}

#[test]
fn end_unbinds_when_dragged_away() {
    let b = Element::rectangle(300.0, 0.0, 100.0, 100.0);
    let mut tool = ConnectorTool::new(false, EditorConfig::default());
    let (state, down) = step(make_state(vec![b.clone()]), |ctx| tool.on_pointer_down(ctx, pt(0.0, 0.0), Modifiers::NONE));
    let id = added_id(&down);
    let (state, _) = step(state, |ctx| tool.on_pointer_move(ctx, pt(300.0, 50.0), Modifiers::NONE));
    assert!(state.scene.element(b.id).unwrap().has_bound_element(id));
    let (state, _) = step(state, |ctx| tool.on_pointer_move(ctx, pt(200.0, 200.0), Modifiers::NONE));
    assert!(!state.scene.element(b.id).unwrap().has_bound_element(id));
    assert!(state.scene.element(id).unwrap().connector().unwrap().end_binding.is_none());
    assert!(tool.overlay().bind_target.is_none());
}

#[test]
fn short_connector_is_discarded_and_released() {
    let a = Element::rectangle(0.0, 0.0, 100.0, 100.0);
    let mut tool = ConnectorTool::new(false, EditorConfig::default());
    let (state, down) = step(make_state(vec![a.clone()]), |ctx| tool.on_pointer_down(ctx, pt(100.0, 50.0), Modifiers::NONE));
    let id = added_id(&down);
    let (state, _) = step(state, |ctx| tool.on_pointer_up(ctx, pt(101.0, 50.0), Modifiers::NONE));
    assert!(!state.scene.element(id).unwrap().is_active());
    assert!(!state.scene.element(a.id).unwrap().has_bound_element(id));
    assert!(state.selection.is_empty());
}
