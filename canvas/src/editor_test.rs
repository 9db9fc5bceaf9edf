#![allow(clippy::float_cmp)]

use super::*;
use crate::input::ShapeKind;
use crate::order::OrderKey;

// =============================================================
// Helpers
// =============================================================

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn make_rect(x: f64, y: f64, w: f64, h: f64, key: &str) -> Element {
    let mut el = Element::rectangle(x, y, w, h);
    el.order_index = OrderKey::parse(key);
    el
}

fn make_editor(elements: Vec<Element>) -> Editor {
    Editor::with_scene(EditorConfig::default(), Scene::from_elements(elements))
}

fn drag(editor: &mut Editor, from: Point, to: Point) {
    editor.pointer_down(from, Modifiers::NONE);
    editor.pointer_move(to, Modifiers::NONE);
    editor.pointer_up(to, Modifiers::NONE);
}

// =============================================================
// Construction
// =============================================================

#[test]
fn new_editor_starts_in_select() {
    let editor = Editor::default();
    assert_eq!(editor.active_tool(), ToolKind::Select);
    assert!(editor.scene().is_empty());
    assert!(editor.selection().is_empty());
    assert_eq!(editor.viewport(), Viewport::default());
}

#[test]
fn with_scene_keeps_elements() {
    let r = make_rect(0.0, 0.0, 10.0, 10.0, "a");
    let editor = make_editor(vec![r.clone()]);
    assert!(editor.element(r.id).is_some());
}

// =============================================================
// Tool switching
// =============================================================

#[test]
fn set_tool_swaps_instance() {
    let mut editor = Editor::default();
    editor.set_tool(ToolKind::Shape(ShapeKind::Rectangle));
    assert_eq!(editor.active_tool(), ToolKind::Shape(ShapeKind::Rectangle));
    assert_eq!(editor.state().active_tool, ToolKind::Shape(ShapeKind::Rectangle));
}

#[test]
fn shape_creation_returns_to_select() {
    let mut editor = Editor::default();
    editor.set_tool(ToolKind::Shape(ShapeKind::Rectangle));
    drag(&mut editor, pt(0.0, 0.0), pt(100.0, 50.0));
    assert_eq!(editor.active_tool(), ToolKind::Select);
    let id = editor.selection().single().unwrap();
    assert_eq!(editor.element(id).unwrap().frame_bounds(), crate::geom::Bounds::new(0.0, 0.0, 100.0, 50.0));

    // The new shape is immediately movable.
    drag(&mut editor, pt(50.0, 25.0), pt(60.0, 25.0));
    assert_eq!(editor.element(id).unwrap().x, 10.0);
}

#[test]
fn clipboard_survives_tool_round_trip() {
    let r = make_rect(0.0, 0.0, 100.0, 100.0, "a");
    let mut editor = make_editor(vec![r.clone()]);
    editor.apply(ToolResult::SetSelection(vec![r.id]));
    editor.key_down(&Key::new("c"), Modifiers::CTRL);
    editor.set_tool(ToolKind::Connector { orthogonal: false });
    editor.set_tool(ToolKind::Select);
    let result = editor.key_down(&Key::new("v"), Modifiers::CTRL);
    assert_eq!(result.leaves().iter().filter(|r| matches!(r, ToolResult::AddElement(_))).count(), 1);
}

#[test]
fn switching_tools_drops_gesture() {
    let r = make_rect(0.0, 0.0, 100.0, 100.0, "a");
    let mut editor = make_editor(vec![r.clone()]);
    editor.pointer_down(pt(0.0, 0.0), Modifiers::NONE);
    editor.pointer_move(pt(30.0, 30.0), Modifiers::NONE);
    editor.set_tool(ToolKind::Shape(ShapeKind::Ellipse));
    editor.set_tool(ToolKind::Select);
    assert!(editor.pointer_move(pt(90.0, 90.0), Modifiers::NONE).is_empty());
}

// =============================================================
// Dispatch
// =============================================================

#[test]
fn dispatch_routes_recorded_events() {
    let r = make_rect(0.0, 0.0, 100.0, 100.0, "a");
    let mut editor = make_editor(vec![r.clone()]);
    let events: Vec<InputEvent> = serde_json::from_str(
        r#"[
            {"type": "pointer_down", "x": 50, "y": 50},
            {"type": "pointer_move", "x": 70, "y": 50},
            {"type": "pointer_up", "x": 70, "y": 50},
            {"type": "key_down", "key": "ArrowDown", "modifiers": {"shift": true}}
        ]"#,
    )
    .unwrap();
    for event in &events {
        editor.dispatch(event);
    }
    let moved = editor.element(r.id).unwrap();
    assert_eq!((moved.x, moved.y), (20.0, 10.0));
}

#[test]
fn set_viewport_scales_hit_slop() {
    let arrow = Element::arrow(&[pt(0.0, 0.0), pt(200.0, 0.0)]);
    let mut editor = make_editor(vec![arrow.clone()]);
    editor.apply(ToolResult::SetSelection(vec![arrow.id]));
    // 10px vertex slop is 5 scene units at 2x zoom.
    editor.set_viewport(Viewport { pan_x: 0.0, pan_y: 0.0, zoom: 2.0 });
    editor.pointer_down(pt(207.0, 0.0), Modifiers::NONE);
    editor.pointer_move(pt(250.0, 0.0), Modifiers::NONE);
    assert!(editor.element(arrow.id).unwrap().absolute_points()[1].approx_eq(pt(200.0, 0.0), 1e-9));
    editor.pointer_up(pt(250.0, 0.0), Modifiers::NONE);

    // The empty marquee above cleared the selection.
    editor.apply(ToolResult::SetSelection(vec![arrow.id]));
    editor.pointer_down(pt(203.0, 0.0), Modifiers::NONE);
    editor.pointer_move(pt(250.0, 0.0), Modifiers::NONE);
    assert!(editor.element(arrow.id).unwrap().absolute_points()[1].approx_eq(pt(250.0, 0.0), 1e-9));
}

#[test]
fn empty_results_leave_state_untouched() {
    let r = make_rect(0.0, 0.0, 100.0, 100.0, "a");
    let mut editor = make_editor(vec![r.clone()]);
    let before = editor.element(r.id).unwrap().version;
    assert!(editor.key_down(&Key::new("q"), Modifiers::NONE).is_empty());
    assert_eq!(editor.element(r.id).unwrap().version, before);
}
