#[allow(dead_code)]
mod common;

use approx::{assert_abs_diff_eq, assert_relative_eq};

use meridian_core::config::ViewportConfig;
use meridian_core::error::MeridianError;
use meridian_core::measurement::{MeasurementDraft, MeasurementScope, MeasurementUpdate};
use meridian_core::transform::screen_to_image;
use meridian_core::types::{Point2D, WindowLevel};
use meridian_core::viewport::{
    Key, Modifiers, PointerButton, PointerEvent, Tool, ViewportState, WheelEvent,
};

use common::{controller, frame_context, line, unit_spacing, FRAME, SERIES};

fn click(c: &mut meridian_core::viewport::ViewportInteractionController, x: f64, y: f64) {
    c.pointer_down(PointerEvent::primary(x, y)).unwrap();
    c.pointer_up(PointerEvent::primary(x, y));
}

fn drag(
    c: &mut meridian_core::viewport::ViewportInteractionController,
    from: (f64, f64),
    to: (f64, f64),
) {
    c.pointer_down(PointerEvent::primary(from.0, from.1)).unwrap();
    c.pointer_move(PointerEvent::primary(to.0, to.1));
    c.pointer_up(PointerEvent::primary(to.0, to.1));
}

fn wheel(x: f64, y: f64, delta_y: f64, shift: bool) -> WheelEvent {
    WheelEvent {
        position: Point2D::new(x, y),
        delta_y,
        modifiers: Modifiers {
            shift,
            ..Default::default()
        },
    }
}

fn with_line(
    c: &mut meridian_core::viewport::ViewportInteractionController,
) -> String {
    c.store_mut().create_measurement(
        MeasurementDraft::new(SERIES, line(100.0, 100.0, 200.0, 100.0)).on_frame(FRAME),
        unit_spacing(),
    ).unwrap()
}

// ---------------------------------------------------------------------------
// ViewportState
// ---------------------------------------------------------------------------

#[test]
fn test_viewport_state_limits() {
    let mut v = ViewportState::new(&ViewportConfig::default());
    v.set_zoom(100.0);
    assert_eq!(v.zoom, 20.0);
    v.set_zoom(0.0);
    assert_eq!(v.zoom, 0.1);
    v.set_zoom(f64::NAN);
    assert_eq!(v.zoom, 0.1);

    v.set_rotation(-90.0);
    assert_eq!(v.rotation, 270.0);
    v.rotate_by(180.0);
    assert_eq!(v.rotation, 90.0);

    v.set_window_level(WindowLevel::new(40.0, -5.0));
    assert_eq!(v.window_level.width, 1.0);

    v.scroll_slices(-4, 10);
    assert_eq!(v.slice_index, 0);
    v.set_slice_index(42, 10);
    assert_eq!(v.slice_index, 9);

    v.pan_by(Point2D::new(3.0, 4.0));
    v.reset();
    assert_eq!(v.zoom, 1.0);
    assert_eq!(v.pan, Point2D::ORIGIN);
    assert_eq!(v.rotation, 0.0);
    assert_eq!(v.zoom_limits(), (0.1, 20.0));
}

// ---------------------------------------------------------------------------
// Drawing tools
// ---------------------------------------------------------------------------

#[test]
fn test_line_tool_draws_and_commits() {
    let mut c = controller();
    c.set_tool(Tool::Line);
    c.pointer_down(PointerEvent::primary(100.0, 100.0)).unwrap();
    assert!(c.is_dragging());
    c.pointer_move(PointerEvent::primary(130.0, 140.0));
    assert!(c.store().is_empty());
    c.pointer_up(PointerEvent::primary(130.0, 140.0));

    assert!(!c.is_dragging());
    assert_eq!(c.store().len(), 1);
    let m = &c.store().measurements()[0];
    assert_eq!(m.frame_key.as_deref(), Some(FRAME));
    assert_relative_eq!(m.metrics.length_mm.unwrap(), 50.0);
    assert_eq!(c.store().selected_id(), Some(m.id.as_str()));
}

#[test]
fn test_drawing_starts_only_inside_image() {
    let mut c = controller();
    c.set_tool(Tool::Ellipse);
    // the image fills the viewport, so this is off the image
    c.pointer_down(PointerEvent::primary(-20.0, 30.0)).unwrap();
    assert!(!c.is_dragging());
    assert!(!c.store().is_drawing());
}

#[test]
fn test_rectangle_end_is_clamped_to_image() {
    let mut c = controller();
    c.set_tool(Tool::Rectangle);
    drag(&mut c, (500.0, 500.0), (600.0, 700.0));
    let m = &c.store().measurements()[0];
    assert_relative_eq!(m.metrics.area_mm2.unwrap(), 144.0);
}

#[test]
fn test_series_scope_from_frame_context() {
    let mut c = controller();
    c.set_frame(frame_context(MeasurementScope::Series));
    c.set_tool(Tool::Line);
    drag(&mut c, (10.0, 10.0), (20.0, 10.0));
    let m = &c.store().measurements()[0];
    assert_eq!(m.scope, MeasurementScope::Series);
    assert_eq!(m.frame_key, None);
}

#[test]
fn test_polygon_by_clicks_and_double_click() {
    let mut c = controller();
    c.set_tool(Tool::Polygon);
    click(&mut c, 10.0, 10.0);
    click(&mut c, 100.0, 10.0);
    click(&mut c, 100.0, 100.0);
    assert!(!c.is_dragging());

    c.pointer_move(PointerEvent::primary(50.0, 50.0));
    assert_eq!(
        c.store().active_drawing().unwrap().preview,
        Some(Point2D::new(50.0, 50.0))
    );

    c.double_click(PointerEvent::primary(100.0, 100.0));
    assert!(!c.store().is_drawing());
    assert_eq!(c.store().len(), 1);
    assert_relative_eq!(c.store().measurements()[0].metrics.area_mm2.unwrap(), 4050.0);
}

#[test]
fn test_polygon_enter_finishes_and_short_polygon_is_discarded() {
    let mut c = controller();
    c.set_tool(Tool::Polygon);
    click(&mut c, 10.0, 10.0);
    click(&mut c, 100.0, 10.0);
    c.key(Key::Enter);
    assert!(!c.store().is_drawing());
    assert!(c.store().is_empty());

    click(&mut c, 10.0, 10.0);
    click(&mut c, 100.0, 10.0);
    click(&mut c, 100.0, 100.0);
    c.key(Key::Enter);
    assert_eq!(c.store().len(), 1);
}

#[test]
fn test_escape_cancels_polygon() {
    let mut c = controller();
    c.set_tool(Tool::Polygon);
    click(&mut c, 10.0, 10.0);
    click(&mut c, 100.0, 10.0);
    c.key(Key::Escape);
    assert!(!c.store().is_drawing());
    c.double_click(PointerEvent::primary(0.0, 0.0));
    assert!(c.store().is_empty());
}

#[test]
fn test_tool_change_ends_drag_and_discards_polygon() {
    let mut c = controller();
    c.set_tool(Tool::Line);
    c.pointer_down(PointerEvent::primary(10.0, 10.0)).unwrap();
    c.pointer_move(PointerEvent::primary(40.0, 50.0));
    c.set_tool(Tool::Polygon);
    assert!(!c.is_dragging());
    assert_eq!(c.store().len(), 1);

    click(&mut c, 10.0, 10.0);
    c.set_tool(Tool::Select);
    assert!(!c.store().is_drawing());
    assert_eq!(c.store().len(), 1);
}

#[test]
fn test_frame_change_discards_drawing() {
    let mut c = controller();
    c.set_tool(Tool::Polygon);
    click(&mut c, 10.0, 10.0);
    c.set_frame(frame_context(MeasurementScope::Frame));
    assert!(!c.store().is_drawing());
}

// ---------------------------------------------------------------------------
// Select tool
// ---------------------------------------------------------------------------

#[test]
fn test_drag_control_point_is_one_undo_step() {
    let mut c = controller();
    let id = with_line(&mut c);
    c.set_tool(Tool::Select);

    c.pointer_down(PointerEvent::primary(101.0, 99.0)).unwrap();
    c.pointer_move(PointerEvent::primary(80.0, 100.0));
    c.pointer_move(PointerEvent::primary(50.0, 100.0));
    c.pointer_up(PointerEvent::primary(50.0, 100.0));

    let m = c.store().get(&id).unwrap();
    assert_eq!(m.geometry, line(50.0, 100.0, 200.0, 100.0));
    assert_relative_eq!(m.metrics.length_mm.unwrap(), 150.0);
    assert!(!c.store().in_transaction());

    c.key(Key::Undo);
    assert_eq!(c.store().get(&id).unwrap().geometry, line(100.0, 100.0, 200.0, 100.0));
    c.key(Key::Redo);
    assert_eq!(c.store().get(&id).unwrap().geometry, line(50.0, 100.0, 200.0, 100.0));
}

#[test]
fn test_drag_body_translates_measurement() {
    let mut c = controller();
    let id = with_line(&mut c);
    c.set_tool(Tool::Select);

    c.pointer_down(PointerEvent::primary(150.0, 102.0)).unwrap();
    c.pointer_move(PointerEvent::primary(160.0, 112.0));
    c.pointer_move(PointerEvent::primary(170.0, 122.0));
    c.pointer_leave();

    assert!(!c.is_dragging());
    assert_eq!(c.store().get(&id).unwrap().geometry, line(120.0, 120.0, 220.0, 120.0));
    c.key(Key::Undo);
    assert_eq!(c.store().get(&id).unwrap().geometry, line(100.0, 100.0, 200.0, 100.0));
}

#[test]
fn test_escape_reverts_move() {
    let mut c = controller();
    let id = with_line(&mut c);
    c.set_tool(Tool::Select);

    c.pointer_down(PointerEvent::primary(200.0, 100.0)).unwrap();
    c.pointer_move(PointerEvent::primary(250.0, 150.0));
    c.key(Key::Escape);

    assert!(!c.is_dragging());
    assert!(!c.store().in_transaction());
    assert_eq!(c.store().get(&id).unwrap().geometry, line(100.0, 100.0, 200.0, 100.0));
    // the creation is still undoable, the cancelled edit is not redoable
    assert!(c.store().can_undo());
    assert!(!c.store().can_redo());
    c.key(Key::Redo);
    assert_eq!(c.store().get(&id).unwrap().geometry, line(100.0, 100.0, 200.0, 100.0));
}

#[test]
fn test_escape_keeps_earlier_redo() {
    let mut c = controller();
    let id = with_line(&mut c);
    c.set_tool(Tool::Select);

    drag(&mut c, (200.0, 100.0), (220.0, 100.0));
    c.key(Key::Undo);
    assert!(c.store().can_redo());

    c.pointer_down(PointerEvent::primary(200.0, 100.0)).unwrap();
    c.pointer_move(PointerEvent::primary(250.0, 150.0));
    c.key(Key::Escape);
    assert_eq!(c.store().get(&id).unwrap().geometry, line(100.0, 100.0, 200.0, 100.0));

    c.key(Key::Redo);
    assert_eq!(c.store().get(&id).unwrap().geometry, line(100.0, 100.0, 220.0, 100.0));
}

#[test]
fn test_click_selects_and_empty_click_deselects() {
    let mut c = controller();
    let id = with_line(&mut c);
    c.store_mut().select_measurement(None);
    c.set_tool(Tool::Select);

    click(&mut c, 150.0, 104.0);
    assert_eq!(c.store().selected_id(), Some(id.as_str()));
    click(&mut c, 400.0, 400.0);
    assert_eq!(c.store().selected_id(), None);
}

#[test]
fn test_hit_tolerance_is_in_screen_pixels() {
    let mut c = controller();
    let id = with_line(&mut c);
    c.store_mut().select_measurement(None);
    c.set_tool(Tool::Select);
    // at zoom 4 the default 8 px tolerance is 2 image pixels
    c.viewport_mut().set_zoom(4.0);

    let ctx = c.transform_context().unwrap();
    let on_line = meridian_core::transform::image_to_screen(150.0, 101.5, &ctx).unwrap();
    let off_line = meridian_core::transform::image_to_screen(150.0, 103.0, &ctx).unwrap();

    click(&mut c, off_line.x, off_line.y);
    assert_eq!(c.store().selected_id(), None);
    click(&mut c, on_line.x, on_line.y);
    assert_eq!(c.store().selected_id(), Some(id.as_str()));
}

#[test]
fn test_hover_tracks_measurement_under_pointer() {
    let mut c = controller();
    let id = with_line(&mut c);
    c.set_tool(Tool::Select);
    c.pointer_move(PointerEvent::primary(150.0, 103.0));
    assert_eq!(c.store().hovered_id(), Some(id.as_str()));
    c.pointer_move(PointerEvent::primary(150.0, 300.0));
    assert_eq!(c.store().hovered_id(), None);
}

#[test]
fn test_locked_measurement_is_not_grabbed_or_deleted() {
    let mut c = controller();
    let id = with_line(&mut c);
    c.store_mut().update_measurement(
        &id,
        MeasurementUpdate {
            locked: Some(true),
            ..Default::default()
        },
    ).unwrap();
    c.set_tool(Tool::Select);
    c.pointer_down(PointerEvent::primary(100.0, 100.0)).unwrap();
    assert!(!c.is_dragging());
    c.pointer_up(PointerEvent::primary(100.0, 100.0));

    c.store_mut().select_measurement(Some(id.as_str()));
    c.key(Key::Delete);
    assert!(c.store().get(&id).is_some());
}

#[test]
fn test_delete_ignores_hidden_selection() {
    let mut c = controller();
    let id = with_line(&mut c);
    c.store_mut()
        .update_measurement(
            &id,
            MeasurementUpdate {
                visible: Some(false),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(c.store().selected_id(), Some(id.as_str()));
    c.key(Key::Delete);
    assert!(c.store().get(&id).is_some());
}

#[test]
fn test_delete_key_removes_selection() {
    let mut c = controller();
    let id = with_line(&mut c);
    c.key(Key::Delete);
    assert!(c.store().get(&id).is_none());
    c.key(Key::Undo);
    assert!(c.store().get(&id).is_some());
}

// ---------------------------------------------------------------------------
// Navigation tools
// ---------------------------------------------------------------------------

#[test]
fn test_pan_tool_and_middle_button() {
    let mut c = controller();
    c.set_tool(Tool::Pan);
    drag(&mut c, (10.0, 10.0), (30.0, 25.0));
    assert_eq!(c.viewport().pan, Point2D::new(20.0, 15.0));

    c.set_tool(Tool::Line);
    let middle = |x, y| PointerEvent::primary(x, y).with_button(PointerButton::Middle);
    c.pointer_down(middle(0.0, 0.0)).unwrap();
    c.pointer_move(middle(-5.0, 5.0));
    c.pointer_up(middle(-5.0, 5.0));
    assert_eq!(c.viewport().pan, Point2D::new(15.0, 20.0));
    assert!(c.store().is_empty());

    let ctrl = Modifiers {
        ctrl: true,
        ..Default::default()
    };
    c.pointer_down(PointerEvent::primary(0.0, 0.0).with_modifiers(ctrl)).unwrap();
    c.pointer_move(PointerEvent::primary(5.0, 0.0).with_modifiers(ctrl));
    c.pointer_up(PointerEvent::primary(5.0, 0.0));
    assert_eq!(c.viewport().pan, Point2D::new(20.0, 20.0));
    assert!(c.store().is_empty());
}

#[test]
fn test_second_drag_is_rejected() {
    let mut c = controller();
    c.set_tool(Tool::Pan);
    c.pointer_down(PointerEvent::primary(10.0, 10.0)).unwrap();
    let err = c.pointer_down(PointerEvent::primary(20.0, 20.0)).unwrap_err();
    assert!(matches!(err, MeridianError::DragAlreadyActive));
    c.pointer_leave();
    assert!(c.pointer_down(PointerEvent::primary(20.0, 20.0)).is_ok());
}

#[test]
fn test_every_error_variant_has_a_producer() {
    let mut c = controller();
    let mut config = meridian_core::config::ViewerConfig::default();
    config.viewport.max_zoom = 0.01;
    let short_polygon = MeasurementDraft::new(
        SERIES,
        meridian_core::measurement::MeasurementGeometry::Polygon {
            points: vec![Point2D::new(1.0, 1.0)],
        },
    );
    c.set_tool(Tool::Pan);
    c.pointer_down(PointerEvent::primary(10.0, 10.0)).unwrap();

    let errors = [
        c.store_mut().import_json("[").unwrap_err(),
        config.validate().unwrap_err(),
        c.store_mut().create_measurement(short_polygon, None).unwrap_err(),
        c.pointer_down(PointerEvent::primary(20.0, 20.0)).unwrap_err(),
    ];
    let names: Vec<&str> = errors
        .iter()
        .map(|e| match e {
            MeridianError::Json(_) => "json",
            MeridianError::InvalidConfig(_) => "config",
            MeridianError::InvalidMeasurement { .. } => "measurement",
            MeridianError::DragAlreadyActive => "drag",
        })
        .collect();
    assert_eq!(names, ["json", "config", "measurement", "drag"]);
}

#[test]
fn test_zoom_tool_drag() {
    let mut c = controller();
    c.set_tool(Tool::Zoom);
    drag(&mut c, (256.0, 256.0), (256.0, 156.0));
    assert_relative_eq!(c.viewport().zoom, std::f64::consts::E, epsilon = 1e-9);
}

#[test]
fn test_window_level_drag() {
    let mut c = controller();
    c.set_tool(Tool::WindowLevel);
    drag(&mut c, (100.0, 100.0), (110.0, 95.0));
    assert_eq!(c.viewport().window_level, WindowLevel::new(123.0, 266.0));
}

#[test]
fn test_wheel_zooms_about_cursor() {
    let mut c = controller();
    let before = c.transform_context().unwrap();
    let anchor = screen_to_image(100.0, 50.0, &before).unwrap();

    c.wheel(wheel(100.0, 50.0, -100.0, false));
    assert_relative_eq!(c.viewport().zoom, 0.5f64.exp(), epsilon = 1e-9);

    let after = c.transform_context().unwrap();
    let still = screen_to_image(100.0, 50.0, &after).unwrap();
    assert_abs_diff_eq!(still.x, anchor.x, epsilon = 1e-9);
    assert_abs_diff_eq!(still.y, anchor.y, epsilon = 1e-9);
}

#[test]
fn test_wheel_at_limit_leaves_pan() {
    let mut c = controller();
    c.viewport_mut().set_zoom(20.0);
    c.wheel(wheel(10.0, 10.0, -100.0, false));
    assert_eq!(c.viewport().zoom, 20.0);
    assert_eq!(c.viewport().pan, Point2D::ORIGIN);
}

#[test]
fn test_shift_wheel_scrolls_slices() {
    let mut c = controller();
    c.wheel(wheel(0.0, 0.0, 3.0, true));
    assert_eq!(c.viewport().slice_index, 1);
    c.wheel(wheel(0.0, 0.0, -3.0, true));
    c.wheel(wheel(0.0, 0.0, -3.0, true));
    assert_eq!(c.viewport().slice_index, 0);
    assert_eq!(c.viewport().zoom, 1.0);
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn test_teardown_closes_transaction() {
    let mut c = controller();
    let id = with_line(&mut c);
    c.set_tool(Tool::Select);
    c.pointer_down(PointerEvent::primary(100.0, 100.0)).unwrap();
    c.pointer_move(PointerEvent::primary(90.0, 100.0));
    assert!(c.store().in_transaction());

    c.teardown();
    assert!(!c.is_dragging());
    assert!(!c.store().in_transaction());
    assert_eq!(c.store().get(&id).unwrap().geometry, line(90.0, 100.0, 200.0, 100.0));
}

#[test]
fn test_no_frame_ignores_input() {
    let mut c = meridian_core::viewport::ViewportInteractionController::new(Default::default());
    c.set_tool(Tool::Line);
    c.pointer_down(PointerEvent::primary(10.0, 10.0)).unwrap();
    assert!(!c.is_dragging());
    c.wheel(wheel(10.0, 10.0, -100.0, false));
    assert_eq!(c.viewport().zoom, 1.0);
    assert!(c.transform_context().is_none());
}

#[test]
fn test_tool_display() {
    assert_eq!(format!("{}", Tool::WindowLevel), "Window/Level");
    assert_eq!(Tool::default(), Tool::Select);
    assert_eq!(Tool::ALL.len(), 8);
    assert!(Tool::Pan.measurement_kind().is_none());
}
