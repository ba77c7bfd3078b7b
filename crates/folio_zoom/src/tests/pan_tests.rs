//! Panning by mouse, touch and keyboard.

use super::{Harness, EPSILON};
use crate::event::{InputEvent, MouseButton};
use crate::geometry::{OverlayLayout, Point, Size};
use crate::keybindings::Key;
use crate::view::Cursor;

fn zoomed() -> Harness {
    let mut h = Harness::classic();
    // anchored at the stage center, so the translation stays at zero
    h.send(InputEvent::DoubleClick {
        position: Point::new(500.0, 400.0),
    });
    h.flush();
    h
}

fn mouse_down(h: &mut Harness, x: f64, y: f64) -> crate::event::Response {
    h.send(InputEvent::MouseDown {
        position: Point::new(x, y),
        button: MouseButton::Primary,
    })
}

fn mouse_move(h: &mut Harness, x: f64, y: f64) -> crate::event::Response {
    h.send(InputEvent::MouseMove {
        position: Point::new(x, y),
    })
}

#[test]
fn test_pan_is_inert_at_baseline() {
    let mut h = Harness::classic();
    let before = h.transform();

    assert!(!mouse_down(&mut h, 100.0, 100.0).handled);
    mouse_move(&mut h, 180.0, 40.0);
    h.send(InputEvent::MouseUp);

    h.send(InputEvent::TouchStart {
        touches: vec![Point::new(300.0, 300.0)],
    });
    let response = h.send(InputEvent::TouchMove {
        touches: vec![Point::new(340.0, 260.0)],
    });
    assert!(!response.prevent_default);

    // arrows still suppress page scroll even though nothing moves
    assert!(h.key("ArrowLeft").prevent_default);

    assert_eq!(h.transform(), before);
}

#[test]
fn test_pan_is_inert_at_fit_baseline() {
    let mut h = Harness::fit(Size::new(2000.0, 1000.0), OverlayLayout::viewport(1000.0, 800.0));
    let before = h.transform();
    mouse_down(&mut h, 100.0, 100.0);
    mouse_move(&mut h, 150.0, 150.0);
    h.key("ArrowDown");
    assert_eq!(h.transform(), before);
}

#[test]
fn test_mouse_drag_accumulates_deltas() {
    let mut h = zoomed();

    let response = mouse_down(&mut h, 100.0, 100.0);
    assert!(response.prevent_default);
    mouse_move(&mut h, 130.0, 90.0);
    mouse_move(&mut h, 150.0, 95.0);

    let t = h.transform();
    assert!((t.translate_x - 50.0).abs() < EPSILON);
    assert!((t.translate_y + 5.0).abs() < EPSILON);

    h.send(InputEvent::MouseUp);
    mouse_move(&mut h, 400.0, 400.0);
    assert_eq!(h.transform(), t);
}

#[test]
fn test_secondary_button_does_not_pan() {
    let mut h = zoomed();
    let response = h.send(InputEvent::MouseDown {
        position: Point::new(10.0, 10.0),
        button: MouseButton::Secondary,
    });
    assert!(!response.handled);
    mouse_move(&mut h, 60.0, 60.0);
    assert_eq!(h.transform().translate_x, 0.0);
}

#[test]
fn test_cursor_follows_drag() {
    let mut h = zoomed();
    assert_eq!(h.host.record().last_frame().unwrap().cursor, Cursor::Grab);

    mouse_down(&mut h, 10.0, 10.0);
    h.flush();
    assert_eq!(h.host.record().last_frame().unwrap().cursor, Cursor::Grabbing);

    h.send(InputEvent::MouseUp);
    h.flush();
    assert_eq!(h.host.record().last_frame().unwrap().cursor, Cursor::Grab);
}

#[test]
fn test_touch_pan_when_zoomed() {
    let mut h = zoomed();
    h.send(InputEvent::TouchStart {
        touches: vec![Point::new(200.0, 200.0)],
    });
    let response = h.send(InputEvent::TouchMove {
        touches: vec![Point::new(220.0, 170.0)],
    });
    assert!(response.prevent_default);
    h.send(InputEvent::TouchMove {
        touches: vec![Point::new(230.0, 160.0)],
    });

    let t = h.transform();
    assert!((t.translate_x - 30.0).abs() < EPSILON);
    assert!((t.translate_y + 40.0).abs() < EPSILON);
}

#[test]
fn test_touch_pan_after_pinch_starts_fresh() {
    let mut h = zoomed();
    h.send(InputEvent::TouchStart {
        touches: vec![Point::new(400.0, 400.0), Point::new(600.0, 400.0)],
    });
    // one finger lifts; the other must not jump from a stale position
    h.send(InputEvent::TouchEnd {
        touches: vec![Point::new(600.0, 400.0)],
    });
    let before = h.transform();
    h.send(InputEvent::TouchMove {
        touches: vec![Point::new(610.0, 400.0)],
    });
    assert_eq!(h.transform(), before);
    h.send(InputEvent::TouchMove {
        touches: vec![Point::new(625.0, 410.0)],
    });
    let t = h.transform();
    assert!((t.translate_x - before.translate_x - 15.0).abs() < EPSILON);
    assert!((t.translate_y - before.translate_y - 10.0).abs() < EPSILON);
}

#[test]
fn test_arrow_keys_pan_when_zoomed() {
    let mut h = zoomed();
    h.key("ArrowLeft");
    h.key("ArrowUp");
    h.key("ArrowUp");
    let t = h.transform();
    assert_eq!(t.translate_x, 30.0);
    assert_eq!(t.translate_y, 60.0);

    h.key("ArrowRight");
    h.key("Down");
    let t = h.transform();
    assert_eq!(t.translate_x, 0.0);
    assert_eq!(t.translate_y, 30.0);
}

#[test]
fn test_keys_in_text_fields_are_ignored() {
    let mut h = zoomed();
    let response = h.send(InputEvent::Key {
        key: Key::ArrowLeft,
        in_text_field: true,
    });
    assert!(!response.handled);
    assert!(!response.prevent_default);
    assert_eq!(h.transform().translate_x, 0.0);
}

#[test]
fn test_unbound_key_passes_through() {
    let mut h = zoomed();
    let response = h.key("Tab");
    assert!(!response.handled);
    assert!(!response.prevent_default);
}

#[test]
fn test_reset_stops_drag() {
    let mut h = zoomed();
    mouse_down(&mut h, 10.0, 10.0);
    h.key("0");
    assert!(!h.viewer.state().is_panning());
    mouse_move(&mut h, 90.0, 90.0);
    assert_eq!(h.transform().translate_x, 0.0);
}
