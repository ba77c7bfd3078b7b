//! Opening the viewer from a touch on a source image.

use super::layout;
use crate::activation::Activation;
use crate::clock::ManualClock;
use crate::config::ViewerConfig;
use crate::geometry::Point;
use crate::host::HeadlessHost;
use crate::lightbox::Lightbox;

/// Run one touch on a source image and open the viewer if it was a tap.
fn touch_image(
    lightbox: &mut Lightbox<HeadlessHost, ManualClock>,
    clock: &ManualClock,
    path: &[Point],
    held_ms: u64,
) -> Activation {
    lightbox.activation_touch_start(&path[..1]);
    for position in &path[1..] {
        lightbox.activation_touch_move(*position);
    }
    clock.advance_ms(held_ms);
    let outcome = lightbox.activation_touch_end(path.last().copied());
    if outcome == Activation::Open {
        lightbox
            .open("/img/a.png", HeadlessHost::new(), layout())
            .unwrap();
    }
    outcome
}

/// Deliver a click on a source image and open the viewer if it counts.
fn click_image(lightbox: &mut Lightbox<HeadlessHost, ManualClock>) -> Activation {
    let outcome = lightbox.activation_click();
    if outcome == Activation::Open {
        lightbox
            .open("/img/a.png", HeadlessHost::new(), layout())
            .unwrap();
    }
    outcome
}

fn setup() -> (Lightbox<HeadlessHost, ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    (Lightbox::new(ViewerConfig::default(), clock.clone()), clock)
}

#[test]
fn test_scroll_gesture_does_not_open() {
    let (mut lightbox, clock) = setup();
    let outcome = touch_image(
        &mut lightbox,
        &clock,
        &[Point::new(100.0, 100.0), Point::new(100.0, 115.0)],
        200,
    );
    assert_eq!(outcome, Activation::Scroll);
    assert!(!lightbox.is_open());
}

#[test]
fn test_short_tap_opens() {
    let (mut lightbox, clock) = setup();
    let outcome = touch_image(
        &mut lightbox,
        &clock,
        &[Point::new(100.0, 100.0), Point::new(104.0, 97.0)],
        120,
    );
    assert_eq!(outcome, Activation::Open);
    assert!(lightbox.is_open());
}

#[test]
fn test_long_press_does_not_open() {
    let (mut lightbox, clock) = setup();
    let outcome = touch_image(&mut lightbox, &clock, &[Point::new(100.0, 100.0)], 450);
    assert_eq!(outcome, Activation::Scroll);
    assert!(!lightbox.is_open());
}

#[test]
fn test_movement_back_to_start_still_counts() {
    let (mut lightbox, clock) = setup();
    let outcome = touch_image(
        &mut lightbox,
        &clock,
        &[
            Point::new(100.0, 100.0),
            Point::new(125.0, 100.0),
            Point::new(100.0, 100.0),
        ],
        100,
    );
    assert_eq!(outcome, Activation::Scroll);
}

#[test]
fn test_cancelled_touch_is_ignored() {
    let (mut lightbox, _clock) = setup();
    lightbox.activation_touch_start(&[Point::new(5.0, 5.0)]);
    lightbox.activation_touch_cancel();
    assert_eq!(lightbox.activation_touch_end(None), Activation::Ignored);
}

#[test]
fn test_two_finger_touch_never_opens() {
    let (mut lightbox, _clock) = setup();
    lightbox.activation_touch_start(&[Point::new(5.0, 5.0), Point::new(50.0, 5.0)]);
    assert_eq!(
        lightbox.activation_touch_end(Some(Point::new(5.0, 5.0))),
        Activation::Ignored
    );
}

#[test]
fn test_click_after_long_press_does_not_open() {
    let (mut lightbox, clock) = setup();
    let outcome = touch_image(&mut lightbox, &clock, &[Point::new(100.0, 100.0)], 400);
    assert_eq!(outcome, Activation::Scroll);

    // the browser still synthesizes a click for a 400ms press
    clock.advance_ms(10);
    assert_eq!(click_image(&mut lightbox), Activation::Ignored);
    assert!(!lightbox.is_open());
}

#[test]
fn test_click_after_small_scroll_does_not_open() {
    let (mut lightbox, clock) = setup();
    let outcome = touch_image(
        &mut lightbox,
        &clock,
        &[Point::new(100.0, 100.0), Point::new(100.0, 112.0)],
        150,
    );
    assert_eq!(outcome, Activation::Scroll);
    clock.advance_ms(5);
    assert_eq!(click_image(&mut lightbox), Activation::Ignored);
    assert!(!lightbox.is_open());
}

#[test]
fn test_mouse_click_opens_once() {
    let (mut lightbox, _clock) = setup();
    assert_eq!(click_image(&mut lightbox), Activation::Open);
    assert!(lightbox.is_open());
    assert_eq!(click_image(&mut lightbox), Activation::Ignored);
}
