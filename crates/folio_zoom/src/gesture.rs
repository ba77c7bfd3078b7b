//! Gesture state machines.
//!
//! Each recognizer keeps only what it needs between samples. None of them
//! touch the transform; the viewer feeds their output into the transform
//! engine so every device ends up in the same zoom primitive.

use std::time::Duration;

use crate::geometry::Point;

/// Result of feeding a tap to [`TapDetector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tap {
    /// First tap; a second one within the window would pair with it
    Single,
    /// Second tap inside the window
    Double,
}

/// Double-tap recognizer.
///
/// `Idle -> AwaitingSecondTap(deadline) -> Idle`. The deadline is compared
/// against the time of the next tap, so no timer has to be armed or cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TapDetector {
    #[default]
    Idle,
    AwaitingSecondTap { deadline: Duration },
}

impl TapDetector {
    /// Register a tap at `now`.
    pub fn tap(&mut self, now: Duration, window: Duration) -> Tap {
        match *self {
            TapDetector::AwaitingSecondTap { deadline } if now < deadline => {
                *self = TapDetector::Idle;
                Tap::Double
            }
            _ => {
                *self = TapDetector::AwaitingSecondTap {
                    deadline: now + window,
                };
                Tap::Single
            }
        }
    }

    /// True while a first tap is waiting for its pair.
    pub fn is_armed(&self, now: Duration) -> bool {
        matches!(*self, TapDetector::AwaitingSecondTap { deadline } if now < deadline)
    }

    pub fn reset(&mut self) {
        *self = TapDetector::Idle;
    }
}

/// Pan drag interaction state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PanDrag {
    /// Not dragging
    #[default]
    Idle,
    /// Dragging with last pointer position (client space)
    Dragging { last_pos: Point },
}

impl PanDrag {
    /// Check if currently dragging
    pub fn is_dragging(&self) -> bool {
        matches!(self, PanDrag::Dragging { .. })
    }

    /// Start dragging with the given position
    pub fn start_drag(&mut self, pos: Point) {
        *self = PanDrag::Dragging { last_pos: pos };
    }

    /// Feed a new pointer position.
    ///
    /// Returns the delta since the previous sample. Without a previous sample
    /// this is a no-op and returns `None`.
    pub fn sample(&mut self, pos: Point) -> Option<(f64, f64)> {
        match self {
            PanDrag::Dragging { last_pos } => {
                let delta = pos.delta_from(*last_pos);
                *last_pos = pos;
                Some(delta)
            }
            PanDrag::Idle => None,
        }
    }

    /// Stop dragging
    pub fn stop_drag(&mut self) {
        *self = PanDrag::Idle;
    }
}

/// Two-finger pinch tracker.
///
/// The distance is resampled on every move, so each sample yields the ratio
/// to the previous one rather than to the gesture start.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pinch {
    last_distance: Option<f64>,
}

impl Pinch {
    pub fn start(&mut self, a: Point, b: Point) {
        self.last_distance = Some(a.distance(b));
    }

    /// Feed the current touch pair. Returns `(delta_scale, midpoint)`.
    pub fn sample(&mut self, a: Point, b: Point) -> Option<(f64, Point)> {
        let distance = a.distance(b);
        let previous = self.last_distance.replace(distance)?;
        if previous <= 0.0 || !distance.is_finite() {
            return None;
        }
        Some((distance / previous, a.midpoint(b)))
    }

    pub fn is_active(&self) -> bool {
        self.last_distance.is_some()
    }

    pub fn last_distance(&self) -> Option<f64> {
        self.last_distance
    }

    pub fn reset(&mut self) {
        self.last_distance = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(250);

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_second_tap_inside_window_is_double() {
        let mut detector = TapDetector::default();
        assert_eq!(detector.tap(ms(1000), WINDOW), Tap::Single);
        assert!(detector.is_armed(ms(1100)));
        assert_eq!(detector.tap(ms(1200), WINDOW), Tap::Double);
        assert_eq!(detector, TapDetector::Idle);
    }

    #[test]
    fn test_second_tap_after_window_rearms() {
        let mut detector = TapDetector::default();
        detector.tap(ms(0), WINDOW);
        assert_eq!(detector.tap(ms(250), WINDOW), Tap::Single);
        assert_eq!(
            detector,
            TapDetector::AwaitingSecondTap { deadline: ms(500) }
        );
    }

    #[test]
    fn test_three_quick_taps_are_double_then_single() {
        let mut detector = TapDetector::default();
        assert_eq!(detector.tap(ms(0), WINDOW), Tap::Single);
        assert_eq!(detector.tap(ms(100), WINDOW), Tap::Double);
        assert_eq!(detector.tap(ms(150), WINDOW), Tap::Single);
    }

    #[test]
    fn test_pan_drag_sample_without_start_is_no_op() {
        let mut drag = PanDrag::default();
        assert_eq!(drag.sample(Point::new(5.0, 5.0)), None);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_pan_drag_accumulates_deltas() {
        let mut drag = PanDrag::default();
        drag.start_drag(Point::new(10.0, 10.0));
        assert_eq!(drag.sample(Point::new(15.0, 7.0)), Some((5.0, -3.0)));
        assert_eq!(drag.sample(Point::new(15.0, 17.0)), Some((0.0, 10.0)));
        assert_eq!(drag.sample(Point::new(15.0, 17.0)), Some((0.0, 0.0)));
        drag.stop_drag();
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_pinch_resamples_every_move() {
        let mut pinch = Pinch::default();
        pinch.start(Point::new(0.0, 0.0), Point::new(100.0, 0.0));

        let (delta, mid) = pinch
            .sample(Point::new(0.0, 0.0), Point::new(150.0, 0.0))
            .unwrap();
        assert_eq!(delta, 1.5);
        assert_eq!(mid, Point::new(75.0, 0.0));

        let (delta, _) = pinch
            .sample(Point::new(0.0, 0.0), Point::new(75.0, 0.0))
            .unwrap();
        assert_eq!(delta, 0.5);
    }

    #[test]
    fn test_pinch_without_start_only_records() {
        let mut pinch = Pinch::default();
        assert_eq!(pinch.sample(Point::zero(), Point::new(10.0, 0.0)), None);
        assert_eq!(pinch.last_distance(), Some(10.0));
    }

    #[test]
    fn test_pinch_from_coincident_fingers_is_ignored() {
        let mut pinch = Pinch::default();
        pinch.start(Point::new(5.0, 5.0), Point::new(5.0, 5.0));
        assert_eq!(pinch.sample(Point::new(0.0, 0.0), Point::new(10.0, 0.0)), None);
        // and the next sample works from the fresh distance
        assert!(pinch.sample(Point::new(0.0, 0.0), Point::new(20.0, 0.0)).is_some());
    }
}
