//! Tap-vs-scroll disambiguation on source images.
//!
//! A touch that lands on a content image may be the start of a page scroll.
//! Only a short, nearly stationary touch opens the viewer. The click a browser
//! synthesizes after a touch follows the touch's verdict, never its own.

use std::time::Duration;

use crate::config::GestureConfig;
use crate::constants::SYNTHETIC_CLICK_WINDOW_MS;
use crate::geometry::Point;

/// Outcome of a completed touch on a source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Short stationary tap: open the viewer
    Open,
    /// Moved or held too long: leave it to the page
    Scroll,
    /// No touch was being tracked
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TouchStart {
    position: Point,
    at: Duration,
    moved_beyond: bool,
}

/// Tracks one touch on a source image from start to end.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ActivationTracker {
    start: Option<TouchStart>,
    /// Clicks up to this instant belong to the last finished touch
    touch_click_until: Option<Duration>,
}

impl ActivationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A touch began. More than one finger is never a tap.
    pub fn touch_start(&mut self, touches: &[Point], now: Duration) {
        self.touch_click_until = None;
        self.start = match touches {
            [only] => Some(TouchStart {
                position: *only,
                at: now,
                moved_beyond: false,
            }),
            _ => None,
        };
    }

    pub fn touch_move(&mut self, position: Point, config: &GestureConfig) {
        if let Some(start) = self.start.as_mut() {
            let (dx, dy) = position.delta_from(start.position);
            if dx.abs() > config.tap_move_threshold || dy.abs() > config.tap_move_threshold {
                start.moved_beyond = true;
            }
        }
    }

    /// The touch ended at `position` (the changed touch of `touchend`).
    pub fn touch_end(
        &mut self,
        position: Option<Point>,
        now: Duration,
        config: &GestureConfig,
    ) -> Activation {
        if let Some(position) = position {
            self.touch_move(position, config);
        }
        let Some(start) = self.start.take() else {
            return Activation::Ignored;
        };

        self.touch_click_until = Some(now + Duration::from_millis(SYNTHETIC_CLICK_WINDOW_MS));

        let held = now.saturating_sub(start.at);
        if start.moved_beyond || held > Duration::from_millis(config.tap_max_duration_ms) {
            log::debug!(
                "Touch on image treated as scroll (moved: {}, held: {:?})",
                start.moved_beyond,
                held
            );
            Activation::Scroll
        } else {
            Activation::Open
        }
    }

    pub fn touch_cancel(&mut self) {
        self.start = None;
    }

    /// A click reached the source image.
    ///
    /// Right after a touch the click was synthesized from it and the touch
    /// already decided, so it is ignored. Any other click opens.
    pub fn click(&mut self, now: Duration) -> Activation {
        match self.touch_click_until.take() {
            Some(until) if now <= until => Activation::Ignored,
            _ => Activation::Open,
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.start.is_some()
    }
}
