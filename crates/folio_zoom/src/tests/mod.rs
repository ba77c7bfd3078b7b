//! Scenario tests for the viewer.
//!
//! These drive a [`Viewer`] over a [`HeadlessHost`] and a [`ManualClock`],
//! so every interaction runs without a browser or real time.

mod activation_tests;
mod pan_tests;

use crate::clock::ManualClock;
use crate::config::ViewerConfig;
use crate::event::{InputEvent, Response};
use crate::geometry::{OverlayLayout, Point, Size};
use crate::host::HeadlessHost;
use crate::keybindings::Key;
use crate::transform::Transform;
use crate::viewer::Viewer;

pub(super) const EPSILON: f64 = 1e-9;

/// 1000 x 800 viewport, stage centered at (500, 400).
pub(super) fn layout() -> OverlayLayout {
    OverlayLayout::viewport(1000.0, 800.0)
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

/// A viewer plus handles on its host and clock.
pub(super) struct Harness {
    pub viewer: Viewer<HeadlessHost, ManualClock>,
    pub host: HeadlessHost,
    pub clock: ManualClock,
}

impl Harness {
    pub fn open(config: ViewerConfig, layout: OverlayLayout) -> Self {
        let host = HeadlessHost::new();
        let clock = ManualClock::new();
        let viewer = Viewer::open("/img/post.png", host.clone(), clock.clone(), config, layout)
            .expect("open viewer");
        Self {
            viewer,
            host,
            clock,
        }
    }

    /// Fixed baseline of 1, limits {1, 5}; open and shown.
    pub fn classic() -> Self {
        let mut harness = Self::open(ViewerConfig::classic(), layout());
        harness.flush();
        harness
    }

    /// Fit-to-screen viewer after `natural` finished loading; open and shown.
    pub fn fit(natural: Size, layout: OverlayLayout) -> Self {
        let mut harness = Self::open(ViewerConfig::default(), layout);
        harness.send(InputEvent::ImageLoaded { natural });
        harness.flush();
        harness
    }

    pub fn send(&mut self, event: InputEvent) -> Response {
        self.viewer.dispatch(event)
    }

    /// Run every pending animation frame.
    pub fn flush(&mut self) {
        while let Some(id) = self.host.take_pending_frame() {
            self.viewer.on_animation_frame(id);
        }
    }

    pub fn transform(&self) -> Transform {
        self.viewer.state().transform
    }

    pub fn scale(&self) -> f64 {
        self.viewer.state().scale()
    }

    /// Content point currently shown under `screen`.
    pub fn content_under(&self, screen: Point) -> Point {
        self.transform()
            .content_point(screen, self.viewer.state().layout.stage_center())
    }

    pub fn key(&mut self, key: &str) -> Response {
        self.send(InputEvent::Key {
            key: Key::from_dom(key),
            in_text_field: false,
        })
    }

    pub fn wheel(&mut self, delta_y: f64, position: Point) -> Response {
        self.send(InputEvent::Wheel { delta_y, position })
    }

    pub fn tap(&mut self, at: Point) -> Response {
        let response = self.send(InputEvent::TouchStart { touches: vec![at] });
        self.send(InputEvent::TouchEnd { touches: vec![] });
        response
    }
}
