//! Single-instance ownership of the viewer.

use crate::activation::{Activation, ActivationTracker};
use crate::clock::Clock;
use crate::config::ViewerConfig;
use crate::error::Result;
use crate::event::{InputEvent, Response};
use crate::geometry::{OverlayLayout, Point};
use crate::host::{FrameId, Host};
use crate::viewer::Viewer;

/// Owns at most one live [`Viewer`].
///
/// Activation of a source image while a viewer exists is ignored; a closed
/// viewer is dropped as soon as it reports closed.
pub struct Lightbox<H: Host, C: Clock + Clone> {
    config: ViewerConfig,
    clock: C,
    active: Option<Viewer<H, C>>,
    activation: ActivationTracker,
}

impl<H: Host, C: Clock + Clone> Lightbox<H, C> {
    pub fn new(config: ViewerConfig, clock: C) -> Self {
        Self {
            config,
            clock,
            active: None,
            activation: ActivationTracker::new(),
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    pub fn viewer(&self) -> Option<&Viewer<H, C>> {
        self.active.as_ref()
    }

    /// Open a viewer for `src` on `host`.
    ///
    /// Returns `Ok(false)` when a viewer already exists; the host is dropped
    /// untouched in that case.
    pub fn open(&mut self, src: &str, host: H, layout: OverlayLayout) -> Result<bool> {
        if self.active.is_some() {
            log::debug!("Viewer already open, ignoring activation of {}", src);
            return Ok(false);
        }
        let viewer = Viewer::open(src, host, self.clock.clone(), self.config.clone(), layout)?;
        self.active = Some(viewer);
        Ok(true)
    }

    /// Route an event to the live viewer, if any.
    pub fn dispatch(&mut self, event: InputEvent) -> Response {
        let Some(viewer) = self.active.as_mut() else {
            return Response::ignored();
        };
        let response = viewer.dispatch(event);
        self.discard_if_closed();
        response
    }

    pub fn on_animation_frame(&mut self, id: FrameId) {
        if let Some(viewer) = self.active.as_mut() {
            viewer.on_animation_frame(id);
        }
    }

    /// Drop the live viewer right away, releasing everything it holds.
    pub fn abort(&mut self) {
        if self.active.take().is_some() {
            log::debug!("Viewer aborted");
        }
    }

    fn discard_if_closed(&mut self) {
        if self.active.as_ref().is_some_and(|viewer| viewer.is_closed()) {
            self.active = None;
        }
    }

    // =========================================================================
    // Source image activation (touch)
    // =========================================================================

    pub fn activation_touch_start(&mut self, touches: &[Point]) {
        let now = self.clock.now();
        self.activation.touch_start(touches, now);
    }

    pub fn activation_touch_move(&mut self, position: Point) {
        self.activation.touch_move(position, &self.config.gestures);
    }

    /// Finish a touch on a source image. `Activation::Open` means the caller
    /// should open the viewer for that image.
    pub fn activation_touch_end(&mut self, position: Option<Point>) -> Activation {
        let now = self.clock.now();
        let outcome = self
            .activation
            .touch_end(position, now, &self.config.gestures);
        if outcome == Activation::Open && self.active.is_some() {
            return Activation::Ignored;
        }
        outcome
    }

    pub fn activation_touch_cancel(&mut self) {
        self.activation.touch_cancel();
    }

    /// A click on a source image. `Activation::Open` means the caller should
    /// open the viewer; clicks synthesized from a touch never do.
    pub fn activation_click(&mut self) -> Activation {
        let now = self.clock.now();
        let outcome = self.activation.click(now);
        if outcome == Activation::Open && self.active.is_some() {
            return Activation::Ignored;
        }
        outcome
    }
}
