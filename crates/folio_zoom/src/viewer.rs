//! The zoom viewer: lifecycle plus input interpretation.
//!
//! A [`Viewer`] exists only while an image is shown. It is created in the
//! `Opening` phase, moves to `Open` once the image has settled, to `Closing`
//! when dismissed, and is closed for good after the fade-out completes. All
//! zoom operations go through [`Transform::zoom_at_point`] so clamping and
//! anchoring behave the same for every input device.

use std::time::Duration;

use crate::clock::Clock;
use crate::config::{BaselinePolicy, ScaleLimits, ViewerConfig};
use crate::constants::{BASELINE_TOLERANCE, FIT_TOGGLE_SCALE};
use crate::error::Result;
use crate::event::{Control, InputEvent, MouseButton, Response};
use crate::fit::resolve_baseline;
use crate::geometry::{OverlayLayout, Point, Size};
use crate::gesture::{PanDrag, Pinch, Tap, TapDetector};
use crate::host::{FrameId, GlobalListener, Host};
use crate::keybindings::{Key, ViewerAction};
use crate::transform::Transform;
use crate::view::{Frame, ViewTree};

/// Lifecycle phase of a live viewer. "Closed" is the absence of a viewer,
/// reported by [`Viewer::is_closed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Mounted, waiting for the image to settle
    Opening,
    /// Visible and interactive
    Open,
    /// Fading out, waiting for the transition to finish
    Closing,
}

/// Transient state of one opening.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerState {
    pub transform: Transform,
    /// Neutral scale for reset and double-activation
    pub baseline: f64,
    /// Scale bounds in effect (configured bounds widened to admit the baseline)
    pub limits: ScaleLimits,
    pub layout: OverlayLayout,
    /// Intrinsic image size once loaded
    pub natural: Option<Size>,
    pub mouse_pan: PanDrag,
    pub touch_pan: PanDrag,
    pub pinch: Pinch,
    pub taps: TapDetector,
}

impl ViewerState {
    fn new(layout: OverlayLayout, baseline: f64, limits: ScaleLimits) -> Self {
        Self {
            transform: Transform::centered(baseline),
            baseline,
            limits,
            layout,
            natural: None,
            mouse_pan: PanDrag::default(),
            touch_pan: PanDrag::default(),
            pinch: Pinch::default(),
            taps: TapDetector::default(),
        }
    }

    pub fn scale(&self) -> f64 {
        self.transform.scale
    }

    /// Zoomed in past the baseline, so panning is allowed.
    pub fn is_zoomed(&self) -> bool {
        self.transform.scale > self.baseline * (1.0 + BASELINE_TOLERANCE)
    }

    /// At the baseline, within tolerance.
    pub fn is_at_baseline(&self) -> bool {
        (self.transform.scale - self.baseline).abs() <= self.baseline * BASELINE_TOLERANCE
    }

    pub fn is_panning(&self) -> bool {
        self.mouse_pan.is_dragging()
    }

    fn stop_gestures(&mut self) {
        self.mouse_pan.stop_drag();
        self.touch_pan.stop_drag();
        self.pinch.reset();
        self.taps.reset();
    }
}

/// One open image viewer.
pub struct Viewer<H: Host, C: Clock> {
    host: H,
    clock: C,
    config: ViewerConfig,
    src: String,
    phase: Phase,
    state: ViewerState,
    subscriptions: Vec<H::Subscription>,
    pending_frame: Option<FrameId>,
    /// The visible marker has been set at least once
    shown: bool,
    closed: bool,
}

impl<H: Host, C: Clock> Viewer<H, C> {
    /// Mount the overlay for `src` and start listening for input.
    ///
    /// On error everything acquired so far is released again.
    pub fn open(
        src: &str,
        host: H,
        clock: C,
        config: ViewerConfig,
        layout: OverlayLayout,
    ) -> Result<Self> {
        let baseline = resolve_baseline(
            config.baseline,
            None,
            &layout,
            config.narrow_breakpoint,
            config.limits,
        );
        let limits = config.limits.admitting(baseline);

        let mut viewer = Self {
            host,
            clock,
            src: src.to_string(),
            phase: Phase::Opening,
            state: ViewerState::new(layout, baseline, limits),
            subscriptions: Vec::with_capacity(GlobalListener::ALL.len()),
            pending_frame: None,
            shown: false,
            closed: false,
            config,
        };

        log::info!("Opening image viewer for {}", viewer.src);

        // Early returns drop `viewer`, whose Drop releases what was acquired
        viewer.host.mount(&ViewTree::build(src))?;
        viewer.host.set_scroll_locked(true);
        for listener in GlobalListener::ALL {
            let subscription = viewer.host.subscribe(listener)?;
            viewer.subscriptions.push(subscription);
        }

        // The fixed baseline does not depend on the image; no need to wait
        if matches!(viewer.config.baseline, BaselinePolicy::Fixed { .. }) {
            viewer.settle(None);
        }

        Ok(viewer)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    /// True once teardown has run; the viewer can be discarded.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Presentation for the current state.
    pub fn frame(&self) -> Frame {
        Frame::from_state(
            self.state.transform,
            self.state.is_zoomed(),
            self.state.is_panning(),
        )
    }

    // =========================================================================
    // Transform engine
    // =========================================================================

    /// Anchor-preserving zoom by `delta_scale` around `anchor` (client space).
    pub fn zoom_at_point(&mut self, delta_scale: f64, anchor: Point) {
        let stage_center = self.state.layout.stage_center();
        self.state.transform =
            self.state
                .transform
                .zoom_at_point(delta_scale, anchor, stage_center, self.state.limits);
        self.schedule_render();
    }

    /// Zoom-in button step, anchored at the current stage center.
    pub fn zoom_in(&mut self) {
        self.zoom_at_center(self.config.steps.button_in);
    }

    /// Zoom-out button step, anchored at the current stage center.
    pub fn zoom_out(&mut self) {
        self.zoom_at_center(self.config.steps.button_out);
    }

    fn zoom_at_center(&mut self, delta_scale: f64) {
        let center = self
            .state
            .transform
            .current_center(self.state.layout.stage_center());
        self.zoom_at_point(delta_scale, center);
    }

    /// Back to the baseline scale, centered.
    pub fn reset_view(&mut self) {
        self.state.transform = Transform::centered(self.state.baseline);
        self.state.mouse_pan.stop_drag();
        self.state.touch_pan.stop_drag();
        self.schedule_render();
    }

    fn pan_by(&mut self, dx: f64, dy: f64) {
        self.state.transform = self.state.transform.pan_by(dx, dy);
        self.schedule_render();
    }

    /// Double-click / double-tap: zoom in or reset.
    ///
    /// A fixed baseline zooms in only from the baseline. A fitted view zooms
    /// in while below [`FIT_TOGGLE_SCALE`], or from a baseline above it.
    fn toggle_zoom(&mut self, anchor: Point) {
        let zoom_in = match self.config.baseline {
            BaselinePolicy::Fixed { .. } => self.state.is_at_baseline(),
            BaselinePolicy::FitToScreen => {
                self.state.scale() < FIT_TOGGLE_SCALE || self.state.is_at_baseline()
            }
        };
        if zoom_in {
            self.zoom_at_point(self.config.steps.double_activate, anchor);
        } else {
            self.reset_view();
        }
    }

    /// Recompute the baseline from the current image and layout.
    fn rebaseline(&mut self) {
        let baseline = resolve_baseline(
            self.config.baseline,
            self.state.natural,
            &self.state.layout,
            self.config.narrow_breakpoint,
            self.config.limits,
        );
        self.state.baseline = baseline;
        self.state.limits = self.config.limits.admitting(baseline);
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Coalesce renders onto one animation frame.
    fn schedule_render(&mut self) {
        if self.closed || self.phase == Phase::Closing {
            return;
        }
        if let Some(id) = self.pending_frame.take() {
            self.host.cancel_frame(id);
        }
        match self.host.request_frame() {
            Ok(id) => self.pending_frame = Some(id),
            Err(e) => {
                log::warn!("Cannot schedule animation frame, rendering now: {}", e);
                let frame = self.frame();
                self.host.apply(&frame);
            }
        }
    }

    /// Run a scheduled frame. Stale or cancelled ids are ignored.
    pub fn on_animation_frame(&mut self, id: FrameId) {
        if self.pending_frame != Some(id) {
            log::trace!("Ignoring stale animation frame {}", id);
            return;
        }
        self.pending_frame = None;
        if self.closed {
            return;
        }

        let frame = self.frame();
        self.host.apply(&frame);

        if self.phase == Phase::Open && !self.shown {
            self.host.set_visible(true);
            self.shown = true;
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Image settled (loaded, failed, or not needed): compute the initial view.
    fn settle(&mut self, natural: Option<Size>) {
        self.state.natural = natural;
        self.rebaseline();
        self.state.transform = Transform::centered(self.state.baseline);
        self.phase = Phase::Open;
        log::debug!(
            "Image viewer open at scale {:.3} (natural size {:?})",
            self.state.baseline,
            natural
        );
        self.schedule_render();
    }

    /// Start closing. Repeated calls are no-ops.
    pub fn close(&mut self) {
        if self.closed || self.phase == Phase::Closing {
            return;
        }
        log::info!("Closing image viewer");
        self.phase = Phase::Closing;
        self.state.stop_gestures();
        if let Some(id) = self.pending_frame.take() {
            self.host.cancel_frame(id);
        }

        if self.shown {
            // Fade out; teardown waits for the transition
            self.host.set_visible(false);
        } else {
            // Never shown, so no transition will ever report back
            self.teardown();
        }
    }

    /// Release everything acquired at open. Idempotent.
    fn teardown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Some(id) = self.pending_frame.take() {
            self.host.cancel_frame(id);
        }
        let released = self.subscriptions.len();
        self.subscriptions.clear();
        self.host.unmount();
        self.host.set_scroll_locked(false);
        log::debug!("Image viewer torn down, released {} listeners", released);
    }

    // =========================================================================
    // Input interpretation
    // =========================================================================

    fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Feed one input event.
    pub fn dispatch(&mut self, event: InputEvent) -> Response {
        if self.closed {
            return Response::ignored();
        }
        match self.phase {
            Phase::Opening => self.dispatch_opening(event),
            Phase::Open => self.dispatch_open(event),
            Phase::Closing => self.dispatch_closing(event),
        }
    }

    fn dispatch_opening(&mut self, event: InputEvent) -> Response {
        match event {
            InputEvent::ImageLoaded { natural } => {
                self.settle(Some(natural));
                Response::handled()
            }
            InputEvent::ImageFailed => {
                log::warn!("Image {} failed to load, showing neutral view", self.src);
                self.settle(None);
                Response::handled()
            }
            InputEvent::Resize { layout } => {
                self.state.layout = layout;
                Response::handled()
            }
            InputEvent::Key { key, in_text_field } => self.handle_key(key, in_text_field),
            InputEvent::Control {
                control: Control::Close,
            }
            | InputEvent::BackdropClick => {
                self.close();
                Response::handled()
            }
            InputEvent::Wheel { .. } => Response::blocked(),
            _ => Response::ignored(),
        }
    }

    fn dispatch_closing(&mut self, event: InputEvent) -> Response {
        match event {
            InputEvent::TransitionEnd => {
                self.teardown();
                Response::handled()
            }
            InputEvent::Wheel { .. } => Response::blocked(),
            _ => Response::ignored(),
        }
    }

    fn dispatch_open(&mut self, event: InputEvent) -> Response {
        match event {
            InputEvent::Wheel { delta_y, position } => self.handle_wheel(delta_y, position),
            InputEvent::DoubleClick { position } => {
                self.toggle_zoom(position);
                Response::consumed()
            }
            InputEvent::MouseDown { position, button } => self.handle_mouse_down(position, button),
            InputEvent::MouseMove { position } => match self.state.mouse_pan.sample(position) {
                Some((dx, dy)) => {
                    self.pan_by(dx, dy);
                    Response::handled()
                }
                None => Response::ignored(),
            },
            InputEvent::MouseUp => {
                if self.state.mouse_pan.is_dragging() {
                    self.state.mouse_pan.stop_drag();
                    // cursor goes back from grabbing
                    self.schedule_render();
                    Response::handled()
                } else {
                    Response::ignored()
                }
            }
            InputEvent::TouchStart { touches } => self.handle_touch_start(&touches),
            InputEvent::TouchMove { touches } => self.handle_touch_move(&touches),
            InputEvent::TouchEnd { touches } => self.handle_touch_end(&touches),
            InputEvent::Key { key, in_text_field } => self.handle_key(key, in_text_field),
            InputEvent::Control { control } => {
                match control {
                    Control::ZoomIn => self.zoom_in(),
                    Control::ZoomOut => self.zoom_out(),
                    Control::Reset => self.reset_view(),
                    Control::Close => self.close(),
                }
                Response::handled()
            }
            InputEvent::BackdropClick => {
                self.close();
                Response::handled()
            }
            InputEvent::ImageLoaded { natural } => {
                self.state.natural = Some(natural);
                let was_at_baseline = self.state.is_at_baseline();
                self.rebaseline();
                if was_at_baseline {
                    self.reset_view();
                }
                Response::handled()
            }
            InputEvent::ImageFailed => {
                log::warn!("Image {} failed to load", self.src);
                Response::ignored()
            }
            InputEvent::Resize { layout } => {
                self.handle_resize(layout);
                Response::handled()
            }
            // the fade-in transition also reports completion; nothing to do
            InputEvent::TransitionEnd => Response::ignored(),
        }
    }

    fn handle_wheel(&mut self, delta_y: f64, position: Point) -> Response {
        if delta_y == 0.0 || !delta_y.is_finite() {
            // horizontal scroll: no zoom, but the page must not move
            return Response::blocked();
        }
        let factor = if delta_y < 0.0 {
            self.config.steps.wheel_in
        } else {
            self.config.steps.wheel_out
        };
        self.zoom_at_point(factor, position);
        Response::consumed()
    }

    fn handle_mouse_down(&mut self, position: Point, button: MouseButton) -> Response {
        if button != MouseButton::Primary || !self.state.is_zoomed() {
            return Response::ignored();
        }
        self.state.mouse_pan.start_drag(position);
        self.schedule_render();
        Response::consumed()
    }

    fn handle_touch_start(&mut self, touches: &[Point]) -> Response {
        match touches {
            [touch] => {
                let window = Duration::from_millis(self.config.gestures.double_tap_window_ms);
                match self.state.taps.tap(self.now(), window) {
                    Tap::Double => {
                        self.state.touch_pan.stop_drag();
                        self.toggle_zoom(*touch);
                        Response::consumed()
                    }
                    Tap::Single => {
                        self.state.touch_pan.start_drag(*touch);
                        Response::handled()
                    }
                }
            }
            [first, second] => {
                self.state.taps.reset();
                self.state.touch_pan.stop_drag();
                self.state.pinch.start(*first, *second);
                Response::consumed()
            }
            [] => Response::ignored(),
            _ => {
                self.state.pinch.reset();
                self.state.touch_pan.stop_drag();
                Response::blocked()
            }
        }
    }

    fn handle_touch_move(&mut self, touches: &[Point]) -> Response {
        match touches {
            [touch] => {
                if !self.state.is_zoomed() {
                    // at the baseline the stage may scroll natively
                    return Response::ignored();
                }
                match self.state.touch_pan.sample(*touch) {
                    Some((dx, dy)) => self.pan_by(dx, dy),
                    None => self.state.touch_pan.start_drag(*touch),
                }
                Response::consumed()
            }
            [first, second] => {
                if let Some((delta, midpoint)) = self.state.pinch.sample(*first, *second) {
                    self.zoom_at_point(delta, midpoint);
                }
                Response::consumed()
            }
            [] => Response::ignored(),
            _ => Response::blocked(),
        }
    }

    fn handle_touch_end(&mut self, remaining: &[Point]) -> Response {
        let was_active = self.state.pinch.is_active() || self.state.touch_pan.is_dragging();
        self.state.pinch.reset();
        self.state.touch_pan.stop_drag();
        if let [first, second] = remaining {
            // three fingers down to two: keep pinching from here
            self.state.pinch.start(*first, *second);
        }
        if was_active {
            Response::handled()
        } else {
            Response::ignored()
        }
    }

    fn handle_key(&mut self, key: Key, in_text_field: bool) -> Response {
        if in_text_field {
            return Response::ignored();
        }
        let Some(action) = self.config.keybindings.action_for(key) else {
            return Response::ignored();
        };

        if self.phase != Phase::Open && action != ViewerAction::Close {
            return Response::ignored();
        }

        match action {
            ViewerAction::Close => self.close(),
            ViewerAction::ZoomIn => self.zoom_in(),
            ViewerAction::ZoomOut => self.zoom_out(),
            ViewerAction::Reset => self.reset_view(),
            ViewerAction::Pan(direction) => {
                if self.state.is_zoomed() {
                    let (dx, dy) = direction.translation(self.config.gestures.key_pan_step);
                    self.pan_by(dx, dy);
                }
            }
        }
        Response::consumed()
    }

    fn handle_resize(&mut self, layout: OverlayLayout) {
        let was_at_baseline = self.state.is_at_baseline();
        self.state.layout = layout;
        self.rebaseline();
        if was_at_baseline {
            self.reset_view();
        } else {
            let limits = self.state.limits;
            let transform = &mut self.state.transform;
            transform.scale = crate::transform::clamp(transform.scale, limits.min, limits.max);
            self.schedule_render();
        }
    }
}

impl<H: Host, C: Clock> Drop for Viewer<H, C> {
    fn drop(&mut self) {
        if !self.closed {
            log::debug!("Image viewer dropped while live, releasing resources");
        }
        self.teardown();
    }
}

impl<H: Host, C: Clock> std::fmt::Debug for Viewer<H, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewer")
            .field("src", &self.src)
            .field("phase", &self.phase)
            .field("state", &self.state)
            .field("listeners", &self.subscriptions.len())
            .field("pending_frame", &self.pending_frame)
            .field("closed", &self.closed)
            .finish()
    }
}
