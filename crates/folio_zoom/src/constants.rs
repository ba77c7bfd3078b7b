//! Centralized constants for folio_zoom
//!
//! Default values for every tunable in [`crate::ViewerConfig`] live here so the
//! config defaults and the tests agree on one source.

// =============================================================================
// Scale Limits
// =============================================================================

/// Lowest zoom factor for the fit-to-screen variant
pub const FIT_MIN_SCALE: f64 = 0.3;

/// Lowest zoom factor for the fixed-baseline variant
pub const CLASSIC_MIN_SCALE: f64 = 1.0;

/// Highest zoom factor for both variants
pub const MAX_SCALE: f64 = 5.0;

/// Relative tolerance used when comparing a scale against the baseline
pub const BASELINE_TOLERANCE: f64 = 1e-3;

// =============================================================================
// Zoom Steps
// =============================================================================

/// Multiplicative step for a wheel notch towards the user (zoom in)
pub const WHEEL_ZOOM_IN: f64 = 1.15;

/// Multiplicative step for a wheel notch away from the user (zoom out)
pub const WHEEL_ZOOM_OUT: f64 = 0.87;

/// Step applied by the zoom-in button and keyboard shortcut
pub const BUTTON_ZOOM_IN: f64 = 1.2;

/// Step applied by the zoom-out button and keyboard shortcut
pub const BUTTON_ZOOM_OUT: f64 = 0.83;

/// Factor applied by double-click / double-tap when at the baseline
pub const DOUBLE_ACTIVATE_ZOOM: f64 = 2.0;

/// Fit-to-screen only: double-activation below this scale zooms in, at or
/// above it resets
pub const FIT_TOGGLE_SCALE: f64 = 2.0;

// =============================================================================
// Gestures
// =============================================================================

/// Window after a single tap during which a second tap counts as a double-tap
pub const DOUBLE_TAP_WINDOW_MS: u64 = 250;

/// Movement (per axis) beyond which a touch on a source image is a scroll
pub const TAP_MOVE_THRESHOLD: f64 = 10.0;

/// Touch duration beyond which a touch on a source image is a scroll
pub const TAP_MAX_DURATION_MS: u64 = 300;

/// After a touch on a source image ends, a click within this window is the
/// browser's synthetic click for that touch
pub const SYNTHETIC_CLICK_WINDOW_MS: u64 = 800;

/// Pixels panned per arrow key press
pub const KEY_PAN_STEP: f64 = 30.0;

// =============================================================================
// Layout
// =============================================================================

/// Viewports at or below this width fill the available width on open
pub const NARROW_BREAKPOINT: f64 = 768.0;

// =============================================================================
// DOM class names
// =============================================================================

/// Overlay backdrop
pub const CLASS_OVERLAY: &str = "image-zoom-overlay";

/// Marker that triggers the fade-in transition
pub const CLASS_VISIBLE: &str = "visible";

/// Transformable container holding the image
pub const CLASS_STAGE: &str = "image-zoom-stage";

/// Button row
pub const CLASS_CONTROLS: &str = "image-zoom-controls";

/// Single control button
pub const CLASS_CONTROL: &str = "image-zoom-ctrl";

/// Percentage indicator
pub const CLASS_ZOOM_LABEL: &str = "image-zoom-level";

/// Close button
pub const CLASS_CLOSE: &str = "image-zoom-close-btn";

/// Marker on the document body while scrolling is suppressed
pub const CLASS_NO_SCROLL: &str = "no-scroll";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_limits_are_ordered() {
        assert!(FIT_MIN_SCALE > 0.0);
        assert!(CLASSIC_MIN_SCALE > 0.0);
        assert!(MAX_SCALE > FIT_MIN_SCALE);
        assert!(MAX_SCALE > CLASSIC_MIN_SCALE);
    }

    #[test]
    fn test_zoom_steps_point_the_right_way() {
        assert!(WHEEL_ZOOM_IN > 1.0);
        assert!(WHEEL_ZOOM_OUT < 1.0 && WHEEL_ZOOM_OUT > 0.0);
        assert!(BUTTON_ZOOM_IN > 1.0);
        assert!(BUTTON_ZOOM_OUT < 1.0 && BUTTON_ZOOM_OUT > 0.0);
        assert!(DOUBLE_ACTIVATE_ZOOM > 1.0);
    }
}
