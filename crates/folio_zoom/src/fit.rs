//! Fit-to-screen sizing.

use crate::config::{BaselinePolicy, ScaleLimits};
use crate::geometry::{OverlayLayout, Size};

/// Scale used when nothing sensible can be computed (failed or empty image).
pub const NEUTRAL_SCALE: f64 = 1.0;

/// Scale at which an image of `natural` size fits the overlay content area.
///
/// Narrow viewports (`viewport_width <= breakpoint`) fill the available width
/// and let the image overflow vertically. Wider viewports show the whole
/// image. Returns `None` when either the image or the content area is
/// degenerate, so callers never divide by zero.
pub fn fit_scale(natural: Size, layout: &OverlayLayout, breakpoint: f64) -> Option<f64> {
    if !natural.is_usable() {
        return None;
    }
    let available = layout.content().size();
    if !(available.width.is_finite() && available.width > 0.0) {
        return None;
    }

    let width_fit = available.width / natural.width;
    if layout.viewport_width <= breakpoint {
        return Some(width_fit);
    }

    if !(available.height.is_finite() && available.height > 0.0) {
        return None;
    }
    let height_fit = available.height / natural.height;
    Some(width_fit.min(height_fit))
}

/// The neutral zoom level for the current image under `policy`.
///
/// Never exceeds `limits.max`. It may fall below `limits.min`; see
/// [`ScaleLimits::admitting`].
pub fn resolve_baseline(
    policy: BaselinePolicy,
    natural: Option<Size>,
    layout: &OverlayLayout,
    breakpoint: f64,
    limits: ScaleLimits,
) -> f64 {
    let baseline = match policy {
        BaselinePolicy::Fixed { scale } => scale,
        BaselinePolicy::FitToScreen => natural
            .and_then(|size| fit_scale(size, layout, breakpoint))
            .unwrap_or(NEUTRAL_SCALE),
    };
    baseline.min(limits.max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Insets, Rectangle};

    const EPSILON: f64 = 1e-9;

    fn desktop() -> OverlayLayout {
        OverlayLayout::new(
            Rectangle::new(0.0, 0.0, 1280.0, 800.0),
            Insets::uniform(40.0),
            1280.0,
        )
    }

    fn phone() -> OverlayLayout {
        OverlayLayout::new(
            Rectangle::new(0.0, 0.0, 390.0, 844.0),
            Insets::uniform(15.0),
            390.0,
        )
    }

    #[test]
    fn test_wide_viewport_shows_whole_image() {
        // content area 1200 x 720; a 2400 x 1200 image fits by width (0.5)
        let scale = fit_scale(Size::new(2400.0, 1200.0), &desktop(), 768.0).unwrap();
        assert!((scale - 0.5).abs() < EPSILON);

        // a tall 1000 x 2400 image fits by height (0.3)
        let scale = fit_scale(Size::new(1000.0, 2400.0), &desktop(), 768.0).unwrap();
        assert!((scale - 0.3).abs() < EPSILON);
    }

    #[test]
    fn test_narrow_viewport_fills_width() {
        // content width 360; tall image would fit by height elsewhere
        let scale = fit_scale(Size::new(720.0, 4000.0), &phone(), 768.0).unwrap();
        assert!((scale - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_breakpoint_is_inclusive() {
        let layout = OverlayLayout::viewport(768.0, 400.0);
        // width fit 1.0 even though height fit would be 0.5
        let scale = fit_scale(Size::new(768.0, 800.0), &layout, 768.0).unwrap();
        assert!((scale - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_degenerate_inputs_have_no_fit() {
        assert_eq!(fit_scale(Size::zero(), &desktop(), 768.0), None);
        assert_eq!(fit_scale(Size::new(100.0, 0.0), &desktop(), 768.0), None);
        let collapsed = OverlayLayout::new(
            Rectangle::new(0.0, 0.0, 20.0, 20.0),
            Insets::uniform(40.0),
            1280.0,
        );
        assert_eq!(fit_scale(Size::new(100.0, 100.0), &collapsed, 768.0), None);
    }

    #[test]
    fn test_failed_image_resolves_to_neutral() {
        let baseline = resolve_baseline(
            BaselinePolicy::FitToScreen,
            None,
            &desktop(),
            768.0,
            ScaleLimits::default(),
        );
        assert_eq!(baseline, NEUTRAL_SCALE);
    }

    #[test]
    fn test_fixed_policy_ignores_image() {
        let baseline = resolve_baseline(
            BaselinePolicy::Fixed { scale: 1.0 },
            Some(Size::new(5000.0, 5000.0)),
            &desktop(),
            768.0,
            ScaleLimits::new(1.0, 5.0),
        );
        assert_eq!(baseline, 1.0);
    }

    #[test]
    fn test_tiny_image_baseline_capped_at_max() {
        let baseline = resolve_baseline(
            BaselinePolicy::FitToScreen,
            Some(Size::new(10.0, 10.0)),
            &desktop(),
            768.0,
            ScaleLimits::new(0.3, 5.0),
        );
        assert_eq!(baseline, 5.0);
    }
}
