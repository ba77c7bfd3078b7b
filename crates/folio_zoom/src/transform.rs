//! Zoom-to-point mathematics.
//!
//! The viewer's whole visual state is a uniform scale plus a translation of the
//! stage relative to its centered, un-panned position. Everything here is pure
//! so the anchor invariant can be tested without a document.

use crate::config::ScaleLimits;
use crate::geometry::Point;

/// Bound `value` to `[min, max]`.
///
/// Unlike `f64::clamp` this never panics: if the bounds are inverted the
/// upper bound wins, matching `min(max, max(min, value))`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    max.min(min.max(value))
}

/// Represents scale/translate state of the stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Transform {
    /// Create a new transform with the given scale and translation.
    pub fn new(scale: f64, translate_x: f64, translate_y: f64) -> Self {
        Self {
            scale,
            translate_x,
            translate_y,
        }
    }

    /// Create an identity transform (scale=1, no translation).
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    /// Centered transform at the given scale.
    pub fn centered(scale: f64) -> Self {
        Self::new(scale, 0.0, 0.0)
    }

    /// Current stage center in client space, given its untransformed center.
    pub fn current_center(&self, stage_center: Point) -> Point {
        Point::new(
            stage_center.x + self.translate_x,
            stage_center.y + self.translate_y,
        )
    }

    /// Content-space point (relative to the image center, unscaled) under `screen`.
    pub fn content_point(&self, screen: Point, stage_center: Point) -> Point {
        let center = self.current_center(stage_center);
        Point::new(
            (screen.x - center.x) / self.scale,
            (screen.y - center.y) / self.scale,
        )
    }

    /// Client-space position of a content-space point.
    pub fn screen_point(&self, content: Point, stage_center: Point) -> Point {
        let center = self.current_center(stage_center);
        Point::new(
            center.x + content.x * self.scale,
            center.y + content.y * self.scale,
        )
    }

    /// Calculate an anchor-preserving zoom.
    ///
    /// The new scale is `scale * delta_scale` clamped to `limits`. The
    /// translation is then adjusted so the content under `anchor` stays under
    /// `anchor`. Non-finite or non-positive deltas leave the transform as is.
    ///
    /// # Arguments
    /// * `delta_scale` - Multiplicative scale change
    /// * `anchor` - Fixed point in client space
    /// * `stage_center` - Untransformed stage center in client space
    /// * `limits` - Scale bounds to clamp into
    pub fn zoom_at_point(
        &self,
        delta_scale: f64,
        anchor: Point,
        stage_center: Point,
        limits: ScaleLimits,
    ) -> Transform {
        if !delta_scale.is_finite() || delta_scale <= 0.0 || self.scale <= 0.0 {
            return *self;
        }

        let new_scale = clamp(self.scale * delta_scale, limits.min, limits.max);
        if new_scale == self.scale {
            return *self;
        }

        // Anchor position relative to the untransformed stage center
        let anchor_rel_x = anchor.x - stage_center.x;
        let anchor_rel_y = anchor.y - stage_center.y;

        // Content-space point under the anchor (before zoom)
        let content_x = (anchor_rel_x - self.translate_x) / self.scale;
        let content_y = (anchor_rel_y - self.translate_y) / self.scale;

        // New translation keeping that point under the anchor
        Transform {
            scale: new_scale,
            translate_x: anchor_rel_x - content_x * new_scale,
            translate_y: anchor_rel_y - content_y * new_scale,
        }
    }

    /// Apply a pan delta to the transform.
    pub fn pan_by(&self, dx: f64, dy: f64) -> Transform {
        Transform {
            scale: self.scale,
            translate_x: self.translate_x + dx,
            translate_y: self.translate_y + dy,
        }
    }

    /// Zoom level as shown to the user, e.g. `152` for a scale of 1.52.
    pub fn zoom_percent(&self) -> i64 {
        (self.scale * 100.0).round() as i64
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
