//! Geometry primitives in DOM pixel units.

use serde::{Deserialize, Serialize};

/// A 2D point in client (viewport) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Point halfway between this one and `other`.
    pub fn midpoint(&self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Component-wise difference `self - other`.
    pub fn delta_from(&self, other: Point) -> (f64, f64) {
        (self.x - other.x, self.y - other.y)
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
        }
    }

    /// True when both dimensions are finite and strictly positive.
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Padding on each side of a box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Insets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Insets {
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Same padding on all sides.
    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// A rectangle defined by position and size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rectangle {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Get the center point of this rectangle.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Shrink by the given padding. Dimensions never go negative.
    pub fn inset(&self, insets: Insets) -> Rectangle {
        Rectangle::new(
            self.x + insets.left,
            self.y + insets.top,
            (self.width - insets.horizontal()).max(0.0),
            (self.height - insets.vertical()).max(0.0),
        )
    }
}

/// Measured geometry of the open overlay.
///
/// `overlay` is the backdrop box in client coordinates, `padding` its declared
/// CSS padding. The stage sits centered in the padded content box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OverlayLayout {
    pub overlay: Rectangle,
    pub padding: Insets,
    /// Layout viewport width, used for the narrow breakpoint
    pub viewport_width: f64,
}

impl OverlayLayout {
    pub fn new(overlay: Rectangle, padding: Insets, viewport_width: f64) -> Self {
        Self {
            overlay,
            padding,
            viewport_width,
        }
    }

    /// Layout filling a `width` x `height` viewport with no padding.
    pub fn viewport(width: f64, height: f64) -> Self {
        Self::new(Rectangle::new(0.0, 0.0, width, height), Insets::default(), width)
    }

    /// The area available to the image.
    pub fn content(&self) -> Rectangle {
        self.overlay.inset(self.padding)
    }

    /// Untransformed stage center in client coordinates.
    pub fn stage_center(&self) -> Point {
        self.content().center()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_and_midpoint() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(30.0, 40.0);
        assert_eq!(a.distance(b), 50.0);
        assert_eq!(a.midpoint(b), Point::new(15.0, 20.0));
    }

    #[test]
    fn test_inset_never_negative() {
        let r = Rectangle::new(0.0, 0.0, 10.0, 10.0).inset(Insets::uniform(8.0));
        assert_eq!(r.width, 0.0);
        assert_eq!(r.height, 0.0);
        assert_eq!(r.x, 8.0);
    }

    #[test]
    fn test_stage_center_respects_asymmetric_padding() {
        let layout = OverlayLayout::new(
            Rectangle::new(0.0, 0.0, 800.0, 600.0),
            Insets::new(40.0, 0.0, 0.0, 0.0),
            800.0,
        );
        assert_eq!(layout.stage_center(), Point::new(400.0, 320.0));
    }

    #[test]
    fn test_size_usable() {
        assert!(Size::new(1.0, 1.0).is_usable());
        assert!(!Size::new(0.0, 1.0).is_usable());
        assert!(!Size::new(f64::NAN, 1.0).is_usable());
        assert!(!Size::new(f64::INFINITY, 1.0).is_usable());
    }
}
