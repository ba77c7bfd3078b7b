//! Declarative description of the overlay.
//!
//! [`ViewTree::build`] produces the fixed element tree the host mounts once per
//! opening. [`Frame::from_state`] is the pure `state -> presentation` step the
//! host applies on each animation frame; it never builds elements.

use crate::constants::{
    CLASS_CLOSE, CLASS_CONTROL, CLASS_CONTROLS, CLASS_OVERLAY, CLASS_STAGE, CLASS_ZOOM_LABEL,
};
use crate::event::Control;
use crate::transform::Transform;

/// Elements the host needs to address after mounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    Overlay,
    Stage,
    Image,
    Controls,
    ZoomLabel,
    Button(Control),
}

/// One element of the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSpec {
    pub tag: &'static str,
    pub part: Option<Part>,
    pub classes: Vec<&'static str>,
    pub attributes: Vec<(&'static str, String)>,
    pub text: Option<String>,
    pub children: Vec<ElementSpec>,
}

impl ElementSpec {
    fn new(tag: &'static str) -> Self {
        Self {
            tag,
            part: None,
            classes: Vec::new(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    fn part(mut self, part: Part) -> Self {
        self.part = Some(part);
        self
    }

    fn class(mut self, class: &'static str) -> Self {
        self.classes.push(class);
        self
    }

    fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((name, value.into()));
        self
    }

    fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    fn child(mut self, child: ElementSpec) -> Self {
        self.children.push(child);
        self
    }

    /// Depth-first search for the element tagged with `part`.
    pub fn find(&self, part: Part) -> Option<&ElementSpec> {
        if self.part == Some(part) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(part))
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

fn control_button(control: Control, label: &str, text: &str) -> ElementSpec {
    ElementSpec::new("button")
        .part(Part::Button(control))
        .class(CLASS_CONTROL)
        .attr("type", "button")
        .attr("aria-label", label)
        .text(text)
}

/// The overlay subtree for one opening.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewTree {
    pub root: ElementSpec,
}

impl ViewTree {
    /// Build the overlay for the image at `src`.
    pub fn build(src: &str) -> Self {
        let stage = ElementSpec::new("div")
            .part(Part::Stage)
            .class(CLASS_STAGE)
            .child(
                ElementSpec::new("img")
                    .part(Part::Image)
                    .attr("src", src)
                    .attr("alt", "")
                    .attr("draggable", "false"),
            );

        let controls = ElementSpec::new("div")
            .part(Part::Controls)
            .class(CLASS_CONTROLS)
            .child(control_button(Control::ZoomOut, "Zoom out", "\u{2212}"))
            .child(control_button(Control::Reset, "Reset zoom", "Reset"))
            .child(
                ElementSpec::new("span")
                    .part(Part::ZoomLabel)
                    .class(CLASS_ZOOM_LABEL)
                    .attr("aria-live", "polite"),
            )
            .child(control_button(Control::ZoomIn, "Zoom in", "+"));

        let close = ElementSpec::new("button")
            .part(Part::Button(Control::Close))
            .class(CLASS_CLOSE)
            .attr("type", "button")
            .attr("aria-label", "Close image viewer")
            .text("\u{00d7}");

        let root = ElementSpec::new("div")
            .part(Part::Overlay)
            .class(CLASS_OVERLAY)
            .attr("role", "dialog")
            .attr("aria-modal", "true")
            .attr("aria-label", "Image viewer")
            .child(stage)
            .child(controls)
            .child(close);

        Self { root }
    }

    pub fn find(&self, part: Part) -> Option<&ElementSpec> {
        self.root.find(part)
    }
}

/// Pointer affordance over the stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Default,
    /// Zoomed in and pannable
    Grab,
    /// Pan in progress
    Grabbing,
}

impl Cursor {
    pub fn css(&self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Grab => "grab",
            Cursor::Grabbing => "grabbing",
        }
    }
}

/// Presentation derived from viewer state.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub transform: Transform,
    pub cursor: Cursor,
}

impl Frame {
    pub fn from_state(transform: Transform, pannable: bool, panning: bool) -> Self {
        let cursor = match (pannable, panning) {
            (true, true) => Cursor::Grabbing,
            (true, false) => Cursor::Grab,
            (false, _) => Cursor::Default,
        };
        Self { transform, cursor }
    }

    /// CSS transform for the stage (translation only).
    pub fn stage_transform(&self) -> String {
        format!(
            "translate3d({}px, {}px, 0)",
            self.transform.translate_x, self.transform.translate_y
        )
    }

    /// CSS transform for the image (scale only).
    pub fn image_transform(&self) -> String {
        format!("scale({})", self.transform.scale)
    }

    /// Text of the percentage indicator.
    pub fn zoom_label(&self) -> String {
        format!("{}%", self.transform.zoom_percent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_has_every_part() {
        let tree = ViewTree::build("/img/diagram.png");
        for part in [
            Part::Overlay,
            Part::Stage,
            Part::Image,
            Part::Controls,
            Part::ZoomLabel,
            Part::Button(Control::ZoomIn),
            Part::Button(Control::ZoomOut),
            Part::Button(Control::Reset),
            Part::Button(Control::Close),
        ] {
            assert!(tree.find(part).is_some(), "missing {part:?}");
        }
    }

    #[test]
    fn test_overlay_is_a_modal_dialog() {
        let tree = ViewTree::build("a.png");
        assert_eq!(tree.root.attribute("role"), Some("dialog"));
        assert_eq!(tree.root.attribute("aria-modal"), Some("true"));
        assert!(tree.root.classes.contains(&CLASS_OVERLAY));
    }

    #[test]
    fn test_image_carries_source() {
        let tree = ViewTree::build("/blog/chart.webp");
        let image = tree.find(Part::Image).unwrap();
        assert_eq!(image.tag, "img");
        assert_eq!(image.attribute("src"), Some("/blog/chart.webp"));
    }

    #[test]
    fn test_controls_order() {
        let tree = ViewTree::build("a.png");
        let controls = tree.find(Part::Controls).unwrap();
        let parts: Vec<_> = controls.children.iter().filter_map(|c| c.part).collect();
        assert_eq!(
            parts,
            vec![
                Part::Button(Control::ZoomOut),
                Part::Button(Control::Reset),
                Part::ZoomLabel,
                Part::Button(Control::ZoomIn),
            ]
        );
    }

    #[test]
    fn test_frame_strings() {
        let frame = Frame::from_state(Transform::new(1.5, 12.0, -3.5), true, false);
        assert_eq!(frame.stage_transform(), "translate3d(12px, -3.5px, 0)");
        assert_eq!(frame.image_transform(), "scale(1.5)");
        assert_eq!(frame.zoom_label(), "150%");
        assert_eq!(frame.cursor.css(), "grab");
    }

    #[test]
    fn test_cursor_states() {
        let t = Transform::identity();
        assert_eq!(Frame::from_state(t, false, false).cursor, Cursor::Default);
        assert_eq!(Frame::from_state(t, false, true).cursor, Cursor::Default);
        assert_eq!(Frame::from_state(t, true, true).cursor, Cursor::Grabbing);
    }
}
