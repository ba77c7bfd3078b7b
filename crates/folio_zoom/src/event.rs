use serde::{Deserialize, Serialize};

use crate::geometry::{OverlayLayout, Point, Size};
use crate::keybindings::Key;

/// On-screen buttons of the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    ZoomIn,
    ZoomOut,
    Reset,
    Close,
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    #[default]
    Primary,
    Middle,
    Secondary,
    Other,
}

impl MouseButton {
    /// Map a DOM `MouseEvent.button` value.
    pub fn from_dom(button: i16) -> Self {
        match button {
            0 => MouseButton::Primary,
            1 => MouseButton::Middle,
            2 => MouseButton::Secondary,
            _ => MouseButton::Other,
        }
    }
}

/// Inputs the viewer responds to.
///
/// Positions are client coordinates. Touch events carry the full list of
/// touches still on the surface, like `TouchEvent.touches`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// Wheel over the overlay; negative `delta_y` scrolls up
    Wheel { delta_y: f64, position: Point },
    /// Double-click over the overlay
    DoubleClick { position: Point },
    /// Button pressed on the stage
    MouseDown {
        position: Point,
        #[serde(default)]
        button: MouseButton,
    },
    /// Pointer moved anywhere in the window
    MouseMove { position: Point },
    /// Button released anywhere in the window
    MouseUp,
    TouchStart { touches: Vec<Point> },
    TouchMove { touches: Vec<Point> },
    /// Touch lifted; `touches` are the ones remaining
    TouchEnd {
        #[serde(default)]
        touches: Vec<Point>,
    },
    /// Key pressed while the viewer is open
    Key {
        key: Key,
        /// Focus is in an editable field; shortcuts stay out of the way
        #[serde(default)]
        in_text_field: bool,
    },
    /// One of the viewer's buttons was clicked
    Control { control: Control },
    /// Click landed on the backdrop itself
    BackdropClick,
    /// The image finished loading
    ImageLoaded { natural: Size },
    /// The image could not be loaded
    ImageFailed,
    /// Overlay geometry changed
    Resize { layout: OverlayLayout },
    /// The fade-out transition completed
    TransitionEnd,
}

/// How the binding should treat the originating DOM event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Response {
    /// The viewer acted on the event
    pub handled: bool,
    /// Suppress the browser default (page scroll, native zoom, ...)
    pub prevent_default: bool,
}

impl Response {
    /// Event not used; let the browser do its thing.
    pub fn ignored() -> Self {
        Self::default()
    }

    /// Event used; browser default left alone.
    pub fn handled() -> Self {
        Self {
            handled: true,
            prevent_default: false,
        }
    }

    /// Event used and browser default suppressed.
    pub fn consumed() -> Self {
        Self {
            handled: true,
            prevent_default: true,
        }
    }

    /// Event not acted on, but the browser default must still be suppressed.
    pub fn blocked() -> Self {
        Self {
            handled: false,
            prevent_default: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_shape() {
        let json = r#"[
            { "type": "wheel", "delta_y": -120.0, "position": { "x": 10.0, "y": 20.0 } },
            { "type": "mouse_down", "position": { "x": 1.0, "y": 2.0 } },
            { "type": "key", "key": "Escape" },
            { "type": "control", "control": "zoom_in" },
            { "type": "touch_end" }
        ]"#;
        let events: Vec<InputEvent> = serde_json::from_str(json).unwrap();
        assert_eq!(
            events[1],
            InputEvent::MouseDown {
                position: Point::new(1.0, 2.0),
                button: MouseButton::Primary
            }
        );
        assert_eq!(
            events[2],
            InputEvent::Key {
                key: Key::Escape,
                in_text_field: false
            }
        );
        assert_eq!(events[4], InputEvent::TouchEnd { touches: vec![] });
    }

    #[test]
    fn test_dom_button_mapping() {
        assert_eq!(MouseButton::from_dom(0), MouseButton::Primary);
        assert_eq!(MouseButton::from_dom(2), MouseButton::Secondary);
        assert_eq!(MouseButton::from_dom(7), MouseButton::Other);
    }
}
