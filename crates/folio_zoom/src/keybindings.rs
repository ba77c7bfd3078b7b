//! Keyboard shortcuts for the open viewer.
//!
//! Keys arrive as DOM `KeyboardEvent.key` strings and are normalised into
//! [`Key`]. Bindings map keys to [`ViewerAction`]s and can be overridden from
//! the JSON configuration, where keys are written the way the DOM reports them
//! (`"Escape"`, `"ArrowUp"`, `"+"`).

use serde::{Deserialize, Serialize};

/// A normalised key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Key {
    /// Printable character; ASCII letters are lower-cased
    Char(char),
    Escape,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    /// Anything the viewer has no use for
    Unidentified,
}

impl Key {
    /// Normalise a DOM `KeyboardEvent.key` value.
    ///
    /// Legacy names (`Esc`, `Up`, ...) reported by older engines map to the
    /// same keys as their standard names.
    pub fn from_dom(key: &str) -> Key {
        match key {
            "Escape" | "Esc" => Key::Escape,
            "ArrowUp" | "Up" => Key::ArrowUp,
            "ArrowDown" | "Down" => Key::ArrowDown,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c.to_ascii_lowercase()),
                    _ => Key::Unidentified,
                }
            }
        }
    }

    /// DOM name of this key.
    pub fn name(&self) -> String {
        match self {
            Key::Char(c) => c.to_string(),
            Key::Escape => "Escape".to_string(),
            Key::ArrowUp => "ArrowUp".to_string(),
            Key::ArrowDown => "ArrowDown".to_string(),
            Key::ArrowLeft => "ArrowLeft".to_string(),
            Key::ArrowRight => "ArrowRight".to_string(),
            Key::Unidentified => "Unidentified".to_string(),
        }
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::from_dom(&value)
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.name()
    }
}

/// Direction of a keyboard pan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Translation applied for a step of `step` pixels.
    ///
    /// The arrow names the part of the image brought into view, so the
    /// content moves the opposite way.
    pub fn translation(&self, step: f64) -> (f64, f64) {
        match self {
            Direction::Up => (0.0, step),
            Direction::Down => (0.0, -step),
            Direction::Left => (step, 0.0),
            Direction::Right => (-step, 0.0),
        }
    }
}

/// What a key press asks the viewer to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerAction {
    Close,
    ZoomIn,
    ZoomOut,
    Reset,
    Pan(Direction),
}

/// Keybinding configuration for the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub close: Vec<Key>,
    pub zoom_in: Vec<Key>,
    pub zoom_out: Vec<Key>,
    pub reset: Vec<Key>,
    pub pan_up: Vec<Key>,
    pub pan_down: Vec<Key>,
    pub pan_left: Vec<Key>,
    pub pan_right: Vec<Key>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            close: vec![Key::Escape],
            zoom_in: vec![Key::Char('+'), Key::Char('=')],
            zoom_out: vec![Key::Char('-'), Key::Char('_')],
            reset: vec![Key::Char('0'), Key::Char('r')],
            pan_up: vec![Key::ArrowUp],
            pan_down: vec![Key::ArrowDown],
            pan_left: vec![Key::ArrowLeft],
            pan_right: vec![Key::ArrowRight],
        }
    }
}

impl KeyBindings {
    /// Create new keybindings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the action bound to a key, if any.
    ///
    /// Bindings are checked in a fixed order, so a key bound twice resolves
    /// to the first of close, zoom in, zoom out, reset, then the pans.
    pub fn action_for(&self, key: Key) -> Option<ViewerAction> {
        if key == Key::Unidentified {
            return None;
        }
        let table: [(&[Key], ViewerAction); 8] = [
            (&self.close, ViewerAction::Close),
            (&self.zoom_in, ViewerAction::ZoomIn),
            (&self.zoom_out, ViewerAction::ZoomOut),
            (&self.reset, ViewerAction::Reset),
            (&self.pan_up, ViewerAction::Pan(Direction::Up)),
            (&self.pan_down, ViewerAction::Pan(Direction::Down)),
            (&self.pan_left, ViewerAction::Pan(Direction::Left)),
            (&self.pan_right, ViewerAction::Pan(Direction::Right)),
        ];
        table
            .iter()
            .find(|(keys, _)| keys.contains(&key))
            .map(|(_, action)| *action)
    }
}
