//! folio_zoom - platform-free core of the portfolio image viewer
//!
//! Everything the lightbox does lives here: the anchor-preserving transform
//! engine, fit-to-screen sizing, gesture recognition, keyboard bindings and
//! the open/close lifecycle. The document is reached only through the
//! [`Host`] trait, so the whole viewer runs and is tested natively.

pub mod activation;
pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod fit;
pub mod geometry;
pub mod gesture;
pub mod host;
pub mod keybindings;
pub mod lightbox;
pub mod transform;
pub mod view;
pub mod viewer;

#[cfg(test)]
mod tests;

pub use activation::{Activation, ActivationTracker};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    BaselinePolicy, GestureConfig, LogLevel, ScaleLimits, ViewerConfig, ZoomSteps, CONFIG_VERSION,
};
pub use error::{Result, ViewerError};
pub use event::{Control, InputEvent, MouseButton, Response};
pub use fit::{fit_scale, resolve_baseline};
pub use geometry::{Insets, OverlayLayout, Point, Rectangle, Size};
pub use gesture::{PanDrag, Pinch, Tap, TapDetector};
pub use host::{FrameId, GlobalListener, HeadlessHost, HeadlessSubscription, Host, HostRecord};
pub use keybindings::{Direction, Key, KeyBindings, ViewerAction};
pub use lightbox::Lightbox;
pub use transform::Transform;
pub use view::{Cursor, ElementSpec, Frame, Part, ViewTree};
pub use viewer::{Phase, Viewer, ViewerState};
