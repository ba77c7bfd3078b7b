//! The seam between the viewer and the document it lives in.
//!
//! The viewer never touches the DOM directly. It asks a [`Host`] to mount the
//! declarative [`ViewTree`], apply [`Frame`]s, schedule animation frames and
//! register document-level listeners. [`HeadlessHost`] records all of it so
//! the viewer can be exercised without a browser.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::error::{Result, ViewerError};
use crate::view::{Frame, ViewTree};

/// Identifier of a scheduled animation frame.
pub type FrameId = i32;

/// Document/window level event streams the viewer subscribes to while open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlobalListener {
    /// `keydown` on the document
    KeyDown,
    /// `mousemove` on the window, so drags continue outside the stage
    MouseMove,
    /// `mouseup` on the window
    MouseUp,
    /// `resize` on the window
    Resize,
}

impl GlobalListener {
    /// Everything an open viewer listens to.
    pub const ALL: [GlobalListener; 4] = [
        GlobalListener::KeyDown,
        GlobalListener::MouseMove,
        GlobalListener::MouseUp,
        GlobalListener::Resize,
    ];

    /// DOM event type name.
    pub fn event_type(&self) -> &'static str {
        match self {
            GlobalListener::KeyDown => "keydown",
            GlobalListener::MouseMove => "mousemove",
            GlobalListener::MouseUp => "mouseup",
            GlobalListener::Resize => "resize",
        }
    }
}

/// Document operations the viewer relies on.
pub trait Host {
    /// Registration guard; dropping it must deregister the listener.
    type Subscription;

    /// Insert the overlay subtree into the document.
    fn mount(&mut self, tree: &ViewTree) -> Result<()>;

    /// Detach the overlay subtree. Must tolerate being called when nothing is mounted.
    fn unmount(&mut self);

    /// Toggle the document-level scroll suppression flag.
    fn set_scroll_locked(&mut self, locked: bool);

    /// Toggle the overlay's visible marker (drives the fade transition).
    fn set_visible(&mut self, visible: bool);

    /// Write a frame to the mounted elements.
    fn apply(&mut self, frame: &Frame);

    /// Ask for a callback on the next animation frame.
    fn request_frame(&mut self) -> Result<FrameId>;

    /// Cancel a frame that has not run yet.
    fn cancel_frame(&mut self, id: FrameId);

    /// Register a global listener for the lifetime of the returned guard.
    fn subscribe(&mut self, listener: GlobalListener) -> Result<Self::Subscription>;
}

/// Everything a [`HeadlessHost`] was asked to do.
#[derive(Debug, Default)]
pub struct HostRecord {
    pub mounted: Option<ViewTree>,
    pub mount_count: usize,
    pub unmount_count: usize,
    pub scroll_locked: bool,
    pub visible: bool,
    /// Frames applied, in order
    pub applied: Vec<Frame>,
    /// Frames requested and neither run nor cancelled
    pub pending_frames: Vec<FrameId>,
    pub cancelled_frames: Vec<FrameId>,
    /// Listeners currently registered
    pub live_listeners: Vec<GlobalListener>,
    /// Total registrations ever made
    pub subscribe_count: usize,
    /// Make the next `subscribe` fail (for error path tests)
    pub fail_next_subscribe: bool,
    next_frame: FrameId,
}

impl HostRecord {
    pub fn last_frame(&self) -> Option<&Frame> {
        self.applied.last()
    }
}

/// Recording host with no document behind it. Clones share one record.
#[derive(Debug, Clone, Default)]
pub struct HeadlessHost {
    record: Rc<RefCell<HostRecord>>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self) -> Ref<'_, HostRecord> {
        self.record.borrow()
    }

    pub fn fail_next_subscribe(&self) {
        self.record.borrow_mut().fail_next_subscribe = true;
    }

    /// Pop the oldest pending frame, as the browser would run it.
    pub fn take_pending_frame(&self) -> Option<FrameId> {
        let mut record = self.record.borrow_mut();
        if record.pending_frames.is_empty() {
            None
        } else {
            Some(record.pending_frames.remove(0))
        }
    }

    pub fn live_listener_count(&self) -> usize {
        self.record.borrow().live_listeners.len()
    }
}

/// Guard returned by [`HeadlessHost::subscribe`].
#[derive(Debug)]
pub struct HeadlessSubscription {
    listener: GlobalListener,
    record: Rc<RefCell<HostRecord>>,
}

impl Drop for HeadlessSubscription {
    fn drop(&mut self) {
        let mut record = self.record.borrow_mut();
        if let Some(index) = record.live_listeners.iter().position(|l| *l == self.listener) {
            record.live_listeners.remove(index);
        }
    }
}

impl Host for HeadlessHost {
    type Subscription = HeadlessSubscription;

    fn mount(&mut self, tree: &ViewTree) -> Result<()> {
        let mut record = self.record.borrow_mut();
        record.mounted = Some(tree.clone());
        record.mount_count += 1;
        Ok(())
    }

    fn unmount(&mut self) {
        let mut record = self.record.borrow_mut();
        if record.mounted.take().is_some() {
            record.unmount_count += 1;
        }
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.record.borrow_mut().scroll_locked = locked;
    }

    fn set_visible(&mut self, visible: bool) {
        self.record.borrow_mut().visible = visible;
    }

    fn apply(&mut self, frame: &Frame) {
        self.record.borrow_mut().applied.push(frame.clone());
    }

    fn request_frame(&mut self) -> Result<FrameId> {
        let mut record = self.record.borrow_mut();
        record.next_frame += 1;
        let id = record.next_frame;
        record.pending_frames.push(id);
        Ok(id)
    }

    fn cancel_frame(&mut self, id: FrameId) {
        let mut record = self.record.borrow_mut();
        record.pending_frames.retain(|pending| *pending != id);
        record.cancelled_frames.push(id);
    }

    fn subscribe(&mut self, listener: GlobalListener) -> Result<Self::Subscription> {
        let mut record = self.record.borrow_mut();
        if record.fail_next_subscribe {
            record.fail_next_subscribe = false;
            return Err(ViewerError::Host(format!(
                "cannot register {} listener",
                listener.event_type()
            )));
        }
        record.live_listeners.push(listener);
        record.subscribe_count += 1;
        Ok(HeadlessSubscription {
            listener,
            record: Rc::clone(&self.record),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_drop_deregisters() {
        let mut host = HeadlessHost::new();
        let key = host.subscribe(GlobalListener::KeyDown).unwrap();
        let mouse = host.subscribe(GlobalListener::MouseMove).unwrap();
        assert_eq!(host.live_listener_count(), 2);
        drop(key);
        assert_eq!(host.record().live_listeners, vec![GlobalListener::MouseMove]);
        drop(mouse);
        assert_eq!(host.live_listener_count(), 0);
        assert_eq!(host.record().subscribe_count, 2);
    }

    #[test]
    fn test_failed_subscribe_registers_nothing() {
        let mut host = HeadlessHost::new();
        host.fail_next_subscribe();
        assert!(host.subscribe(GlobalListener::Resize).is_err());
        assert_eq!(host.live_listener_count(), 0);
        assert!(host.subscribe(GlobalListener::Resize).is_ok());
    }

    #[test]
    fn test_cancelled_frames_never_run() {
        let mut host = HeadlessHost::new();
        let first = host.request_frame().unwrap();
        let second = host.request_frame().unwrap();
        host.cancel_frame(first);
        assert_eq!(host.take_pending_frame(), Some(second));
        assert_eq!(host.take_pending_frame(), None);
    }

    #[test]
    fn test_unmount_without_mount_is_harmless() {
        let mut host = HeadlessHost::new();
        host.unmount();
        assert_eq!(host.record().unmount_count, 0);
    }
}
