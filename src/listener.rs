//! Owned DOM event listeners.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Event, EventTarget};

/// A registered event listener. Dropping the guard removes the listener.
///
/// The guard is often dropped from inside its own callback (a `transitionend`
/// handler tearing the viewer down), so the closure itself is freed on a later
/// microtask rather than in `Drop`.
pub struct ListenerGuard {
    target: EventTarget,
    event_type: &'static str,
    closure: Option<Closure<dyn FnMut(Event)>>,
}

impl ListenerGuard {
    /// Register `handler` for `event_type` on `target`.
    ///
    /// Listeners that may call `preventDefault` must not be passive.
    pub fn new<F>(
        target: &EventTarget,
        event_type: &'static str,
        passive: bool,
        handler: F,
    ) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            event_type,
            closure.as_ref().unchecked_ref(),
            &options,
        )?;
        Ok(Self {
            target: target.clone(),
            event_type,
            closure: Some(closure),
        })
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        let Some(closure) = self.closure.take() else {
            return;
        };
        if let Err(e) = self
            .target
            .remove_event_listener_with_callback(self.event_type, closure.as_ref().unchecked_ref())
        {
            log::warn!("Failed to remove {} listener: {:?}", self.event_type, e);
        }
        wasm_bindgen_futures::spawn_local(async move {
            drop(closure);
        });
    }
}
