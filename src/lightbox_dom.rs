//! Wiring between page events and the lightbox.
//!
//! Every DOM event is translated into an [`InputEvent`], fed to the single
//! [`Lightbox`], and the returned [`Response`] decides whether the browser
//! default is suppressed.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use folio_zoom::constants::{CLASS_CLOSE, CLASS_CONTROLS};
use folio_zoom::{
    Activation, FrameId, GlobalListener, InputEvent, Key, Lightbox, MouseButton, Part, Phase,
    Point, Response, Size, SystemClock, ViewerConfig,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Element, Event, EventTarget, HtmlElement, HtmlImageElement, KeyboardEvent, MouseEvent,
    TouchEvent, TouchList, WheelEvent,
};

use crate::dom_host::{self, DomHost};
use crate::listener::ListenerGuard;

thread_local! {
    /// The page's lightbox, alive for the lifetime of the page
    static APP: RefCell<Option<Rc<App>>> = const { RefCell::new(None) };
}

/// Page-wide lightbox state shared by every listener.
pub struct App {
    this: Weak<App>,
    lightbox: RefCell<Lightbox<DomHost, SystemClock>>,
    close_fallback_ms: u32,
    /// Bumped on every opening so stale fallback timers can tell
    generation: Cell<u64>,
    fallback_armed: Cell<Option<u64>>,
    source_listeners: RefCell<Vec<ListenerGuard>>,
}

impl App {
    fn new(config: ViewerConfig) -> Rc<Self> {
        let close_fallback_ms = config.close_fallback_ms;
        Rc::new_cyclic(|this| Self {
            this: this.clone(),
            lightbox: RefCell::new(Lightbox::new(config, SystemClock::new())),
            close_fallback_ms,
            generation: Cell::new(0),
            fallback_armed: Cell::new(None),
            source_listeners: RefCell::new(Vec::new()),
        })
    }

    fn with_lightbox<R>(
        &self,
        f: impl FnOnce(&mut Lightbox<DomHost, SystemClock>) -> R,
    ) -> Option<R> {
        match self.lightbox.try_borrow_mut() {
            Ok(mut lightbox) => Some(f(&mut lightbox)),
            Err(_) => {
                log::warn!("Lightbox busy, dropping re-entrant event");
                None
            }
        }
    }

    /// Feed one event to the viewer.
    pub fn dispatch(&self, event: InputEvent) -> Response {
        let Some((response, closing)) = self.with_lightbox(|lightbox| {
            let response = lightbox.dispatch(event);
            let closing = lightbox
                .viewer()
                .is_some_and(|viewer| viewer.phase() == Phase::Closing);
            (response, closing)
        }) else {
            return Response::ignored();
        };
        if closing {
            self.arm_close_fallback();
        }
        response
    }

    pub fn on_animation_frame(&self, id: FrameId) {
        self.with_lightbox(|lightbox| lightbox.on_animation_frame(id));
    }

    /// Open the viewer for `src`, unless one is already showing.
    pub fn open(&self, src: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let host = match DomHost::new(self.this.clone()) {
            Ok(host) => host,
            Err(e) => {
                log::error!("Cannot create document host: {:?}", e);
                return;
            }
        };
        let layout = dom_host::viewport_layout(&window);

        let opened = self.with_lightbox(|lightbox| match lightbox.open(src, host, layout) {
            Ok(opened) => {
                // padding is only known once the overlay is in the document
                if let Some(layout) = lightbox
                    .viewer()
                    .and_then(|viewer| viewer.host().measure_layout())
                {
                    lightbox.dispatch(InputEvent::Resize { layout });
                }
                opened
            }
            Err(e) => {
                log::error!("Failed to open image viewer: {}", e);
                false
            }
        });
        if opened == Some(true) {
            self.generation.set(self.generation.get() + 1);
        }
    }

    fn resize(&self) {
        let layout = self
            .with_lightbox(|lightbox| {
                lightbox
                    .viewer()
                    .and_then(|viewer| viewer.host().measure_layout())
            })
            .flatten();
        if let Some(layout) = layout {
            self.dispatch(InputEvent::Resize { layout });
        }
    }

    /// Tear down after `close_fallback_ms` if the fade-out never reports.
    fn arm_close_fallback(&self) {
        let generation = self.generation.get();
        if self.fallback_armed.get() == Some(generation) {
            return;
        }
        self.fallback_armed.set(Some(generation));

        let app = self.this.clone();
        let callback = Closure::once_into_js(move || {
            let Some(app) = app.upgrade() else {
                return;
            };
            if app.generation.get() == generation {
                log::debug!("Close transition did not report, tearing down");
                app.dispatch(InputEvent::TransitionEnd);
            }
        });
        let timeout = i32::try_from(self.close_fallback_ms).unwrap_or(i32::MAX);
        let result = web_sys::window()
            .ok_or_else(|| JsValue::from_str("no window"))
            .and_then(|window| {
                window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    callback.unchecked_ref(),
                    timeout,
                )
            });
        if let Err(e) = result {
            log::warn!("Cannot arm close fallback: {:?}", e);
        }
    }
}

// =============================================================================
// Event translation
// =============================================================================

fn mouse_position(event: &MouseEvent) -> Point {
    Point::new(f64::from(event.client_x()), f64::from(event.client_y()))
}

fn touch_points(list: &TouchList) -> Vec<Point> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .map(|touch| Point::new(f64::from(touch.client_x()), f64::from(touch.client_y())))
        .collect()
}

fn target_element(event: &Event) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}

/// The event started on one of the viewer's buttons.
fn on_controls(event: &Event) -> bool {
    let selector = format!(".{}, .{}", CLASS_CONTROLS, CLASS_CLOSE);
    target_element(event).is_some_and(|element| dom_host::within(&element, &selector))
}

fn is_text_field(event: &Event) -> bool {
    let Some(element) = target_element(event) else {
        return false;
    };
    if matches!(element.tag_name().as_str(), "INPUT" | "TEXTAREA" | "SELECT") {
        return true;
    }
    element
        .dyn_ref::<HtmlElement>()
        .is_some_and(|element| element.is_content_editable())
}

fn key_input(event: &Event) -> Option<InputEvent> {
    let keyboard = event.dyn_ref::<KeyboardEvent>()?;
    // browser shortcuts such as ctrl + "+" stay with the browser
    if keyboard.ctrl_key() || keyboard.meta_key() || keyboard.alt_key() {
        return None;
    }
    Some(InputEvent::Key {
        key: Key::from_dom(&keyboard.key()),
        in_text_field: is_text_field(event),
    })
}

fn deliver(app: &Weak<App>, event: &Event, input: InputEvent) {
    let Some(app) = app.upgrade() else {
        return;
    };
    if app.dispatch(input).prevent_default {
        event.prevent_default();
    }
}

/// Listener that translates with `map` and forwards to the lightbox.
fn forward<F>(
    app: &Weak<App>,
    target: &EventTarget,
    event_type: &'static str,
    passive: bool,
    map: F,
) -> Result<ListenerGuard, JsValue>
where
    F: Fn(&Event) -> Option<InputEvent> + 'static,
{
    let app = app.clone();
    ListenerGuard::new(target, event_type, passive, move |event: Event| {
        if let Some(input) = map(&event) {
            deliver(&app, &event, input);
        }
    })
}

/// Handler for a document or window level listener of an open viewer.
pub fn global_handler(app: &Weak<App>, listener: GlobalListener) -> impl FnMut(Event) + 'static {
    let app = app.clone();
    move |event: Event| {
        let input = match listener {
            GlobalListener::KeyDown => key_input(&event),
            GlobalListener::MouseMove => event
                .dyn_ref::<MouseEvent>()
                .map(|mouse| InputEvent::MouseMove {
                    position: mouse_position(mouse),
                }),
            GlobalListener::MouseUp => Some(InputEvent::MouseUp),
            GlobalListener::Resize => {
                if let Some(app) = app.upgrade() {
                    app.resize();
                }
                None
            }
        };
        if let Some(input) = input {
            deliver(&app, &event, input);
        }
    }
}

/// Listeners on the overlay's own elements.
pub fn overlay_listeners(
    app: &Weak<App>,
    parts: &HashMap<Part, HtmlElement>,
) -> Result<Vec<ListenerGuard>, JsValue> {
    let overlay = parts
        .get(&Part::Overlay)
        .ok_or_else(|| JsValue::from_str("overlay element missing"))?;
    let stage = parts
        .get(&Part::Stage)
        .ok_or_else(|| JsValue::from_str("stage element missing"))?;
    let image = parts
        .get(&Part::Image)
        .ok_or_else(|| JsValue::from_str("image element missing"))?;

    let mut listeners = vec![
        forward(app, overlay, "wheel", false, |event| {
            let wheel = event.dyn_ref::<WheelEvent>()?;
            Some(InputEvent::Wheel {
                delta_y: wheel.delta_y(),
                position: mouse_position(wheel),
            })
        })?,
        forward(app, overlay, "dblclick", true, |event| {
            if on_controls(event) {
                return None;
            }
            let mouse = event.dyn_ref::<MouseEvent>()?;
            Some(InputEvent::DoubleClick {
                position: mouse_position(mouse),
            })
        })?,
        forward(app, stage, "mousedown", false, |event| {
            let mouse = event.dyn_ref::<MouseEvent>()?;
            Some(InputEvent::MouseDown {
                position: mouse_position(mouse),
                button: MouseButton::from_dom(mouse.button()),
            })
        })?,
        forward(app, overlay, "touchstart", false, |event| {
            if on_controls(event) {
                return None;
            }
            let touch = event.dyn_ref::<TouchEvent>()?;
            Some(InputEvent::TouchStart {
                touches: touch_points(&touch.touches()),
            })
        })?,
        forward(app, overlay, "touchmove", false, |event| {
            let touch = event.dyn_ref::<TouchEvent>()?;
            Some(InputEvent::TouchMove {
                touches: touch_points(&touch.touches()),
            })
        })?,
        forward(app, overlay, "touchend", true, |event| {
            let touch = event.dyn_ref::<TouchEvent>()?;
            Some(InputEvent::TouchEnd {
                touches: touch_points(&touch.touches()),
            })
        })?,
        forward(app, overlay, "touchcancel", true, |event| {
            let touch = event.dyn_ref::<TouchEvent>()?;
            Some(InputEvent::TouchEnd {
                touches: touch_points(&touch.touches()),
            })
        })?,
        forward(app, overlay, "click", true, |event| {
            // only the backdrop itself, not anything on top of it
            (event.target() == event.current_target()).then_some(InputEvent::BackdropClick)
        })?,
        forward(app, overlay, "transitionend", true, |event| {
            // transitions of children bubble up too
            (event.target() == event.current_target()).then_some(InputEvent::TransitionEnd)
        })?,
        forward(app, image, "load", true, |event| {
            let image = event.current_target()?.dyn_into::<HtmlImageElement>().ok()?;
            Some(InputEvent::ImageLoaded {
                natural: Size::new(
                    f64::from(image.natural_width()),
                    f64::from(image.natural_height()),
                ),
            })
        })?,
        forward(app, image, "error", true, |_event| Some(InputEvent::ImageFailed))?,
    ];

    for (part, element) in parts {
        if let Part::Button(control) = *part {
            let app = app.clone();
            listeners.push(ListenerGuard::new(
                element,
                "click",
                true,
                move |event: Event| {
                    event.stop_propagation();
                    deliver(&app, &event, InputEvent::Control { control });
                },
            )?);
        }
    }

    Ok(listeners)
}

// =============================================================================
// Source images
// =============================================================================

fn source_of(event: &Event) -> Option<String> {
    let image = event.current_target()?.dyn_into::<HtmlImageElement>().ok()?;
    let src = image.current_src();
    if src.is_empty() {
        Some(image.src())
    } else {
        Some(src)
    }
}

fn bind_source_image(
    app: &Rc<App>,
    image: &HtmlImageElement,
) -> Result<Vec<ListenerGuard>, JsValue> {
    image.style().set_property("cursor", "zoom-in")?;
    let weak = Rc::downgrade(app);

    let on_click = weak.clone();
    let on_start = weak.clone();
    let on_move = weak.clone();
    let on_end = weak.clone();
    let on_cancel = weak;

    Ok(vec![
        ListenerGuard::new(image, "click", true, move |event: Event| {
            let Some(app) = on_click.upgrade() else {
                return;
            };
            let outcome = app.with_lightbox(|lightbox| lightbox.activation_click());
            if outcome == Some(Activation::Open) {
                if let Some(src) = source_of(&event) {
                    app.open(&src);
                }
            }
        })?,
        ListenerGuard::new(image, "touchstart", true, move |event: Event| {
            let (Some(app), Some(touch)) = (on_start.upgrade(), event.dyn_ref::<TouchEvent>())
            else {
                return;
            };
            let touches = touch_points(&touch.touches());
            app.with_lightbox(|lightbox| lightbox.activation_touch_start(&touches));
        })?,
        ListenerGuard::new(image, "touchmove", true, move |event: Event| {
            let (Some(app), Some(touch)) = (on_move.upgrade(), event.dyn_ref::<TouchEvent>())
            else {
                return;
            };
            if let Some(position) = touch_points(&touch.touches()).first().copied() {
                app.with_lightbox(|lightbox| lightbox.activation_touch_move(position));
            }
        })?,
        ListenerGuard::new(image, "touchend", false, move |event: Event| {
            let (Some(app), Some(touch)) = (on_end.upgrade(), event.dyn_ref::<TouchEvent>())
            else {
                return;
            };
            let position = touch_points(&touch.changed_touches()).first().copied();
            let outcome = app.with_lightbox(|lightbox| lightbox.activation_touch_end(position));
            match outcome {
                Some(Activation::Open) => {
                    event.prevent_default();
                    if let Some(src) = source_of(&event) {
                        app.open(&src);
                    }
                }
                // the touch decided; no synthetic click
                Some(Activation::Scroll) => event.prevent_default(),
                _ => {}
            }
        })?,
        ListenerGuard::new(image, "touchcancel", true, move |_event: Event| {
            if let Some(app) = on_cancel.upgrade() {
                app.with_lightbox(|lightbox| lightbox.activation_touch_cancel());
            }
        })?,
    ])
}

/// Bind the lightbox to every image matching the configured selector.
pub fn install(config: ViewerConfig) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let images = document.query_selector_all(&config.activation_selector)?;
    let app = App::new(config);

    let mut bound = 0;
    for i in 0..images.length() {
        let Some(image) = images
            .item(i)
            .and_then(|node| node.dyn_into::<HtmlImageElement>().ok())
        else {
            continue;
        };
        let listeners = bind_source_image(&app, &image)?;
        app.source_listeners.borrow_mut().extend(listeners);
        bound += 1;
    }
    log::info!("Image viewer bound to {} images", bound);

    APP.with(|slot| *slot.borrow_mut() = Some(app));
    Ok(())
}

/// Open the viewer on the installed lightbox, if any.
pub fn open(src: &str) {
    let app = APP.with(|slot| slot.borrow().clone());
    match app {
        Some(app) => app.open(src),
        None => log::warn!("Image viewer not installed, cannot open {}", src),
    }
}
