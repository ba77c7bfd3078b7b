//! [`Host`] implementation over the real document.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use folio_zoom::constants::{CLASS_NO_SCROLL, CLASS_VISIBLE};
use folio_zoom::{
    ElementSpec, Frame, FrameId, GlobalListener, Host, Insets, OverlayLayout, Part, Rectangle,
    Result, ViewTree, ViewerError,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, EventTarget, HtmlElement, Window};

use crate::lightbox_dom::{self, App};
use crate::listener::ListenerGuard;

fn host_error(context: &str, error: JsValue) -> ViewerError {
    ViewerError::Host(format!("{}: {:?}", context, error))
}

/// Elements of the mounted overlay, addressed by [`Part`].
pub struct Mounted {
    parts: HashMap<Part, HtmlElement>,
    /// Element-level listeners, released with the elements
    _listeners: Vec<ListenerGuard>,
}

impl Mounted {
    pub fn part(&self, part: Part) -> Option<&HtmlElement> {
        self.parts.get(&part)
    }

    fn overlay(&self) -> Option<&HtmlElement> {
        self.part(Part::Overlay)
    }
}

/// Document host for one viewer.
pub struct DomHost {
    app: Weak<App>,
    window: Window,
    document: Document,
    mounted: Option<Mounted>,
    /// Frame requested and not yet run
    pending_frame: Rc<Cell<Option<FrameId>>>,
    frame_callback: Option<Closure<dyn FnMut(f64)>>,
}

impl DomHost {
    pub fn new(app: Weak<App>) -> std::result::Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let pending_frame: Rc<Cell<Option<FrameId>>> = Rc::new(Cell::new(None));
        let pending_clone = Rc::clone(&pending_frame);
        let app_clone = app.clone();
        let frame_callback = Closure::wrap(Box::new(move |_timestamp: f64| {
            let Some(id) = pending_clone.take() else {
                return;
            };
            if let Some(app) = app_clone.upgrade() {
                app.on_animation_frame(id);
            }
        }) as Box<dyn FnMut(f64)>);

        Ok(Self {
            app,
            window,
            document,
            mounted: None,
            pending_frame,
            frame_callback: Some(frame_callback),
        })
    }

    /// Measure the mounted overlay: its box and the padding around the stage.
    pub fn measure_layout(&self) -> Option<OverlayLayout> {
        let overlay = self.mounted.as_ref()?.overlay()?;
        let rect = overlay.get_bounding_client_rect();
        let padding = self
            .window
            .get_computed_style(overlay)
            .ok()
            .flatten()
            .map(|style| {
                let px = |name: &str| {
                    style
                        .get_property_value(name)
                        .ok()
                        .and_then(|value| value.trim_end_matches("px").trim().parse::<f64>().ok())
                        .unwrap_or(0.0)
                };
                Insets::new(
                    px("padding-top"),
                    px("padding-right"),
                    px("padding-bottom"),
                    px("padding-left"),
                )
            })
            .unwrap_or_default();
        Some(OverlayLayout::new(
            Rectangle::new(rect.x(), rect.y(), rect.width(), rect.height()),
            padding,
            viewport_width(&self.window),
        ))
    }

    fn build(&self, spec: &ElementSpec, parts: &mut HashMap<Part, HtmlElement>) -> Result<HtmlElement> {
        let element: HtmlElement = self
            .document
            .create_element(spec.tag)
            .map_err(|e| host_error("create element", e))?
            .dyn_into()
            .map_err(|_| ViewerError::Host(format!("<{}> is not an HTML element", spec.tag)))?;

        for class in &spec.classes {
            element
                .class_list()
                .add_1(class)
                .map_err(|e| host_error("add class", e))?;
        }
        for (name, value) in &spec.attributes {
            element
                .set_attribute(name, value)
                .map_err(|e| host_error("set attribute", e))?;
        }
        if let Some(text) = &spec.text {
            element.set_text_content(Some(text));
        }
        for child in &spec.children {
            let child = self.build(child, parts)?;
            element
                .append_child(&child)
                .map_err(|e| host_error("append child", e))?;
        }
        if let Some(part) = spec.part {
            parts.insert(part, element.clone());
        }
        Ok(element)
    }

    fn body(&self) -> Option<HtmlElement> {
        self.document.body()
    }
}

/// Layout of a bare viewport, used before the overlay can be measured.
pub fn viewport_layout(window: &Window) -> OverlayLayout {
    let height = window
        .inner_height()
        .ok()
        .and_then(|h| h.as_f64())
        .unwrap_or(0.0);
    OverlayLayout::viewport(viewport_width(window), height)
}

fn viewport_width(window: &Window) -> f64 {
    window
        .inner_width()
        .ok()
        .and_then(|w| w.as_f64())
        .unwrap_or(0.0)
}

impl Host for DomHost {
    type Subscription = ListenerGuard;

    fn mount(&mut self, tree: &ViewTree) -> Result<()> {
        let body = self
            .body()
            .ok_or_else(|| ViewerError::Host("document has no body".to_string()))?;

        let mut parts = HashMap::new();
        let overlay = self.build(&tree.root, &mut parts)?;
        let listeners = lightbox_dom::overlay_listeners(&self.app, &parts)
            .map_err(|e| host_error("bind overlay listeners", e))?;
        body.append_child(&overlay)
            .map_err(|e| host_error("append overlay", e))?;

        self.mounted = Some(Mounted {
            parts,
            _listeners: listeners,
        });
        Ok(())
    }

    fn unmount(&mut self) {
        if let Some(mounted) = self.mounted.take() {
            if let Some(overlay) = mounted.overlay() {
                overlay.remove();
            }
        }
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        if let Some(body) = self.body() {
            if let Err(e) = body.class_list().toggle_with_force(CLASS_NO_SCROLL, locked) {
                log::warn!("Failed to toggle scroll lock: {:?}", e);
            }
        }
    }

    fn set_visible(&mut self, visible: bool) {
        let Some(overlay) = self.mounted.as_ref().and_then(|m| m.overlay()) else {
            return;
        };
        if let Err(e) = overlay.class_list().toggle_with_force(CLASS_VISIBLE, visible) {
            log::warn!("Failed to toggle overlay visibility: {:?}", e);
        }
    }

    fn apply(&mut self, frame: &Frame) {
        let Some(mounted) = self.mounted.as_ref() else {
            return;
        };
        let set = |element: Option<&HtmlElement>, property: &str, value: &str| {
            if let Some(element) = element {
                if let Err(e) = element.style().set_property(property, value) {
                    log::warn!("Failed to set {}: {:?}", property, e);
                }
            }
        };
        set(
            mounted.part(Part::Stage),
            "transform",
            &frame.stage_transform(),
        );
        set(
            mounted.part(Part::Image),
            "transform",
            &frame.image_transform(),
        );
        set(mounted.part(Part::Stage), "cursor", frame.cursor.css());
        if let Some(label) = mounted.part(Part::ZoomLabel) {
            label.set_text_content(Some(&frame.zoom_label()));
        }
    }

    fn request_frame(&mut self) -> Result<FrameId> {
        let callback = self
            .frame_callback
            .as_ref()
            .ok_or_else(|| ViewerError::Host("frame callback released".to_string()))?;
        let id = self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map_err(|e| host_error("requestAnimationFrame", e))?;
        self.pending_frame.set(Some(id));
        Ok(id)
    }

    fn cancel_frame(&mut self, id: FrameId) {
        if let Err(e) = self.window.cancel_animation_frame(id) {
            log::debug!("cancelAnimationFrame({}) failed: {:?}", id, e);
        }
        if self.pending_frame.get() == Some(id) {
            self.pending_frame.set(None);
        }
    }

    fn subscribe(&mut self, listener: GlobalListener) -> Result<Self::Subscription> {
        let target: EventTarget = match listener {
            GlobalListener::KeyDown => self.document.clone().into(),
            GlobalListener::MouseMove | GlobalListener::MouseUp | GlobalListener::Resize => {
                self.window.clone().into()
            }
        };
        // keydown may suppress arrow-key scrolling
        let passive = !matches!(listener, GlobalListener::KeyDown);
        ListenerGuard::new(
            &target,
            listener.event_type(),
            passive,
            lightbox_dom::global_handler(&self.app, listener),
        )
        .map_err(|e| host_error("addEventListener", e))
    }
}

impl Drop for DomHost {
    fn drop(&mut self) {
        self.unmount();
        if let Some(callback) = self.frame_callback.take() {
            wasm_bindgen_futures::spawn_local(async move {
                drop(callback);
            });
        }
    }
}

/// True when `element` is, or sits inside, something matching `selector`.
pub fn within(element: &Element, selector: &str) -> bool {
    matches!(element.closest(selector), Ok(Some(_)))
}
