//! WebAssembly entry point.
//!
//! Reads the page's viewer settings, starts console logging at the configured
//! level and binds the lightbox to the page's images.

use folio_zoom::ViewerConfig;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::lightbox_dom;

/// Id of the optional `<script type="application/json">` holding viewer settings.
pub const CONFIG_SCRIPT_ID: &str = "folio-zoom-config";

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        web_sys::console::error_1(&"Image viewer: no document".into());
        return;
    };

    if document.ready_state() == "loading" {
        let callback = Closure::once_into_js(run);
        if let Err(e) =
            document.add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())
        {
            web_sys::console::error_2(&"Image viewer: cannot wait for document".into(), &e);
        }
    } else {
        run();
    }
}

/// Open the image viewer programmatically.
#[wasm_bindgen(js_name = openImageViewer)]
pub fn open_image_viewer(src: &str) {
    lightbox_dom::open(src);
}

fn run() {
    let (config, config_error) = match read_page_config() {
        Ok(config) => (config.unwrap_or_default(), None),
        Err(e) => (ViewerConfig::default(), Some(e)),
    };

    if let Err(e) = console_log::init_with_level(config.log_level.to_level()) {
        web_sys::console::warn_1(&format!("Image viewer: logger already set: {}", e).into());
    }
    if let Some(e) = config_error {
        log::warn!("Ignoring page config, using defaults: {}", e);
    }

    if let Err(e) = lightbox_dom::install(config) {
        log::error!("Image viewer unavailable: {:?}", e);
    }
}

fn read_page_config() -> folio_zoom::Result<Option<ViewerConfig>> {
    let Some(script) = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(CONFIG_SCRIPT_ID))
    else {
        return Ok(None);
    };
    let text = script.text_content().unwrap_or_default();
    if text.trim().is_empty() {
        return Ok(None);
    }
    ViewerConfig::from_json(&text).map(Some)
}
