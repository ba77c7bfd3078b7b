//! folio - interactive image viewer for the portfolio site
//!
//! The viewer logic lives in [`folio_zoom`]. This crate binds it to the page
//! when compiled to WebAssembly, and provides a headless replay of recorded
//! input for native debugging.

pub mod replay;

pub use folio_zoom;

// WASM entry point and DOM binding
#[cfg(target_arch = "wasm32")]
mod dom_host;
#[cfg(target_arch = "wasm32")]
mod lightbox_dom;
#[cfg(target_arch = "wasm32")]
mod listener;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;
