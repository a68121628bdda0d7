//! Studio Nivo page effects
//!
//! Client-side interactivity for the Studio Nivo portfolio page, compiled to
//! WebAssembly:
//! - persisted light/dark theme with an animated toggle
//! - smooth in-page anchor scrolling
//! - one-way fade-in of sections and skill tags
//! - navbar auto-hide and hero parallax
//! - decorative blobs that shy away from the pointer, pulse on click and
//!   drift with scroll
//!
//! The effect logic lives in [`core`] and runs natively as well; the browser
//! bindings are only built for `wasm32` with the `wasm` feature.

pub mod core;
pub mod error;

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
mod web;

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    // Initialize tracing for browser console
    tracing_wasm::set_as_global_default();

    web::start();
}
