//! Greeting banners for developers who open the console

use tracing::info;
use wasm_bindgen::JsValue;
use web_sys::{console, Window};

const BANNERS: &[(&str, &str)] = &[
    (
        "👋 Hello, curious developer!",
        "font-size: 20px; font-weight: bold; color: #2a9d8f;",
    ),
    ("Welcome to Studio Nivo", "font-size: 14px; color: #666;"),
    (
        "Built with Rust and WebAssembly",
        "font-size: 12px; color: #999;",
    ),
];

pub fn print_banners() {
    for (text, style) in BANNERS {
        console::log_2(
            &JsValue::from_str(&format!("%c{text}")),
            &JsValue::from_str(style),
        );
    }
}

pub fn note_reduced_motion(window: &Window) {
    let reduced = window
        .match_media("(prefers-reduced-motion: reduce)")
        .ok()
        .flatten()
        .is_some_and(|query| query.matches());
    if reduced {
        info!("Reduced motion mode active - animations simplified");
    }
}
