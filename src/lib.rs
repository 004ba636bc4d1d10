//! Tab Sorter - Chrome Extension that sorts tabs by domain
//! Built with Rust + WASM + Yew

pub mod chrome;
pub mod collate;
pub mod domain;
pub mod errors;
pub mod events;
pub mod operations;
pub mod placer;
pub mod reconcile;
pub mod service;
pub mod settings;
pub mod tab_data;
pub mod ui;

#[cfg(test)]
mod testing;

use chrome::{ChromeBrowser, load_settings};
use events::{BrowserEvent, EventOutcome};
use reconcile::Reconciler;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export the domain resolver for JavaScript access
#[wasm_bindgen(js_name = effectiveDomain)]
pub fn effective_domain(url: &str) -> String {
    domain::effective_domain(url)
}

/// Sort a window; resolves to `{status, error?}`
#[wasm_bindgen(js_name = sortWindow)]
pub async fn sort_window(window_id: i32) -> Result<JsValue, JsValue> {
    let settings = load_settings().await;
    let result = Reconciler::new(&ChromeBrowser, &ChromeBrowser, &settings)
        .run(window_id)
        .await;
    to_js(&result)
}

/// Entry point for the background script's listeners
///
/// Resolves to the sort result for `sortCommand`, `undefined` otherwise.
#[wasm_bindgen(js_name = handleEvent)]
pub async fn handle_event(event: JsValue) -> Result<JsValue, JsValue> {
    let event: BrowserEvent = serde_wasm_bindgen::from_value(event)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse event: {:?}", e)))?;
    let settings = load_settings().await;

    match events::handle_event(&ChromeBrowser, &ChromeBrowser, &settings, event).await {
        EventOutcome::Sort(result) => to_js(&result),
        EventOutcome::Placement(_) | EventOutcome::Ignored => Ok(JsValue::UNDEFINED),
    }
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize: {:?}", e)))
}
