//! WebAssembly entry points.
//!
//! Two ways to drive a portfolio from the browser: the handle-based JSON
//! functions below, where page script owns the DOM and executes the
//! returned commands itself, or [`start_dom_host`], which wires the
//! portfolio to the live document directly.

pub mod bridge;
#[cfg(target_arch = "wasm32")]
mod dom;

use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
pub use dom::{start_dom_host, stop_dom_host};

fn js_error(err: bridge::BridgeError) -> JsError {
    JsError::new(&err.to_string())
}

/// Create a portfolio from optional content and config JSON. Returns a
/// handle for the other calls.
#[wasm_bindgen]
pub fn create_portfolio(
    content_json: Option<String>,
    config_json: Option<String>,
) -> Result<usize, JsError> {
    bridge::create(content_json.as_deref(), config_json.as_deref()).map_err(js_error)
}

/// Tear down and release a portfolio. Returns its final commands as JSON.
#[wasm_bindgen]
pub fn destroy_portfolio(handle: usize) -> Result<String, JsError> {
    bridge::destroy(handle).map_err(js_error)
}

/// Mount the page. Returns host commands as JSON.
#[wasm_bindgen]
pub fn mount(handle: usize, now_ms: f64) -> Result<String, JsError> {
    bridge::mount(handle, now_ms).map_err(js_error)
}

#[wasm_bindgen]
pub fn teardown(handle: usize) -> Result<String, JsError> {
    bridge::teardown(handle).map_err(js_error)
}

/// Feed a `HostEvent` serialized as JSON.
#[wasm_bindgen]
pub fn dispatch(handle: usize, event_json: &str, now_ms: f64) -> Result<String, JsError> {
    bridge::dispatch(handle, event_json, now_ms).map_err(js_error)
}

#[wasm_bindgen]
pub fn pointer_move(handle: usize, x: f64, y: f64) -> Result<(), JsError> {
    bridge::pointer_move(handle, x, y).map_err(js_error)
}

#[wasm_bindgen]
pub fn scroll(handle: usize, offset: f64) -> Result<(), JsError> {
    bridge::scroll(handle, offset).map_err(js_error)
}

/// Deliver a batch of intersection entries, e.g.
/// `[{"id": "project-0", "is_intersecting": true, "ratio": 0.4}]`.
#[wasm_bindgen]
pub fn intersections(handle: usize, entries_json: &str) -> Result<(), JsError> {
    bridge::intersections(handle, entries_json).map_err(js_error)
}

#[wasm_bindgen]
pub fn key_down(handle: usize, key: &str, now_ms: f64) -> Result<String, JsError> {
    bridge::key_down(handle, key, now_ms).map_err(js_error)
}

#[wasm_bindgen]
pub fn tick(handle: usize, now_ms: f64) -> Result<String, JsError> {
    bridge::tick(handle, now_ms).map_err(js_error)
}

/// Activate a section and return the scroll command as JSON.
#[wasm_bindgen]
pub fn navigate(
    handle: usize,
    section: &str,
    offsets_json: &str,
    now_ms: f64,
) -> Result<String, JsError> {
    bridge::navigate(handle, section, offsets_json, now_ms).map_err(js_error)
}

#[wasm_bindgen]
pub fn open_preview(handle: usize, index: usize, now_ms: f64) -> Result<String, JsError> {
    bridge::open_preview(handle, index, now_ms).map_err(js_error)
}

/// `source` is one of `overlay`, `close_control`, `footer_button`,
/// `cancel_key`.
#[wasm_bindgen]
pub fn dismiss_preview(handle: usize, source: &str, now_ms: f64) -> Result<String, JsError> {
    bridge::dismiss_preview(handle, source, now_ms).map_err(js_error)
}

/// Current view state as JSON.
#[wasm_bindgen]
pub fn snapshot(handle: usize, scroll_height: f64, viewport_height: f64) -> Result<String, JsError> {
    bridge::snapshot(handle, scroll_height, viewport_height).map_err(js_error)
}

#[wasm_bindgen]
pub fn catalog(handle: usize) -> Result<String, JsError> {
    bridge::catalog(handle).map_err(js_error)
}
