//! Browser bindings for the podium page verifiers.
//!
//! The JS shim owns the DOM and `fetch`; Rust decides what to request and
//! how the page changes. Every export takes and returns JSON strings, and
//! page changes come back as a `patch`: a list of UI operations for the
//! shim to replay in order. Failures are `{"error": "..."}`.
//!
//! A PIN check from the shim's side:
//! 1. `pin_request(handle, {"event_id", "pin"})` → apply `patch`; if `url`
//!    is non-null, fetch it
//! 2. `pin_response(handle, {"token", "status", "body"})` (or `{"token",
//!    "error"}` when the fetch threw) → apply `patch`

use podium_client::{chart, nav, ChartKind, Platform};
use podium_interchange::chart_data_from_json_str;
use slab::Slab;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;

mod session;

use session::{patch_with, PinInput, PromoInput, ResponseInput, Session, SessionConfig};

thread_local! {
    static SESSIONS: RefCell<Slab<Session>> = const { RefCell::new(Slab::new()) };
}

fn error_json(msg: &str) -> String {
    serde_json::json!({ "error": msg }).to_string()
}

fn with_session<F>(handle: u32, f: F) -> String
where
    F: FnOnce(&mut Session) -> serde_json::Value,
{
    SESSIONS.with(|sessions| {
        let mut sessions = sessions.borrow_mut();
        match sessions.get_mut(handle as usize) {
            Some(session) => f(session).to_string(),
            None => error_json(&format!("invalid session handle: {}", handle)),
        }
    })
}

fn parse_input<T: serde::de::DeserializeOwned>(json: &str, what: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("invalid {}: {}", what, e))
}

// ── Sessions ────────────────────────────────────────────────────────

/// `{"base_url": "...", "messages": {...}}` → `{"handle": n}`.
#[wasm_bindgen]
pub fn create_session(config_json: &str) -> String {
    let config: SessionConfig = match parse_input(config_json, "session config") {
        Ok(c) => c,
        Err(e) => return error_json(&e),
    };

    let session = match Session::new(config) {
        Ok(s) => s,
        Err(e) => return error_json(&e),
    };

    let handle = SESSIONS.with(|sessions| sessions.borrow_mut().insert(session));
    serde_json::json!({ "handle": handle }).to_string()
}

#[wasm_bindgen]
pub fn free_session(handle: u32) {
    SESSIONS.with(|sessions| {
        let mut sessions = sessions.borrow_mut();
        if sessions.contains(handle as usize) {
            sessions.remove(handle as usize);
        }
    });
}

// ── Verifiers ───────────────────────────────────────────────────────

#[wasm_bindgen]
pub fn pin_request(handle: u32, input_json: &str) -> String {
    let input: PinInput = match parse_input(input_json, "pin request") {
        Ok(i) => i,
        Err(e) => return error_json(&e),
    };
    with_session(handle, |session| session.pin_request(input))
}

#[wasm_bindgen]
pub fn pin_response(handle: u32, response_json: &str) -> String {
    let input: ResponseInput = match parse_input(response_json, "pin response") {
        Ok(i) => i,
        Err(e) => return error_json(&e),
    };
    with_session(handle, |session| session.pin_response(input))
}

#[wasm_bindgen]
pub fn promo_request(handle: u32, input_json: &str) -> String {
    let input: PromoInput = match parse_input(input_json, "promo request") {
        Ok(i) => i,
        Err(e) => return error_json(&e),
    };
    with_session(handle, |session| session.promo_request(input))
}

#[wasm_bindgen]
pub fn promo_response(handle: u32, response_json: &str) -> String {
    let input: ResponseInput = match parse_input(response_json, "promo response") {
        Ok(i) => i,
        Err(e) => return error_json(&e),
    };
    with_session(handle, |session| session.promo_response(input))
}

// ── Charts ──────────────────────────────────────────────────────────

/// `kind` is `"bar"` or `"doughnut"`; `data_json` is `{labels, data}`.
#[wasm_bindgen]
pub fn chart_config(kind: &str, data_json: &str) -> String {
    let kind: ChartKind = match kind.parse() {
        Ok(k) => k,
        Err(e) => return error_json(&e),
    };

    match chart_data_from_json_str(data_json) {
        Ok(data) => chart::chart_config(kind, &data).to_string(),
        Err(e) => error_json(&format!("invalid chart data: {}", e)),
    }
}

#[wasm_bindgen]
pub fn chart_defaults() -> String {
    chart::chart_defaults().to_string()
}

// ── Navigation ──────────────────────────────────────────────────────

/// Patch toggling the navigation panel.
#[wasm_bindgen]
pub fn toggle_navigation() -> String {
    patch_with(nav::toggle_navigation).to_string()
}

/// `{"platform": "platform-...", "patch": [...]}` for a `User-Agent`.
#[wasm_bindgen]
pub fn platform_class(user_agent: &str) -> String {
    let platform = Platform::detect(user_agent);
    serde_json::json!({
        "platform": platform.class_name(),
        "patch": patch_with(|ui| nav::apply_platform_class(ui, platform)),
    })
    .to_string()
}

/// Delay before a live results page reloads itself.
#[wasm_bindgen]
pub fn reload_delay_ms() -> u32 {
    nav::RELOAD_DELAY.as_millis() as u32
}
