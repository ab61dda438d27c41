//! UI port: the page elements verifiers are allowed to touch.
//!
//! Verifiers mutate the page only through [`UiPort`]. Two implementations
//! ship with the crate:
//! - [`UiPatch`]: records operations for a JS shim to replay on the DOM
//! - [`MemoryDocument`]: an in-memory element model (tests, CLI reports)
//!
//! Element ids are a contract with the server-rendered markup; renaming
//! either side breaks it silently, since writes to a missing element are
//! no-ops in the browser.

mod document;
mod patch;

pub use document::{ElementState, MemoryDocument};
pub use patch::{UiOp, UiPatch};

/// Named setters and getters over page elements, addressed by id (or by
/// selector for the navigation helpers).
pub trait UiPort {
    fn set_visible(&mut self, id: &str, visible: bool);
    fn set_text(&mut self, id: &str, text: &str);
    fn set_checked(&mut self, id: &str, checked: bool);
    fn set_value(&mut self, id: &str, value: &str);
    fn add_class(&mut self, id: &str, class: &str);
    fn remove_class(&mut self, id: &str, class: &str);
    fn toggle_class(&mut self, id: &str, class: &str);
    /// Current value of an input element, `None` when there is no such element.
    fn value(&self, id: &str) -> Option<String>;
}

/// Stable element ids shared with the page templates.
pub mod ids {
    /// Confirmation panel ("participant found").
    pub const ALERT_OK: &str = "alert-ok";
    /// Error panel carrying the server's reason text.
    pub const ALERT_ERROR: &str = "alert-error";
    /// Result-entry form revealed once a PIN matches.
    pub const ENTER_RESULT_FORM: &str = "enter-result-form";
    pub const PROMOCODE: &str = "id_promocode";
    /// Displayed price.
    pub const AMOUNT: &str = "id_amount";
    /// Hidden input submitting the price.
    pub const AMOUNT_SEND: &str = "id_amount_send";
    pub const SPINNER: &str = "id_spinner";
    pub const DEFAULT_LABEL: &str = "id_default_label";
    /// Hidden input submitting the payment label.
    pub const LABEL_SEND: &str = "id_label_send";

    /// Radio for one of the three simple markers (`choice` 0, 1, 2 for
    /// `-`, `F`, `RP`): `id_accents-<key>-accent_<choice + 1>`.
    pub fn simple_accent(key: &str, choice: usize) -> String {
        format!("id_accents-{}-accent_{}", key, choice + 1)
    }

    /// Radio for a positional rank 0..=2: `id_accents-<key>-top_<rank>`.
    pub fn ranked_accent(key: &str, rank: usize) -> String {
        format!("id_accents-{}-top_{}", key, rank)
    }

    /// French scoring `top` input: `id_accents-<key>-top`.
    pub fn french_top(key: &str) -> String {
        format!("id_accents-{}-top", key)
    }

    /// French scoring `zone` input: `id_accents-<key>-zone`.
    pub fn french_zone(key: &str) -> String {
        format!("id_accents-{}-zone", key)
    }
}
