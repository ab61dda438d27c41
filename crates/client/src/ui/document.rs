use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use serde::Serialize;

use super::{UiOp, UiPatch, UiPort};
use crate::nav::Browser;

/// Observable state of one element.
///
/// `visible` is `None` until something sets it (the element keeps
/// whatever display the markup gave it).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ElementState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub checked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub classes: BTreeSet<String>,
}

/// In-memory page model implementing [`UiPort`] and [`Browser`].
///
/// Elements spring into existence on first write. Browser side effects
/// (confirm prompts, clipboard, reloads) are recorded for inspection.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MemoryDocument {
    elements: BTreeMap<String, ElementState>,
    #[serde(skip)]
    confirm_answer: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    prompts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    clipboard: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    scheduled_reloads: Vec<Duration>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an input element's value.
    pub fn with_value(mut self, id: &str, value: impl Into<String>) -> Self {
        self.element_mut(id).value = Some(value.into());
        self
    }

    /// Answer every subsequent `confirm` dialog with `answer`.
    pub fn with_confirm_answer(mut self, answer: bool) -> Self {
        self.confirm_answer = answer;
        self
    }

    pub fn element(&self, id: &str) -> Option<&ElementState> {
        self.elements.get(id)
    }

    pub fn elements(&self) -> &BTreeMap<String, ElementState> {
        &self.elements
    }

    pub fn is_visible(&self, id: &str) -> Option<bool> {
        self.elements.get(id).and_then(|e| e.visible)
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.elements.get(id).map(|e| e.text.as_str())
    }

    pub fn is_checked(&self, id: &str) -> bool {
        self.elements.get(id).is_some_and(|e| e.checked)
    }

    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.elements
            .get(id)
            .is_some_and(|e| e.classes.contains(class))
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn clipboard(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }

    pub fn scheduled_reloads(&self) -> &[Duration] {
        &self.scheduled_reloads
    }

    /// Replay a recorded operation.
    pub fn apply(&mut self, op: &UiOp) {
        match op {
            UiOp::SetVisible { id, visible } => self.set_visible(id, *visible),
            UiOp::SetText { id, text } => self.set_text(id, text),
            UiOp::SetChecked { id, checked } => self.set_checked(id, *checked),
            UiOp::SetValue { id, value } => self.set_value(id, value),
            UiOp::AddClass { id, class } => self.add_class(id, class),
            UiOp::RemoveClass { id, class } => self.remove_class(id, class),
            UiOp::ToggleClass { id, class } => self.toggle_class(id, class),
        }
    }

    /// Replay every operation of a patch, in order.
    pub fn apply_patch(&mut self, patch: &UiPatch) {
        for op in patch.ops() {
            self.apply(op);
        }
    }

    fn element_mut(&mut self, id: &str) -> &mut ElementState {
        self.elements.entry(id.to_string()).or_default()
    }
}

impl UiPort for MemoryDocument {
    fn set_visible(&mut self, id: &str, visible: bool) {
        self.element_mut(id).visible = Some(visible);
    }

    fn set_text(&mut self, id: &str, text: &str) {
        self.element_mut(id).text = text.to_string();
    }

    fn set_checked(&mut self, id: &str, checked: bool) {
        self.element_mut(id).checked = checked;
    }

    fn set_value(&mut self, id: &str, value: &str) {
        self.element_mut(id).value = Some(value.to_string());
    }

    fn add_class(&mut self, id: &str, class: &str) {
        self.element_mut(id).classes.insert(class.to_string());
    }

    fn remove_class(&mut self, id: &str, class: &str) {
        self.element_mut(id).classes.remove(class);
    }

    fn toggle_class(&mut self, id: &str, class: &str) {
        let classes = &mut self.element_mut(id).classes;
        if !classes.remove(class) {
            classes.insert(class.to_string());
        }
    }

    fn value(&self, id: &str) -> Option<String> {
        self.elements.get(id).and_then(|e| e.value.clone())
    }
}

impl Browser for MemoryDocument {
    fn confirm(&mut self, message: &str) -> bool {
        self.prompts.push(message.to_string());
        self.confirm_answer
    }

    fn write_clipboard(&mut self, text: &str) {
        self.clipboard = Some(text.to_string());
    }

    fn schedule_reload(&mut self, delay: Duration) {
        self.scheduled_reloads.push(delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_class_flips() {
        let mut doc = MemoryDocument::new();
        doc.toggle_class(".main-navigation", "extended");
        assert!(doc.has_class(".main-navigation", "extended"));
        doc.toggle_class(".main-navigation", "extended");
        assert!(!doc.has_class(".main-navigation", "extended"));
    }

    #[test]
    fn replaying_a_patch_matches_direct_writes() {
        let mut patch = UiPatch::new();
        patch.set_visible("alert-ok", true);
        patch.set_text("alert-ok", "hello");
        patch.set_checked("r1", true);
        patch.set_value("id_amount_send", "500");
        patch.add_class("id_promocode", "is-valid");

        let mut replayed = MemoryDocument::new();
        replayed.apply_patch(&patch);

        let mut direct = MemoryDocument::new();
        direct.set_visible("alert-ok", true);
        direct.set_text("alert-ok", "hello");
        direct.set_checked("r1", true);
        direct.set_value("id_amount_send", "500");
        direct.add_class("id_promocode", "is-valid");

        assert_eq!(replayed.elements(), direct.elements());
    }

    #[test]
    fn unknown_elements_read_as_absent() {
        let doc = MemoryDocument::new().with_value("id_promocode", "X");
        assert_eq!(doc.value("id_promocode").as_deref(), Some("X"));
        assert_eq!(doc.value("id_default_label"), None);
        assert_eq!(doc.is_visible("alert-ok"), None);
        assert!(!doc.is_checked("anything"));
    }
}
