use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::UiPort;

/// One recorded UI mutation, in the JSON form the page shim understands:
/// `{"op": "set_visible", "id": "alert-ok", "visible": true}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum UiOp {
    SetVisible { id: String, visible: bool },
    SetText { id: String, text: String },
    SetChecked { id: String, checked: bool },
    SetValue { id: String, value: String },
    AddClass { id: String, class: String },
    RemoveClass { id: String, class: String },
    ToggleClass { id: String, class: String },
}

/// A [`UiPort`] that records operations instead of performing them.
///
/// Reads are answered from values seeded by the caller (the shim passes
/// in the inputs it read from the DOM) and from earlier `set_value` calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UiPatch {
    ops: Vec<UiOp>,
    #[serde(skip)]
    values: HashMap<String, String>,
}

impl UiPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the value of an input element for later reads.
    pub fn with_value(mut self, id: &str, value: impl Into<String>) -> Self {
        self.values.insert(id.to_string(), value.into());
        self
    }

    pub fn ops(&self) -> &[UiOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<UiOp> {
        self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl UiPort for UiPatch {
    fn set_visible(&mut self, id: &str, visible: bool) {
        self.ops.push(UiOp::SetVisible {
            id: id.to_string(),
            visible,
        });
    }

    fn set_text(&mut self, id: &str, text: &str) {
        self.ops.push(UiOp::SetText {
            id: id.to_string(),
            text: text.to_string(),
        });
    }

    fn set_checked(&mut self, id: &str, checked: bool) {
        self.ops.push(UiOp::SetChecked {
            id: id.to_string(),
            checked,
        });
    }

    fn set_value(&mut self, id: &str, value: &str) {
        self.values.insert(id.to_string(), value.to_string());
        self.ops.push(UiOp::SetValue {
            id: id.to_string(),
            value: value.to_string(),
        });
    }

    fn add_class(&mut self, id: &str, class: &str) {
        self.ops.push(UiOp::AddClass {
            id: id.to_string(),
            class: class.to_string(),
        });
    }

    fn remove_class(&mut self, id: &str, class: &str) {
        self.ops.push(UiOp::RemoveClass {
            id: id.to_string(),
            class: class.to_string(),
        });
    }

    fn toggle_class(&mut self, id: &str, class: &str) {
        self.ops.push(UiOp::ToggleClass {
            id: id.to_string(),
            class: class.to_string(),
        });
    }

    fn value(&self, id: &str) -> Option<String> {
        self.values.get(id).cloned()
    }
}
