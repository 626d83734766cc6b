use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::input::KeyAction;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
/// Keyboard bindings mapping key names to actions.
///
/// Key names follow the DOM `KeyboardEvent.key` values (`"ArrowUp"`,
/// `"PageDown"`, `"+"`). Several keys may share one action.
pub struct KeybindingOptions {
    /// Maps key name → action.
    pub bindings: HashMap<String, KeyAction>,
}

impl Default for KeybindingOptions {
    fn default() -> Self {
        let bindings = HashMap::from([
            ("ArrowUp".into(), KeyAction::RotateUp),
            ("ArrowDown".into(), KeyAction::RotateDown),
            ("ArrowRight".into(), KeyAction::RotateRight),
            ("ArrowLeft".into(), KeyAction::RotateLeft),
            ("PageUp".into(), KeyAction::ZoomIn),
            ("PageDown".into(), KeyAction::ZoomOut),
            ("+".into(), KeyAction::ZoomIn),
            ("-".into(), KeyAction::ZoomOut),
        ]);
        Self { bindings }
    }
}

impl KeybindingOptions {
    /// Look up the action for a key name.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&KeyAction> {
        self.bindings.get(key)
    }

    /// Bind `key` to `action`, replacing any previous binding of that key.
    pub fn bind(&mut self, key: impl Into<String>, action: KeyAction) {
        let _ = self.bindings.insert(key.into(), action);
    }

    /// Remove the binding of `key`. Returns the action it had.
    pub fn unbind(&mut self, key: &str) -> Option<KeyAction> {
        self.bindings.remove(key)
    }
}
