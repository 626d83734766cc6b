use serde::{Deserialize, Serialize};

/// Viewer actions that can be bound to keys.
///
/// Serde uses `snake_case` strings so presets stay readable; a command is a
/// one-entry table:
/// ```toml
/// [keybindings.bindings]
/// ArrowLeft = "rotate_left"
/// PageUp = "zoom_in"
/// f = { command = "toggle_fullscreen" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Roll pitch upwards while held.
    RotateUp,
    /// Roll pitch downwards while held.
    RotateDown,
    /// Roll yaw to the right while held.
    RotateRight,
    /// Roll yaw to the left while held.
    RotateLeft,
    /// Roll the zoom level up while held.
    ZoomIn,
    /// Roll the zoom level down while held.
    ZoomOut,
    /// One-shot host command, reported as
    /// [`ViewerEvent::KeyCommand`](super::ViewerEvent::KeyCommand).
    Command(String),
}

impl KeyAction {
    /// Whether the action moves the view (yaw/pitch) rather than the zoom.
    #[must_use]
    pub fn is_rotation(&self) -> bool {
        matches!(
            self,
            Self::RotateUp
                | Self::RotateDown
                | Self::RotateRight
                | Self::RotateLeft
        )
    }
}
