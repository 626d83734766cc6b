use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// When keyboard control is active.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum KeyboardMode {
    /// From construction on.
    Always,
    /// Only while the viewer is fullscreen.
    #[default]
    Fullscreen,
    /// Never, unless the host starts it explicitly.
    Disabled,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Controls", inline)]
#[serde(default)]
/// Pointer, touch, wheel and keyboard behavior.
pub struct ControlOptions {
    /// Keep moving after a drag is released.
    #[schemars(title = "Move Inertia")]
    pub move_inertia: bool,
    /// Single-finger touch does not pan; a hint asks for two fingers.
    #[schemars(title = "Two-Finger Pan")]
    pub touchmove_two_fingers: bool,
    /// Zoom with the mouse wheel.
    #[schemars(title = "Mouse Wheel")]
    pub mousewheel: bool,
    /// Wheel zoom only while Ctrl is held; a hint is shown otherwise.
    #[schemars(title = "Wheel Needs Ctrl")]
    pub mousewheel_ctrl_key: bool,
    /// Keyboard activation mode.
    #[schemars(title = "Keyboard")]
    pub keyboard: KeyboardMode,
    /// Distance in device pixels a press must travel to become a drag.
    #[schemars(title = "Move Threshold", range(min = 1.0, max = 20.0), extend("step" = 1.0))]
    pub move_threshold: f64,
}

impl Default for ControlOptions {
    fn default() -> Self {
        Self {
            move_inertia: true,
            touchmove_two_fingers: false,
            mousewheel: true,
            mousewheel_ctrl_key: false,
            keyboard: KeyboardMode::default(),
            move_threshold: 4.0,
        }
    }
}
