//! Input handling: event types, timing helpers and the gesture recognizer
//! that turns raw pointer, touch, wheel and keyboard events into camera
//! motion.

/// Click / double-click pairing.
pub mod click;
/// Platform-agnostic input and output events.
pub mod event;
/// Windowed pointer history for release velocity.
pub mod history;
/// Bindable key actions.
pub mod keyboard;
/// Minimum-duration key press helper.
pub mod press;
/// Gesture state machine.
pub mod recognizer;
/// Conversions from DOM events.
#[cfg(feature = "web")]
pub mod web;

pub use event::{ClickData, Hint, InputEvent, MouseButton, ViewerEvent};
pub use keyboard::KeyAction;
pub use recognizer::{GestureRecognizer, GestureTimer, KeyTarget, Step};
