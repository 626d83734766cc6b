//! Shared helpers: easing curves, angle and field-of-view math, and the
//! clock and deadline timers the gesture recognizer polls.

pub mod easing;
pub mod math;
pub mod timer;
