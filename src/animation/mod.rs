//! One-shot property animations and their speed settings.

/// Duration / angular-rate animation speed.
pub mod speed;
/// Cancellable, awaitable tween.
pub mod tween;

pub use speed::{AnimationSpeed, SpeedUnit};
pub use tween::{TickCallback, Tween, TweenOptions, TweenRange, TweenValues};
