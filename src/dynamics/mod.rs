//! Velocity-seeking scalar controllers.
//!
//! A [`Dynamic`] is one bounded or wrapping value; a [`MultiDynamic`]
//! groups several under a single change callback. Both are advanced by the
//! host's per-frame tick and report whether anything moved.

/// Single bounded / wrapping value.
pub mod dynamic;
/// Named group of dynamics.
pub mod multi;

pub use dynamic::{Dynamic, DynamicConfig, DynamicMode, ValueCallback};
pub use multi::{MultiDynamic, Values, ValuesCallback};
