//! Easing functions for animation interpolation.
//!
//! Every curve maps [0, 1] onto [0, 1] with `f(0) = 0` and `f(1) = 1`.
//! Curves can be picked by name (`"outQuad"`, `"inOutSine"`, ...) so option
//! files and API callers can refer to them as strings.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::error::SwivelError;

/// Easing function variants for animation curves.
#[derive(Clone, Copy, Default)]
pub enum Easing {
    /// Linear interpolation (no easing).
    #[default]
    Linear,
    /// Quadratic ease-in (slow start, fast end).
    InQuad,
    /// Quadratic ease-out (fast start, slow end).
    OutQuad,
    /// Quadratic ease-in-out.
    InOutQuad,
    /// Cubic ease-in.
    InCubic,
    /// Cubic ease-out.
    OutCubic,
    /// Cubic ease-in-out.
    InOutCubic,
    /// Quartic ease-in.
    InQuart,
    /// Quartic ease-out.
    OutQuart,
    /// Quartic ease-in-out.
    InOutQuart,
    /// Quintic ease-in.
    InQuint,
    /// Quintic ease-out.
    OutQuint,
    /// Quintic ease-in-out.
    InOutQuint,
    /// Sinusoidal ease-in.
    InSine,
    /// Sinusoidal ease-out.
    OutSine,
    /// Sinusoidal ease-in-out.
    InOutSine,
    /// Exponential ease-in.
    InExpo,
    /// Exponential ease-out.
    OutExpo,
    /// Exponential ease-in-out.
    InOutExpo,
    /// Circular ease-in.
    InCirc,
    /// Circular ease-out.
    OutCirc,
    /// Circular ease-in-out.
    InOutCirc,
    /// Caller-supplied curve.
    Custom(fn(f64) -> f64),
}

const NAMES: [(&str, Easing); 22] = [
    ("linear", Easing::Linear),
    ("inQuad", Easing::InQuad),
    ("outQuad", Easing::OutQuad),
    ("inOutQuad", Easing::InOutQuad),
    ("inCubic", Easing::InCubic),
    ("outCubic", Easing::OutCubic),
    ("inOutCubic", Easing::InOutCubic),
    ("inQuart", Easing::InQuart),
    ("outQuart", Easing::OutQuart),
    ("inOutQuart", Easing::InOutQuart),
    ("inQuint", Easing::InQuint),
    ("outQuint", Easing::OutQuint),
    ("inOutQuint", Easing::InOutQuint),
    ("inSine", Easing::InSine),
    ("outSine", Easing::OutSine),
    ("inOutSine", Easing::InOutSine),
    ("inExpo", Easing::InExpo),
    ("outExpo", Easing::OutExpo),
    ("inOutExpo", Easing::InOutExpo),
    ("inCirc", Easing::InCirc),
    ("outCirc", Easing::OutCirc),
    ("inOutCirc", Easing::InOutCirc),
];

impl Easing {
    /// Evaluate the easing function at time t.
    ///
    /// Input t is clamped to [0.0, 1.0].
    #[inline]
    pub fn evaluate(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => t * (2.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    (t - 1.0) * (2.0 * t - 2.0) * (2.0 * t - 2.0) + 1.0
                }
            }
            Self::InQuart => t.powi(4),
            Self::OutQuart => 1.0 - (t - 1.0).powi(4),
            Self::InOutQuart => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - 8.0 * (t - 1.0).powi(4)
                }
            }
            Self::InQuint => t.powi(5),
            Self::OutQuint => 1.0 + (t - 1.0).powi(5),
            Self::InOutQuint => {
                if t < 0.5 {
                    16.0 * t.powi(5)
                } else {
                    1.0 + 16.0 * (t - 1.0).powi(5)
                }
            }
            Self::InSine => 1.0 - (t * PI / 2.0).cos(),
            Self::OutSine => (t * PI / 2.0).sin(),
            Self::InOutSine => 0.5 - (PI * t).cos() / 2.0,
            Self::InExpo => {
                if t == 0.0 {
                    0.0
                } else {
                    2f64.powf(10.0 * (t - 1.0))
                }
            }
            Self::OutExpo => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - 2f64.powf(-10.0 * t)
                }
            }
            Self::InOutExpo => {
                if t == 0.0 || t == 1.0 {
                    t
                } else if t < 0.5 {
                    2f64.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2f64.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
            Self::InCirc => 1.0 - (1.0 - t * t).sqrt(),
            Self::OutCirc => (1.0 - (t - 1.0) * (t - 1.0)).sqrt(),
            Self::InOutCirc => {
                if t < 0.5 {
                    (1.0 - (1.0 - 4.0 * t * t).sqrt()) / 2.0
                } else {
                    let u = 2.0 * t - 2.0;
                    ((1.0 - u * u).sqrt() + 1.0) / 2.0
                }
            }
            Self::Custom(f) => f(t),
        }
    }

    /// Name accepted by [`FromStr`], `None` for custom curves.
    #[must_use]
    pub fn name(&self) -> Option<&'static str> {
        NAMES
            .iter()
            .find(|(_, easing)| {
                std::mem::discriminant(easing) == std::mem::discriminant(self)
                    && !matches!(self, Self::Custom(_))
            })
            .map(|(name, _)| *name)
    }
}

impl FromStr for Easing {
    type Err = SwivelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NAMES
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, easing)| *easing)
            .ok_or_else(|| SwivelError::UnknownEasing(s.to_owned()))
    }
}

impl fmt::Debug for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => f.write_str("custom"),
        }
    }
}
