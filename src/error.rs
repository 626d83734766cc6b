//! Crate-level error types.

use std::fmt;

/// Errors produced by the swivel crate.
#[derive(Debug)]
pub enum SwivelError {
    /// Dynamic range is empty, or wrapping with a non-zero minimum.
    InvalidRange {
        /// Configured lower bound (must be 0 when wrapping).
        min: f64,
        /// Configured upper bound.
        max: f64,
    },
    /// Animation target is NaN or infinite.
    InvalidTarget {
        /// Which property (`yaw`, `pitch` or `zoom`).
        property: &'static str,
        /// Offending value.
        value: f64,
    },
    /// Easing name not recognized.
    UnknownEasing(String),
    /// Animation speed string could not be parsed.
    InvalidSpeed(String),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Generic I/O failure.
    Io(std::io::Error),
}

impl fmt::Display for SwivelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRange { min, max } => {
                write!(f, "invalid dynamic range [{min}, {max}]")
            }
            Self::InvalidTarget { property, value } => {
                write!(f, "invalid {property} target: {value}")
            }
            Self::UnknownEasing(name) => write!(f, "unknown easing: {name}"),
            Self::InvalidSpeed(value) => {
                write!(f, "invalid animation speed: {value}")
            }
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for SwivelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SwivelError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
