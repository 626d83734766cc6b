//! Animation speed: either a fixed duration or an angular rate.

use std::f64::consts::TAU;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SwivelError;

/// Unit of an angular animation speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedUnit {
    /// Degrees per second (`dps`).
    DegreesPerSecond,
    /// Degrees per minute (`dpm`).
    DegreesPerMinute,
    /// Radians per second (`rdps`).
    RadiansPerSecond,
    /// Radians per minute (`rdpm`).
    RadiansPerMinute,
    /// Revolutions per second (`rps`).
    RevolutionsPerSecond,
    /// Revolutions per minute (`rpm`).
    RevolutionsPerMinute,
}

impl SpeedUnit {
    fn abbreviation(self) -> &'static str {
        match self {
            Self::DegreesPerSecond => "dps",
            Self::DegreesPerMinute => "dpm",
            Self::RadiansPerSecond => "rdps",
            Self::RadiansPerMinute => "rdpm",
            Self::RevolutionsPerSecond => "rps",
            Self::RevolutionsPerMinute => "rpm",
        }
    }

    fn parse(unit: &str) -> Option<Self> {
        Some(match unit {
            "dps" | "degrees per second" => Self::DegreesPerSecond,
            "dpm" | "degrees per minute" => Self::DegreesPerMinute,
            "rdps" | "radians per second" => Self::RadiansPerSecond,
            "rdpm" | "radians per minute" => Self::RadiansPerMinute,
            "rps" | "revolutions per second" => Self::RevolutionsPerSecond,
            "rpm" | "revolutions per minute" => Self::RevolutionsPerMinute,
            _ => return None,
        })
    }

    /// Radians covered per millisecond at `value` of this unit.
    fn radians_per_ms(self, value: f64) -> f64 {
        match self {
            Self::DegreesPerSecond => value.to_radians() / 1000.0,
            Self::DegreesPerMinute => value.to_radians() / 60_000.0,
            Self::RadiansPerSecond => value / 1000.0,
            Self::RadiansPerMinute => value / 60_000.0,
            Self::RevolutionsPerSecond => value * TAU / 1000.0,
            Self::RevolutionsPerMinute => value * TAU / 60_000.0,
        }
    }
}

/// How fast an [`animate`](crate::navigator::Navigator::animate) call
/// moves.
///
/// Serializes as its string form (`"1500"`, `"2rpm"`) so presets stay
/// readable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AnimationSpeed {
    /// Fixed duration regardless of the distance covered.
    Duration(Duration),
    /// Angular rate; the duration depends on the arc travelled.
    Rate {
        /// Magnitude in `unit`.
        value: f64,
        /// Unit of `value`.
        unit: SpeedUnit,
    },
}

impl AnimationSpeed {
    /// Duration needed to travel `angle` radians.
    #[must_use]
    pub fn duration_for(&self, angle: f64) -> Duration {
        match *self {
            Self::Duration(duration) => duration,
            Self::Rate { value, unit } => {
                let rate = unit.radians_per_ms(value).abs();
                if rate == 0.0 || !angle.is_finite() {
                    return Duration::ZERO;
                }
                Duration::try_from_secs_f64(angle.abs() / rate / 1000.0)
                    .unwrap_or(Duration::MAX)
            }
        }
    }
}

impl Default for AnimationSpeed {
    fn default() -> Self {
        Self::Rate {
            value: 2.0,
            unit: SpeedUnit::RevolutionsPerMinute,
        }
    }
}

impl fmt::Display for AnimationSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duration(duration) => {
                write!(f, "{}", duration.as_secs_f64() * 1000.0)
            }
            Self::Rate { value, unit } => {
                write!(f, "{value}{}", unit.abbreviation())
            }
        }
    }
}

impl From<AnimationSpeed> for String {
    fn from(speed: AnimationSpeed) -> Self {
        speed.to_string()
    }
}

impl TryFrom<String> for AnimationSpeed {
    type Error = SwivelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for AnimationSpeed {
    type Err = SwivelError;

    /// Accepts a bare number of milliseconds (`"1500"`) or a number followed
    /// by a unit (`"2rpm"`, `"30 dps"`, `"1 revolutions per minute"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || SwivelError::InvalidSpeed(s.to_owned());

        let split = s
            .char_indices()
            .find(|&(i, c)| {
                !(c.is_ascii_digit() || c == '.' || (i == 0 && c == '-'))
            })
            .map_or(s.len(), |(i, _)| i);
        let (number, unit) = s.split_at(split);
        let value: f64 = number.parse().map_err(|_| invalid())?;
        let unit = unit.trim();

        if unit.is_empty() {
            return Duration::try_from_secs_f64(value / 1000.0)
                .map(Self::Duration)
                .map_err(|_| invalid());
        }

        SpeedUnit::parse(unit)
            .map(|unit| Self::Rate { value, unit })
            .ok_or_else(invalid)
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;

    #[test]
    fn parses_durations_and_rates() {
        assert_eq!(
            "1500".parse::<AnimationSpeed>().unwrap(),
            AnimationSpeed::Duration(Duration::from_millis(1500))
        );
        assert_eq!(
            "2rpm".parse::<AnimationSpeed>().unwrap(),
            AnimationSpeed::Rate {
                value: 2.0,
                unit: SpeedUnit::RevolutionsPerMinute
            }
        );
        assert_eq!(
            " 30 degrees per second ".parse::<AnimationSpeed>().unwrap(),
            AnimationSpeed::Rate {
                value: 30.0,
                unit: SpeedUnit::DegreesPerSecond
            }
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!("fast".parse::<AnimationSpeed>().is_err());
        assert!("10 furlongs".parse::<AnimationSpeed>().is_err());
        assert!("-5".parse::<AnimationSpeed>().is_err());
    }

    #[test]
    fn rate_converts_to_duration() {
        // half a turn at 1 rpm is 30 s
        let speed = AnimationSpeed::Rate {
            value: 1.0,
            unit: SpeedUnit::RevolutionsPerMinute,
        };
        let d = speed.duration_for(PI);
        assert!((d.as_secs_f64() - 30.0).abs() < 1e-6);

        // 90° at 90 dps is 1 s
        let speed: AnimationSpeed = "90dps".parse().unwrap();
        let d = speed.duration_for(PI / 2.0);
        assert!((d.as_secs_f64() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn display_parses_back() {
        for text in ["1500", "2rpm", "30dps", "0.5rdps"] {
            let speed: AnimationSpeed = text.parse().unwrap();
            assert_eq!(speed.to_string(), text);
        }
    }

    #[test]
    fn zero_angle_or_rate_is_instant() {
        let speed: AnimationSpeed = "2rpm".parse().unwrap();
        assert_eq!(speed.duration_for(0.0), Duration::ZERO);
        let still = AnimationSpeed::Rate {
            value: 0.0,
            unit: SpeedUnit::DegreesPerSecond,
        };
        assert_eq!(still.duration_for(1.0), Duration::ZERO);
    }
}
