//! A single bounded or wrapping value with velocity-seeking motion.

use std::fmt;
use std::time::Duration;

use crate::error::SwivelError;
use crate::util::math::wrap;

/// Change callback of a [`Dynamic`].
pub type ValueCallback = Box<dyn FnMut(f64)>;

/// Motion mode of a [`Dynamic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DynamicMode {
    /// Decelerate to rest; no target pursued.
    Stop,
    /// Move indefinitely in one direction.
    Infinite,
    /// Seek a target, braking automatically on approach.
    Position,
}

/// Range and initial value of a [`Dynamic`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicConfig {
    /// Lower bound. Must be 0 when `wrap` is set.
    pub min: f64,
    /// Upper bound (exclusive when wrapping).
    pub max: f64,
    /// Initial value, normalized into the range.
    pub default_value: f64,
    /// Wrap around `[0, max)` instead of clamping.
    pub wrap: bool,
}

/// Bounded / wrapping scalar advanced once per frame.
///
/// Three modes: [`Stop`](DynamicMode::Stop) brakes to rest,
/// [`Infinite`](DynamicMode::Infinite) rolls at constant speed and
/// [`Position`](DynamicMode::Position) seeks a target. Speed ramps up and
/// down at `2 · speed · speed_mult` units/s², and seeking switches to
/// braking once the remaining distance is within
/// `current_speed² / (4 · speed · speed_mult)`.
pub struct Dynamic {
    min: f64,
    max: f64,
    wrap: bool,
    mode: DynamicMode,
    speed: f64,
    speed_mult: f64,
    current_speed: f64,
    target: f64,
    current: f64,
    callback: Option<ValueCallback>,
}

impl Dynamic {
    /// Dynamic reporting every change to `callback`. The callback also
    /// receives the initial value.
    pub fn new(
        callback: impl FnMut(f64) + 'static,
        config: DynamicConfig,
    ) -> Result<Self, SwivelError> {
        let mut dynamic = Self::build(config, Some(Box::new(callback)))?;
        dynamic.notify();
        Ok(dynamic)
    }

    /// Dynamic without its own callback, for use inside a
    /// [`MultiDynamic`](super::MultiDynamic).
    pub fn detached(config: DynamicConfig) -> Result<Self, SwivelError> {
        Self::build(config, None)
    }

    fn build(
        config: DynamicConfig,
        callback: Option<ValueCallback>,
    ) -> Result<Self, SwivelError> {
        let DynamicConfig {
            min,
            max,
            default_value,
            wrap,
        } = config;
        // `!(min <= max)` also rejects NaN bounds
        #[allow(clippy::neg_cmp_op_on_partial_ord)]
        let empty = !(min <= max);
        if empty || (wrap && (min != 0.0 || max <= 0.0)) {
            return Err(SwivelError::InvalidRange { min, max });
        }

        let mut dynamic = Self {
            min,
            max,
            wrap,
            mode: DynamicMode::Stop,
            speed: 0.0,
            speed_mult: 0.0,
            current_speed: 0.0,
            target: 0.0,
            current: 0.0,
            callback,
        };
        dynamic.current = dynamic.normalize(default_value);
        dynamic.target = dynamic.current;
        Ok(dynamic)
    }

    /// Current value.
    #[must_use]
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Value being sought (±∞ while rolling).
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Current motion mode.
    #[must_use]
    pub fn mode(&self) -> DynamicMode {
        self.mode
    }

    /// Signed speed in units per second.
    #[must_use]
    pub fn current_speed(&self) -> f64 {
        self.current_speed
    }

    /// Whether the value is at rest with nothing left to do.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.mode == DynamicMode::Stop && self.current_speed == 0.0
    }

    /// Set the base speed in units per second.
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    /// Seek `position` (wrapped or clamped into range).
    pub fn goto(&mut self, position: f64, speed_mult: f64) {
        if !position.is_finite() {
            log::warn!("ignoring non-finite dynamic target {position}");
            return;
        }
        self.mode = DynamicMode::Position;
        self.target = self.normalize(position);
        self.speed_mult = speed_mult;
    }

    /// Move by `delta`. Successive steps accumulate onto the in-flight
    /// target; a zero `speed_mult` applies the step instantly.
    pub fn step(&mut self, delta: f64, speed_mult: f64) {
        if speed_mult == 0.0 {
            let _ = self.set_value(self.current + delta);
        } else {
            if self.mode != DynamicMode::Position {
                self.target = self.current;
            }
            self.goto(self.target + delta, speed_mult);
        }
    }

    /// Move indefinitely, downwards when `invert` is set.
    pub fn roll(&mut self, invert: bool, speed_mult: f64) {
        self.mode = DynamicMode::Infinite;
        self.target = if invert {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        self.speed_mult = speed_mult;
    }

    /// Brake to rest.
    pub fn stop(&mut self) {
        self.mode = DynamicMode::Stop;
    }

    /// Snap to `value` and halt. Returns whether the value changed; the
    /// callback only runs when it did.
    pub fn set_value(&mut self, value: f64) -> bool {
        if value.is_nan() {
            log::warn!("ignoring NaN dynamic value");
            return false;
        }
        self.target = self.normalize(value);
        self.mode = DynamicMode::Stop;
        self.current_speed = 0.0;

        if self.target == self.current {
            return false;
        }
        self.current = self.target;
        self.notify();
        true
    }

    /// Advance by one frame. Returns whether the value changed.
    pub fn update(&mut self, elapsed: Duration) -> bool {
        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        let mut current = self.current;

        if self.mode == DynamicMode::Position {
            // go the short way around instead of crossing the origin
            if self.wrap && (self.target - current).abs() > self.max / 2.0 {
                current = if current < self.target {
                    current + self.max
                } else {
                    current - self.max
                };
            }

            let dst_stop = (self.current_speed * self.current_speed)
                / (self.speed * self.speed_mult * 4.0);
            if (self.target - current).abs() <= dst_stop {
                self.mode = DynamicMode::Stop;
            }
        }

        let mut target_speed = if self.mode == DynamicMode::Stop {
            0.0
        } else {
            self.speed * self.speed_mult
        };
        if self.target < current {
            target_speed = -target_speed;
        }

        let ramp = (elapsed_ms / 1000.0) * self.speed * self.speed_mult * 2.0;
        if self.current_speed < target_speed {
            self.current_speed = target_speed.min(self.current_speed + ramp);
        } else if self.current_speed > target_speed {
            self.current_speed = target_speed.max(self.current_speed - ramp);
        }

        if self.current_speed == 0.0 {
            return false;
        }
        let moved = current + (self.current_speed * elapsed_ms) / 1000.0;
        let next = if current > self.target {
            self.target.max(moved)
        } else if current < self.target {
            self.target.min(moved)
        } else {
            return false;
        };

        let next = self.normalize(next);
        if next == self.current {
            return false;
        }
        self.current = next;
        self.notify();
        true
    }

    fn normalize(&self, value: f64) -> f64 {
        if self.wrap {
            wrap(value, self.max)
        } else {
            value.clamp(self.min, self.max)
        }
    }

    fn notify(&mut self) {
        if let Some(cb) = self.callback.as_mut() {
            cb(self.current);
        }
    }
}

impl fmt::Debug for Dynamic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dynamic")
            .field("min", &self.min)
            .field("max", &self.max)
            .field("wrap", &self.wrap)
            .field("mode", &self.mode)
            .field("speed", &self.speed)
            .field("speed_mult", &self.speed_mult)
            .field("current_speed", &self.current_speed)
            .field("target", &self.target)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::f64::consts::TAU;
    use std::rc::Rc;

    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn clamped(min: f64, max: f64, value: f64) -> Dynamic {
        Dynamic::detached(DynamicConfig {
            min,
            max,
            default_value: value,
            wrap: false,
        })
        .unwrap()
    }

    fn wrapping(value: f64) -> Dynamic {
        Dynamic::detached(DynamicConfig {
            min: 0.0,
            max: TAU,
            default_value: value,
            wrap: true,
        })
        .unwrap()
    }

    fn recorded(dynamic_config: DynamicConfig) -> (Dynamic, Rc<RefCell<Vec<f64>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let dynamic =
            Dynamic::new(move |v| sink.borrow_mut().push(v), dynamic_config)
                .unwrap();
        (dynamic, seen)
    }

    #[test]
    fn wrap_with_nonzero_min_is_rejected() {
        let result = Dynamic::detached(DynamicConfig {
            min: -1.0,
            max: 1.0,
            default_value: 0.0,
            wrap: true,
        });
        assert!(matches!(
            result,
            Err(SwivelError::InvalidRange { min, .. }) if min == -1.0
        ));
    }

    #[test]
    fn empty_range_is_rejected() {
        assert!(Dynamic::detached(DynamicConfig {
            min: 2.0,
            max: 1.0,
            default_value: 0.0,
            wrap: false,
        })
        .is_err());
    }

    #[test]
    fn default_value_is_normalized_and_reported() {
        let (dynamic, seen) = recorded(DynamicConfig {
            min: 0.0,
            max: 100.0,
            default_value: 150.0,
            wrap: false,
        });
        assert_eq!(dynamic.current(), 100.0);
        assert_eq!(*seen.borrow(), vec![100.0]);
    }

    #[test]
    fn set_value_twice_reports_once() {
        let (mut dynamic, seen) = recorded(DynamicConfig {
            min: 0.0,
            max: 100.0,
            default_value: 0.0,
            wrap: false,
        });
        assert!(dynamic.set_value(42.0));
        assert!(!dynamic.set_value(42.0));
        assert_eq!(*seen.borrow(), vec![0.0, 42.0]);
        assert_eq!(dynamic.mode(), DynamicMode::Stop);
    }

    #[test]
    fn first_frames_follow_ramp_constants() {
        let mut dynamic = clamped(0.0, 100.0, 0.0);
        dynamic.set_speed(10.0);
        dynamic.goto(100.0, 1.0);

        // speed ramps 2 · 10 units/s² → 2 units/s after 100 ms
        assert!(dynamic.update(Duration::from_millis(100)));
        assert!((dynamic.current_speed() - 2.0).abs() < 1e-9);
        assert!((dynamic.current() - 0.2).abs() < 1e-9);

        assert!(dynamic.update(Duration::from_millis(100)));
        assert!((dynamic.current_speed() - 4.0).abs() < 1e-9);
        assert!((dynamic.current() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn brakes_when_inside_stopping_distance() {
        let mut dynamic = clamped(0.0, 100.0, 0.0);
        dynamic.set_speed(10.0);
        dynamic.goto(1.0, 1.0);
        // speed 4 → stopping distance 16 / 40 = 0.4
        for _ in 0..2 {
            let _ = dynamic.update(Duration::from_millis(100));
        }
        assert_eq!(dynamic.mode(), DynamicMode::Position);
        let _ = dynamic.update(Duration::from_millis(100));
        // 1.0 - 0.6 = 0.4 ≤ 0.4
        assert_eq!(dynamic.mode(), DynamicMode::Stop);
    }

    #[test]
    fn goto_reaches_target_and_comes_to_rest() {
        let mut dynamic = clamped(-10.0, 10.0, 0.0);
        dynamic.set_speed(5.0);
        dynamic.goto(4.0, 1.0);
        for _ in 0..1000 {
            let _ = dynamic.update(FRAME);
            assert!(dynamic.current() <= 4.0);
        }
        assert!((dynamic.current() - 4.0).abs() < 0.1);
        assert!(dynamic.is_idle());
    }

    #[test]
    fn steps_accumulate_on_target() {
        let mut dynamic = clamped(0.0, 100.0, 10.0);
        dynamic.set_speed(10.0);
        dynamic.step(5.0, 1.0);
        let _ = dynamic.update(FRAME);
        dynamic.step(5.0, 1.0);
        assert_eq!(dynamic.target(), 20.0);
        assert!(dynamic.current() < 11.0);
    }

    #[test]
    fn step_with_zero_mult_is_instant() {
        let mut dynamic = clamped(0.0, 100.0, 10.0);
        dynamic.step(5.0, 0.0);
        assert_eq!(dynamic.current(), 15.0);
        assert_eq!(dynamic.mode(), DynamicMode::Stop);
    }

    #[test]
    fn zero_elapsed_is_a_noop() {
        let mut dynamic = wrapping(6.0);
        dynamic.set_speed(1.0);
        dynamic.goto(0.5, 1.0);
        assert!(!dynamic.update(Duration::ZERO));
        assert_eq!(dynamic.current(), 6.0);
    }

    #[test]
    fn wrapping_seek_takes_short_way() {
        let start = 350f64.to_radians();
        let mut dynamic = wrapping(start);
        dynamic.set_speed(1.0);
        dynamic.goto(10f64.to_radians(), 1.0);

        for _ in 0..600 {
            let _ = dynamic.update(FRAME);
            let v = dynamic.current();
            assert!((0.0..TAU).contains(&v));
            // never through the far side of the circle
            assert!(
                v >= start - 1e-9 || v <= 10f64.to_radians() + 1e-9,
                "went the long way: {v}"
            );
        }
        assert!((dynamic.current() - 10f64.to_radians()).abs() < 2e-2);
    }

    #[test]
    fn roll_then_stop_decelerates_and_clamps() {
        let mut dynamic = clamped(0.0, 1.0, 0.5);
        dynamic.set_speed(2.0);
        dynamic.roll(false, 1.0);
        for _ in 0..100 {
            let _ = dynamic.update(FRAME);
            assert!(dynamic.current() <= 1.0);
        }
        assert_eq!(dynamic.current(), 1.0);

        // the upward speed has to be reversed first
        dynamic.roll(true, 1.0);
        for _ in 0..60 {
            let _ = dynamic.update(FRAME);
        }
        dynamic.stop();
        let before = dynamic.current();
        for _ in 0..200 {
            let _ = dynamic.update(FRAME);
        }
        assert!(dynamic.current() < before);
        assert!(dynamic.is_idle());
    }

    #[test]
    fn random_sequences_stay_in_range() {
        // xorshift so the sequence is reproducible
        let mut seed: u64 = 0x9e37_79b9_7f4a_7c15;
        let mut next = move || {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            (seed % 10_000) as f64 / 10_000.0
        };

        let mut bounded = clamped(-1.5, 1.5, 0.0);
        let mut looped = wrapping(1.0);
        for dynamic in [&mut bounded, &mut looped] {
            dynamic.set_speed(3.0);
        }

        for _ in 0..5000 {
            let op = next();
            let arg = next() * 20.0 - 10.0;
            for dynamic in [&mut bounded, &mut looped] {
                match (op * 6.0) as u32 {
                    0 => dynamic.step(arg, 1.0 + op),
                    1 => dynamic.goto(arg, 2.0),
                    2 => dynamic.roll(arg < 0.0, 1.0),
                    3 => dynamic.stop(),
                    4 => {
                        let _ = dynamic.set_value(arg);
                    }
                    _ => {}
                }
                let _ = dynamic.update(Duration::from_millis((next() * 40.0) as u64));
            }
            assert!((-1.5..=1.5).contains(&bounded.current()));
            assert!((0.0..TAU).contains(&looped.current()));
        }
    }
}
