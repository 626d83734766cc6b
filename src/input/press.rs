//! Tracks key presses so that a quick tap still moves the camera for a
//! perceptible minimum time.

use std::time::Duration;

/// Shortest perceptible key press.
pub const MIN_PRESS: Duration = Duration::from_millis(200);

/// What to do when a held key is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// Nothing was held.
    Ignored,
    /// Stop now.
    Now,
    /// The press was too short; stop at this deadline instead.
    Deferred(Duration),
}

/// Minimum-duration press tracker for held keys.
///
/// The handler stays pending from key-down until the stop actually
/// happens, which also swallows key repeat.
#[derive(Debug, Clone)]
pub struct PressHandler {
    delay: Duration,
    pressed_at: Option<Duration>,
}

impl PressHandler {
    /// Handler with the given minimum press.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pressed_at: None,
        }
    }

    /// Whether a press is held or its stop is still deferred.
    #[must_use]
    pub fn pending(&self) -> bool {
        self.pressed_at.is_some()
    }

    /// Record a press at `now`.
    pub fn down(&mut self, now: Duration) {
        self.pressed_at = Some(now);
    }

    /// Record a release at `now`.
    pub fn up(&mut self, now: Duration) -> Release {
        let Some(pressed_at) = self.pressed_at else {
            return Release::Ignored;
        };
        if now.saturating_sub(pressed_at) < self.delay {
            Release::Deferred(now + self.delay)
        } else {
            self.pressed_at = None;
            Release::Now
        }
    }

    /// Clear the press once a deferred stop has run.
    pub fn finish(&mut self) {
        self.pressed_at = None;
    }
}

impl Default for PressHandler {
    fn default() -> Self {
        Self::new(MIN_PRESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_press_stops_immediately() {
        let mut press = PressHandler::default();
        press.down(Duration::ZERO);
        assert!(press.pending());
        assert_eq!(press.up(Duration::from_millis(250)), Release::Now);
        assert!(!press.pending());
    }

    #[test]
    fn short_tap_defers_by_full_delay() {
        let mut press = PressHandler::default();
        press.down(Duration::from_millis(1000));
        assert_eq!(
            press.up(Duration::from_millis(1050)),
            Release::Deferred(Duration::from_millis(1250))
        );
        assert!(press.pending());
        press.finish();
        assert!(!press.pending());
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut press = PressHandler::default();
        assert_eq!(press.up(Duration::from_millis(10)), Release::Ignored);
    }
}
