//! Pairs clicks into single and double clicks.

use std::time::Duration;

use super::event::ClickData;

/// Window in which a second click pairs with the first.
pub const DOUBLE_CLICK_DELAY: Duration = Duration::from_millis(300);

/// Result of registering a click with the [`ClickTracker`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickResult {
    /// Plain click; a pairing window is now open.
    Single(ClickData),
    /// Second click near the first one; carries the first click.
    Double(ClickData),
}

/// Pairs consecutive clicks into double-clicks.
///
/// A click inside the window but farther than the move threshold from the
/// first one counts as a new single click and restarts the window.
#[derive(Debug, Clone, Default)]
pub struct ClickTracker {
    first: Option<(ClickData, Duration)>,
}

impl ClickTracker {
    /// Tracker with no open window.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a first click is waiting for its pair at time `now`.
    #[must_use]
    pub fn is_open(&self, now: Duration) -> bool {
        self.first
            .is_some_and(|(_, at)| now.saturating_sub(at) < DOUBLE_CLICK_DELAY)
    }

    /// Register a click at time `now`. `threshold` is the pairing distance
    /// in pixels.
    pub fn register(
        &mut self,
        click: ClickData,
        now: Duration,
        threshold: f64,
    ) -> ClickResult {
        if self.is_open(now) {
            if let Some((first, _)) = self.first {
                if (first.x - click.x).abs() < threshold
                    && (first.y - click.y).abs() < threshold
                {
                    self.first = None;
                    return ClickResult::Double(first);
                }
            }
        }
        self.first = Some((click, now));
        ClickResult::Single(click)
    }

    /// Close any open window.
    pub fn reset(&mut self) {
        self.first = None;
    }
}
