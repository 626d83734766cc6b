//! Recent pointer samples, used to measure the release velocity of a drag.

use std::time::Duration;

use glam::DVec2;

/// How far back samples are kept.
pub const INERTIA_WINDOW: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq)]
struct Sample {
    at: Duration,
    position: DVec2,
}

/// Time-windowed pointer history.
///
/// Samples older than [`INERTIA_WINDOW`] are dropped, and a pause longer
/// than a tenth of the window discards everything recorded before it, so
/// only the final uninterrupted stroke counts.
#[derive(Debug, Clone, Default)]
pub struct MoveHistory {
    samples: Vec<Sample>,
}

impl MoveHistory {
    /// Empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Number of retained samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no sample is retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Record `position` at time `now`, then prune. A timestamp older than
    /// the last sample starts a new stroke.
    pub fn log(&mut self, now: Duration, position: DVec2) {
        if self.samples.last().is_some_and(|last| now < last.at) {
            log::debug!("pointer history went back in time, restarting stroke");
            self.samples.clear();
        }
        match self.samples.last_mut() {
            Some(last) if last.position == position => last.at = now,
            Some(last) if last.at == now => last.position = position,
            _ => self.samples.push(Sample { at: now, position }),
        }
        self.prune(now);
    }

    fn prune(&mut self, now: Duration) {
        let oldest = now.saturating_sub(INERTIA_WINDOW);
        self.samples.retain(|s| s.at >= oldest);

        let max_gap = INERTIA_WINDOW / 10;
        let stroke_start = self
            .samples
            .windows(2)
            .rposition(|pair| pair[1].at.saturating_sub(pair[0].at) > max_gap)
            .map_or(0, |i| i + 1);
        drop(self.samples.drain(..stroke_start));
    }

    /// Exit direction of the stroke: the end tangent of a Catmull-Rom curve
    /// through the samples, which points from the second-to-last sample to
    /// the last one. `None` with fewer than two distinct samples.
    #[must_use]
    pub fn exit_direction(&self) -> Option<DVec2> {
        let [.., before, last] = self.samples.as_slice() else {
            return None;
        };
        (last.position - before.position).try_normalize()
    }

    /// Average speed in pixels per millisecond: the mean of the segment
    /// speeds, divided over the number of samples.
    #[must_use]
    pub fn average_speed(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let total: f64 = self
            .samples
            .windows(2)
            .map(|pair| {
                let dt = pair[1].at.saturating_sub(pair[0].at).as_secs_f64() * 1000.0;
                if dt > 0.0 {
                    pair[0].position.distance(pair[1].position) / dt
                } else {
                    0.0
                }
            })
            .sum();
        total / self.samples.len() as f64
    }
}
