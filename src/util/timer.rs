//! Host time source and the one-shot timers the gesture recognizer runs on.
//!
//! Nothing here spawns threads or talks to a platform scheduler: timers are
//! deadlines that the owner polls with [`Timers::take_due`] on every event
//! and every frame.

use std::cell::Cell;
use std::fmt::Debug;
use std::rc::Rc;
use std::time::Duration;

use web_time::Instant;

/// Monotonic time source, measured from an arbitrary origin.
pub trait Clock {
    /// Time elapsed since the clock's origin.
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`web_time::Instant`] (`performance.now()` on
/// wasm).
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Clock whose origin is the moment of construction.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock advanced explicitly by the host.
///
/// Clones share the same time, so a host (or a test) can keep one handle
/// and hand another to the navigator.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    /// Clock starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Jump to an absolute time.
    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Set of named one-shot deadlines.
///
/// Scheduling a key that is already pending replaces its deadline.
#[derive(Debug, Clone)]
pub struct Timers<K> {
    pending: Vec<(K, Duration)>,
}

impl<K: Copy + PartialEq + Debug> Timers<K> {
    /// Empty timer set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Arm `key` to fire at `deadline`.
    pub fn schedule(&mut self, key: K, deadline: Duration) {
        let _ = self.cancel(key);
        self.pending.push((key, deadline));
    }

    /// Disarm `key`. Returns whether it was pending.
    pub fn cancel(&mut self, key: K) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(k, _)| *k != key);
        self.pending.len() != before
    }

    /// Whether `key` is armed.
    #[must_use]
    pub fn is_pending(&self, key: K) -> bool {
        self.pending.iter().any(|(k, _)| *k == key)
    }

    /// Remove and return every key whose deadline is at or before `now`,
    /// earliest first.
    pub fn take_due(&mut self, now: Duration) -> Vec<K> {
        let mut due: Vec<(K, Duration)> = Vec::new();
        self.pending.retain(|&(key, deadline)| {
            if deadline <= now {
                due.push((key, deadline));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|&(_, deadline)| deadline);
        due.into_iter().map(|(key, _)| key).collect()
    }

    /// Disarm everything.
    pub fn clear(&mut self) {
        if !self.pending.is_empty() {
            log::debug!("clearing {} pending timers", self.pending.len());
        }
        self.pending.clear();
    }

    /// Number of armed timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no timer is armed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<K: Copy + PartialEq + Debug> Default for Timers<K> {
    fn default() -> Self {
        Self::new()
    }
}
