//! Cancellable, promise-like interpolation of named scalar properties.
//!
//! A [`Tween`] is a cheap cloneable handle. The owner advances it once per
//! frame with [`Tween::update`]; anyone holding a clone can
//! [`cancel`](Tween::cancel) it or register completion callbacks with
//! [`then`](Tween::then). It also implements [`Future`] so async hosts can
//! simply `.await` the outcome.
//!
//! The outcome is `true` when the tween ran to completion and `false` when it
//! was cancelled.

use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};
use std::time::Duration;

use rustc_hash::FxHashMap;

use crate::util::easing::Easing;

/// Interpolated property values handed to the tick callback.
pub type TweenValues = FxHashMap<&'static str, f64>;

/// Per-frame callback: current values and raw progress in [0, 1].
pub type TickCallback = Box<dyn FnMut(&TweenValues, f64)>;

/// Start and end value of one animated property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenRange {
    /// Value at progress 0.
    pub start: f64,
    /// Value at progress 1.
    pub end: f64,
}

impl TweenRange {
    fn at(self, eased: f64) -> f64 {
        self.start + (self.end - self.start) * eased
    }
}

/// Construction parameters for a [`Tween`].
pub struct TweenOptions {
    /// Animated properties.
    pub properties: Vec<(&'static str, TweenRange)>,
    /// Running time, excluding the delay.
    pub duration: Duration,
    /// Time to wait before the first frame.
    pub delay: Duration,
    /// Curve applied to the progress before interpolating.
    pub easing: Easing,
    /// Called on every frame with the current values.
    pub on_tick: Option<TickCallback>,
}

impl TweenOptions {
    /// Linear, undelayed options with no properties.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            properties: Vec::new(),
            duration,
            delay: Duration::ZERO,
            easing: Easing::Linear,
            on_tick: None,
        }
    }

    /// Add an animated property.
    #[must_use]
    pub fn property(mut self, name: &'static str, start: f64, end: f64) -> Self {
        self.properties.push((name, TweenRange { start, end }));
        self
    }

    /// Wait before the first frame.
    #[must_use]
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set the easing curve.
    #[must_use]
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Set the per-frame callback.
    #[must_use]
    pub fn on_tick(mut self, f: impl FnMut(&TweenValues, f64) + 'static) -> Self {
        self.on_tick = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for TweenOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TweenOptions")
            .field("properties", &self.properties)
            .field("duration", &self.duration)
            .field("delay", &self.delay)
            .field("easing", &self.easing)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    /// Waiting out the delay; holds the remaining time.
    Delayed(Duration),
    /// Running; `None` until the first frame fixes the start.
    Running(Option<Duration>),
    Settled(bool),
}

struct TweenState {
    properties: Vec<(&'static str, TweenRange)>,
    duration: Duration,
    easing: Easing,
    phase: Phase,
    on_tick: Option<TickCallback>,
    callbacks: Vec<Box<dyn FnOnce(bool)>>,
    wakers: Vec<Waker>,
}

/// Handle to a one-shot property animation.
#[derive(Clone)]
pub struct Tween {
    state: Rc<RefCell<TweenState>>,
}

impl Tween {
    /// Start a tween. The first frame is produced by the next
    /// [`update`](Self::update) after the delay.
    #[must_use]
    pub fn new(options: TweenOptions) -> Self {
        let phase = if options.delay.is_zero() {
            Phase::Running(None)
        } else {
            Phase::Delayed(options.delay)
        };
        Self::with_phase(
            options.properties,
            options.duration,
            options.easing,
            phase,
            options.on_tick,
        )
    }

    /// A tween that is already resolved with `true`. Used when no motion is
    /// actually required.
    #[must_use]
    pub fn resolved() -> Self {
        Self::with_phase(
            Vec::new(),
            Duration::ZERO,
            Easing::Linear,
            Phase::Settled(true),
            None,
        )
    }

    fn with_phase(
        properties: Vec<(&'static str, TweenRange)>,
        duration: Duration,
        easing: Easing,
        phase: Phase,
        on_tick: Option<TickCallback>,
    ) -> Self {
        Self {
            state: Rc::new(RefCell::new(TweenState {
                properties,
                duration,
                easing,
                phase,
                on_tick,
                callbacks: Vec::new(),
                wakers: Vec::new(),
            })),
        }
    }

    /// Advance by one frame. Returns whether the tween is still pending
    /// afterwards.
    pub fn update(&self, elapsed: Duration) -> bool {
        let Some((values, progress, done, mut on_tick)) = self.advance(elapsed)
        else {
            return !self.is_settled();
        };

        // No borrow is held while user code runs: the callback may cancel
        // this tween or register further callbacks.
        if let Some(cb) = on_tick.as_mut() {
            cb(&values, progress);
        }

        {
            let mut state = self.state.borrow_mut();
            if !matches!(state.phase, Phase::Settled(_)) && state.on_tick.is_none()
            {
                state.on_tick = on_tick;
            }
        }

        if done {
            let _ = self.settle(true);
        }
        !self.is_settled()
    }

    /// Compute this frame's values, taking the tick callback out of the
    /// state. `None` when there is nothing to report this frame.
    #[allow(clippy::type_complexity)]
    fn advance(
        &self,
        elapsed: Duration,
    ) -> Option<(TweenValues, f64, bool, Option<TickCallback>)> {
        let mut state = self.state.borrow_mut();

        let run_time = match state.phase {
            Phase::Settled(_) => return None,
            Phase::Delayed(remaining) => {
                if elapsed < remaining {
                    state.phase = Phase::Delayed(remaining - elapsed);
                    return None;
                }
                Duration::ZERO
            }
            Phase::Running(None) => Duration::ZERO,
            Phase::Running(Some(run_time)) => run_time + elapsed,
        };
        state.phase = Phase::Running(Some(run_time));

        let progress = if state.duration.is_zero() {
            1.0
        } else {
            run_time.as_secs_f64() / state.duration.as_secs_f64()
        };

        let done = progress >= 1.0;
        let eased = if done {
            1.0
        } else {
            state.easing.evaluate(progress)
        };
        let values: TweenValues = state
            .properties
            .iter()
            .map(|&(name, range)| {
                (name, if done { range.end } else { range.at(eased) })
            })
            .collect();

        Some((values, progress.min(1.0), done, state.on_tick.take()))
    }

    /// Cancel the tween: resolves `false` without a final tick. No-op once
    /// settled.
    pub fn cancel(&self) {
        if self.settle(false) {
            log::debug!("tween cancelled");
        }
    }

    /// Register a completion callback. Runs immediately when the tween has
    /// already settled.
    pub fn then(&self, cb: impl FnOnce(bool) + 'static) {
        match self.outcome() {
            Some(outcome) => cb(outcome),
            None => self.state.borrow_mut().callbacks.push(Box::new(cb)),
        }
    }

    /// Stored outcome, `None` while pending.
    #[must_use]
    pub fn outcome(&self) -> Option<bool> {
        match self.state.borrow().phase {
            Phase::Settled(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Whether the tween has completed or been cancelled.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.outcome().is_some()
    }

    /// Whether two handles point at the same tween.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    /// Record the outcome, then run the queued callbacks. Returns `false`
    /// when the tween had already settled.
    fn settle(&self, outcome: bool) -> bool {
        let (callbacks, wakers) = {
            let mut state = self.state.borrow_mut();
            if matches!(state.phase, Phase::Settled(_)) {
                return false;
            }
            state.phase = Phase::Settled(outcome);
            state.on_tick = None;
            (
                std::mem::take(&mut state.callbacks),
                std::mem::take(&mut state.wakers),
            )
        };

        for waker in wakers {
            waker.wake();
        }
        for cb in callbacks {
            cb(outcome);
        }
        true
    }
}

impl Future for Tween {
    type Output = bool;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<bool> {
        let mut state = self.state.borrow_mut();
        if let Phase::Settled(outcome) = state.phase {
            return Poll::Ready(outcome);
        }
        if !state.wakers.iter().any(|w| w.will_wake(cx.waker())) {
            state.wakers.push(cx.waker().clone());
        }
        Poll::Pending
    }
}

impl fmt::Debug for Tween {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Tween")
            .field("phase", &state.phase)
            .field("duration", &state.duration)
            .field("easing", &state.easing)
            .field("callbacks", &state.callbacks.len())
            .finish_non_exhaustive()
    }
}
