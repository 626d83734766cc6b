//! Several named [`Dynamic`]s behind one change callback.

use std::fmt;
use std::hash::Hash;
use std::time::Duration;

use rustc_hash::FxHashMap;

use super::dynamic::Dynamic;

/// Snapshot of every member's current value.
pub type Values<K> = FxHashMap<K, f64>;

/// Change callback of a [`MultiDynamic`].
pub type ValuesCallback<K> = Box<dyn FnMut(&Values<K>)>;

/// Aggregate of named [`Dynamic`]s.
///
/// The shared callback runs at most once per [`set_value`](Self::set_value)
/// or [`update`](Self::update) call, however many members changed.
pub struct MultiDynamic<K> {
    dynamics: FxHashMap<K, Dynamic>,
    callback: Option<ValuesCallback<K>>,
}

impl<K: Copy + Eq + Hash + fmt::Debug> MultiDynamic<K> {
    /// Group `dynamics` (built with [`Dynamic::detached`]) under
    /// `callback`, which immediately receives the initial snapshot.
    pub fn new(
        callback: impl FnMut(&Values<K>) + 'static,
        dynamics: impl IntoIterator<Item = (K, Dynamic)>,
    ) -> Self {
        let mut multi = Self {
            dynamics: dynamics.into_iter().collect(),
            callback: Some(Box::new(callback)),
        };
        multi.notify();
        multi
    }

    /// Group without a callback.
    pub fn detached(dynamics: impl IntoIterator<Item = (K, Dynamic)>) -> Self {
        Self {
            dynamics: dynamics.into_iter().collect(),
            callback: None,
        }
    }

    /// Snapshot of all current values.
    #[must_use]
    pub fn current(&self) -> Values<K> {
        self.dynamics
            .iter()
            .map(|(name, dynamic)| (*name, dynamic.current()))
            .collect()
    }

    /// Read-only access to one member.
    #[must_use]
    pub fn get(&self, name: K) -> Option<&Dynamic> {
        self.dynamics.get(&name)
    }

    /// Set the base speed of every member.
    pub fn set_speed(&mut self, speed: f64) {
        for dynamic in self.dynamics.values_mut() {
            dynamic.set_speed(speed);
        }
    }

    /// Seek a target on each named member.
    pub fn goto(
        &mut self,
        positions: impl IntoIterator<Item = (K, f64)>,
        speed_mult: f64,
    ) {
        for (name, position) in positions {
            if let Some(dynamic) = self.member(name) {
                dynamic.goto(position, speed_mult);
            }
        }
    }

    /// Step each named member. A zero `speed_mult` jumps every member at
    /// once and reports the result through the callback.
    pub fn step(
        &mut self,
        steps: impl IntoIterator<Item = (K, f64)>,
        speed_mult: f64,
    ) {
        if speed_mult == 0.0 {
            let targets: Vec<(K, f64)> = steps
                .into_iter()
                .filter_map(|(name, delta)| {
                    self.member(name).map(|d| (name, d.current() + delta))
                })
                .collect();
            let _ = self.set_value(targets);
            return;
        }
        for (name, delta) in steps {
            if let Some(dynamic) = self.member(name) {
                dynamic.step(delta, speed_mult);
            }
        }
    }

    /// Roll each named member (`true` inverts the direction).
    pub fn roll(
        &mut self,
        rolls: impl IntoIterator<Item = (K, bool)>,
        speed_mult: f64,
    ) {
        for (name, invert) in rolls {
            if let Some(dynamic) = self.member(name) {
                dynamic.roll(invert, speed_mult);
            }
        }
    }

    /// Brake every member.
    pub fn stop(&mut self) {
        for dynamic in self.dynamics.values_mut() {
            dynamic.stop();
        }
    }

    /// Brake the named members only.
    pub fn stop_members(&mut self, names: impl IntoIterator<Item = K>) {
        for name in names {
            if let Some(dynamic) = self.member(name) {
                dynamic.stop();
            }
        }
    }

    /// Snap the named members. Returns whether any of them changed.
    pub fn set_value(
        &mut self,
        values: impl IntoIterator<Item = (K, f64)>,
    ) -> bool {
        let mut changed = false;
        for (name, value) in values {
            if let Some(dynamic) = self.member(name) {
                changed |= dynamic.set_value(value);
            }
        }
        if changed {
            self.notify();
        }
        changed
    }

    /// Advance every member by one frame. Returns whether any changed.
    pub fn update(&mut self, elapsed: Duration) -> bool {
        let mut changed = false;
        for dynamic in self.dynamics.values_mut() {
            changed |= dynamic.update(elapsed);
        }
        if changed {
            self.notify();
        }
        changed
    }

    fn member(&mut self, name: K) -> Option<&mut Dynamic> {
        let dynamic = self.dynamics.get_mut(&name);
        if dynamic.is_none() {
            log::warn!("no dynamic named {name:?}");
        }
        dynamic
    }

    fn notify(&mut self) {
        if self.callback.is_some() {
            let values = self.current();
            if let Some(cb) = self.callback.as_mut() {
                cb(&values);
            }
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for MultiDynamic<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiDynamic")
            .field("dynamics", &self.dynamics)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::dynamics::DynamicConfig;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Member {
        A,
        B,
    }

    fn member(value: f64) -> Dynamic {
        Dynamic::detached(DynamicConfig {
            min: -100.0,
            max: 100.0,
            default_value: value,
            wrap: false,
        })
        .unwrap()
    }

    fn recorded() -> (MultiDynamic<Member>, Rc<RefCell<Vec<Values<Member>>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let multi = MultiDynamic::new(
            move |values: &Values<Member>| sink.borrow_mut().push(values.clone()),
            [(Member::A, member(0.0)), (Member::B, member(10.0))],
        );
        (multi, seen)
    }

    #[test]
    fn construction_reports_initial_snapshot() {
        let (multi, seen) = recorded();
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0][&Member::B], 10.0);
        assert_eq!(multi.current()[&Member::A], 0.0);
    }

    #[test]
    fn set_value_reports_once_for_several_members() {
        let (mut multi, seen) = recorded();
        assert!(multi.set_value([(Member::A, 1.0), (Member::B, 2.0)]));
        assert_eq!(seen.borrow().len(), 2);
        assert!(!multi.set_value([(Member::A, 1.0)]));
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn update_reports_at_most_once_per_call() {
        let (mut multi, seen) = recorded();
        multi.set_speed(50.0);
        multi.goto([(Member::A, 50.0), (Member::B, -50.0)], 1.0);
        let before = seen.borrow().len();
        assert!(multi.update(Duration::from_millis(16)));
        assert_eq!(seen.borrow().len(), before + 1);

        multi.stop();
        for _ in 0..200 {
            let _ = multi.update(Duration::from_millis(16));
        }
        let settled = seen.borrow().len();
        assert!(!multi.update(Duration::from_millis(16)));
        assert_eq!(seen.borrow().len(), settled);
    }

    #[test]
    fn instant_step_reports_through_callback() {
        let (mut multi, seen) = recorded();
        multi.step([(Member::A, 3.0), (Member::B, -4.0)], 0.0);
        assert_eq!(multi.current()[&Member::A], 3.0);
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(seen.borrow()[1][&Member::A], 3.0);
        assert_eq!(seen.borrow()[1][&Member::B], 6.0);

        // a zero step changes nothing and stays quiet
        multi.step([(Member::A, 0.0)], 0.0);
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn commands_apply_to_named_subset() {
        let (mut multi, _) = recorded();
        multi.set_speed(10.0);
        multi.roll([(Member::A, true)], 1.0);
        assert_eq!(
            multi.get(Member::A).unwrap().mode(),
            crate::dynamics::DynamicMode::Infinite
        );
        assert_eq!(
            multi.get(Member::B).unwrap().mode(),
            crate::dynamics::DynamicMode::Stop
        );

        multi.step([(Member::B, 5.0)], 1.0);
        assert_eq!(multi.get(Member::B).unwrap().target(), 15.0);

        multi.stop_members([Member::A]);
        assert_eq!(
            multi.get(Member::A).unwrap().mode(),
            crate::dynamics::DynamicMode::Stop
        );
    }
}
