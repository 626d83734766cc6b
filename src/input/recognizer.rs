//! Gesture state machine.
//!
//! The [`GestureRecognizer`] takes raw [`InputEvent`]s and decides between
//! click, drag, pinch, long press, double click and inertial release. It
//! drives the [`CameraDynamics`] it is handed on every call and queues the
//! [`ViewerEvent`]s the host should act on.
//!
//! Time-based transitions (long press, hint overlays, deferred key stops)
//! are deadlines checked at the start of every event and every tick, so
//! they fire on time regardless of how often the host ticks.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use glam::DVec2;

use super::click::{ClickResult, ClickTracker};
use super::event::{ClickData, Hint, InputEvent, MouseButton, ViewerEvent};
use super::history::MoveHistory;
use super::keyboard::KeyAction;
use super::press::{PressHandler, Release};
use crate::animation::{Tween, TweenOptions};
use crate::camera::{Axis, CameraDynamics, Position};
use crate::options::{ControlOptions, KeybindingOptions, KeyboardMode};
use crate::util::easing::Easing;
use crate::util::timer::{Clock, Timers};

/// Hold time after which a still single touch becomes a right click.
pub const LONG_TOUCH_DELAY: Duration = Duration::from_millis(500);
/// Delay before the "use two fingers" hint appears.
pub const TWO_FINGERS_HINT_DELAY: Duration = Duration::from_millis(100);
/// How long the "hold Ctrl to zoom" hint stays up.
pub const CTRL_ZOOM_HINT_TIMEOUT: Duration = Duration::from_millis(2000);
/// Length of the post-release glide.
pub const INERTIA_DURATION: Duration = Duration::from_millis(1000);

/// Pinch zoom gain, in zoom levels per viewport width of finger travel.
const PINCH_ZOOM_FACTOR: f64 = 80.0;
/// Zoom levels per wheel notch at zoom speed 1.
const WHEEL_STEP: f64 = 5.0;
/// Inertia displacement gain, in pixels per (px/ms) of speed and frame.
const INERTIA_GAIN: f64 = 3.0;

/// Gesture phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Step {
    /// Nothing in progress.
    #[default]
    Idle,
    /// Button or finger down, not yet a drag.
    Click,
    /// Confirmed drag or pinch.
    Moving,
    /// Gliding after release.
    Inertia,
}

/// Deadlines the recognizer keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureTimer {
    /// Long-press detection.
    LongTouch,
    /// Show the two-finger hint.
    TwoFingersHint,
    /// Hide the ctrl-zoom hint.
    CtrlZoomHint,
    /// Deferred stop after a short key tap.
    KeyRelease(KeyTarget),
}

/// Controller a key binding drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTarget {
    /// Yaw and pitch.
    Position,
    /// Zoom level.
    Zoom,
}

impl KeyTarget {
    const fn of(action: &KeyAction) -> Option<Self> {
        match action {
            KeyAction::Command(_) => None,
            KeyAction::ZoomIn | KeyAction::ZoomOut => Some(Self::Zoom),
            _ => Some(Self::Position),
        }
    }

    fn stop(self, camera: &mut CameraDynamics) {
        match self {
            Self::Position => camera.position_mut().stop(),
            Self::Zoom => camera.zoom_mut().stop(),
        }
    }
}

/// The key currently driving one controller.
#[derive(Debug, Default)]
struct HeldKey {
    press: PressHandler,
    key: Option<String>,
}

impl HeldKey {
    fn release(&mut self) {
        self.press.finish();
        self.key = None;
    }
}

struct Inertia {
    tween: Tween,
    speed: Rc<Cell<Option<f64>>>,
    direction: DVec2,
    cursor: DVec2,
}

/// Pointer / touch / wheel / keyboard gesture recognizer.
pub struct GestureRecognizer {
    controls: ControlOptions,
    bindings: KeybindingOptions,
    clock: Rc<dyn Clock>,
    step: Step,
    button: MouseButton,
    start: DVec2,
    cursor: DVec2,
    history: MoveHistory,
    pinch_distance: f64,
    long_touch_at: Option<DVec2>,
    ctrl_down: bool,
    ctrl_hint: bool,
    two_fingers_hint: bool,
    keyboard_enabled: bool,
    position_key: HeldKey,
    zoom_key: HeldKey,
    clicks: ClickTracker,
    timers: Timers<GestureTimer>,
    inertia: Option<Inertia>,
    events: Vec<ViewerEvent>,
}

impl GestureRecognizer {
    /// Recognizer reading time from `clock`.
    #[must_use]
    pub fn new(
        controls: &ControlOptions,
        bindings: &KeybindingOptions,
        clock: Rc<dyn Clock>,
    ) -> Self {
        Self {
            controls: controls.clone(),
            bindings: bindings.clone(),
            clock,
            step: Step::Idle,
            button: MouseButton::Left,
            start: DVec2::ZERO,
            cursor: DVec2::ZERO,
            history: MoveHistory::new(),
            pinch_distance: 0.0,
            long_touch_at: None,
            ctrl_down: false,
            ctrl_hint: false,
            two_fingers_hint: false,
            keyboard_enabled: controls.keyboard == KeyboardMode::Always,
            position_key: HeldKey::default(),
            zoom_key: HeldKey::default(),
            clicks: ClickTracker::new(),
            timers: Timers::new(),
            inertia: None,
            events: Vec::new(),
        }
    }

    /// Current gesture phase.
    #[must_use]
    pub fn step(&self) -> Step {
        self.step
    }

    /// Behavior options in effect.
    #[must_use]
    pub fn controls(&self) -> &ControlOptions {
        &self.controls
    }

    /// Replace the behavior options. Keyboard activation follows the new
    /// mode only for [`KeyboardMode::Always`] and
    /// [`KeyboardMode::Disabled`].
    pub fn set_controls(&mut self, controls: ControlOptions) {
        match controls.keyboard {
            KeyboardMode::Always => self.keyboard_enabled = true,
            KeyboardMode::Disabled => self.keyboard_enabled = false,
            KeyboardMode::Fullscreen => {}
        }
        self.controls = controls;
    }

    /// Key bindings in effect.
    pub fn bindings_mut(&mut self) -> &mut KeybindingOptions {
        &mut self.bindings
    }

    /// Whether key events are acted upon.
    #[must_use]
    pub fn keyboard_enabled(&self) -> bool {
        self.keyboard_enabled
    }

    /// Turn keyboard control on or off.
    pub fn set_keyboard_enabled(&mut self, enabled: bool) {
        if self.keyboard_enabled != enabled {
            log::debug!("keyboard control {}", if enabled { "on" } else { "off" });
        }
        self.keyboard_enabled = enabled;
    }

    /// Drain the events produced since the last call.
    pub fn take_events(&mut self) -> Vec<ViewerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Feed one input event.
    pub fn handle_event(&mut self, event: InputEvent, camera: &mut CameraDynamics) {
        let now = self.clock.now();
        self.fire_due(now, camera);

        match event {
            InputEvent::PointerDown { button, x, y } => {
                self.start_move(DVec2::new(x, y), button, now, camera);
            }
            InputEvent::PointerMove { x, y } => {
                self.do_move(DVec2::new(x, y), now, camera);
            }
            InputEvent::PointerUp { x, y, .. } => {
                self.stop_move(DVec2::new(x, y), now, camera);
            }
            InputEvent::TouchStart { touches } => {
                self.touch_start(&touches, now, camera);
            }
            InputEvent::TouchMove { touches } => {
                self.touch_move(&touches, now, camera);
            }
            InputEvent::TouchEnd { touches, changed } => {
                self.touch_end(&touches, &changed, now, camera);
            }
            InputEvent::TouchCancel => {
                self.reset_long_touch();
                self.cancel_two_fingers_hint();
                if matches!(self.step, Step::Click | Step::Moving) {
                    self.reset_move();
                }
            }
            InputEvent::Wheel { delta_y, ctrl } => {
                self.wheel(delta_y, ctrl, now, camera);
            }
            InputEvent::KeyDown { key } => self.key_down(&key, now, camera),
            InputEvent::KeyUp { key } => self.key_up(&key, now, camera),
            InputEvent::FullscreenChanged(fullscreen) => {
                if self.controls.keyboard == KeyboardMode::Fullscreen {
                    self.set_keyboard_enabled(fullscreen);
                }
            }
        }
    }

    /// Per-frame update: fire due timers and advance inertia. Returns
    /// whether the camera moved.
    pub fn tick(&mut self, elapsed: Duration, camera: &mut CameraDynamics) -> bool {
        let now = self.clock.now();
        self.fire_due(now, camera);
        self.tick_inertia(elapsed, camera)
    }

    /// Clear every timer, cancel inertia and return to [`Step::Idle`].
    pub fn teardown(&mut self, camera: &mut CameraDynamics) {
        self.timers.clear();
        if let Some(inertia) = self.inertia.take() {
            inertia.tween.cancel();
            camera.clear_animation(&inertia.tween);
        }
        self.position_key.release();
        self.zoom_key.release();
        self.clicks.reset();
        self.long_touch_at = None;
        self.reset_move();
    }

    fn set_step(&mut self, step: Step) {
        if self.step != step {
            log::debug!("gesture {:?} -> {:?}", self.step, step);
            self.step = step;
        }
    }

    fn move_threshold(&self, camera: &CameraDynamics) -> f64 {
        self.controls.move_threshold * camera.viewport().pixel_ratio
    }

    fn fire_due(&mut self, now: Duration, camera: &mut CameraDynamics) {
        for timer in self.timers.take_due(now) {
            log::debug!("timer {timer:?} fired");
            match timer {
                GestureTimer::LongTouch => {
                    if let Some(at) = self.long_touch_at.take() {
                        self.reset_move();
                        self.click(
                            ClickData {
                                rightclick: true,
                                x: at.x,
                                y: at.y,
                            },
                            now,
                            camera,
                        );
                    }
                }
                GestureTimer::TwoFingersHint => {
                    self.two_fingers_hint = true;
                    self.events.push(ViewerEvent::ShowHint(Hint::TwoFingers));
                }
                GestureTimer::CtrlZoomHint => self.hide_ctrl_hint(),
                GestureTimer::KeyRelease(target) => {
                    self.held_key(target).release();
                    target.stop(camera);
                }
            }
        }
    }

    /// Halt all camera motion, including a running glide.
    fn halt(&mut self, camera: &mut CameraDynamics) {
        camera.zoom_mut().stop();
        self.halt_position(camera);
    }

    /// Halt yaw and pitch, any animation and a running glide. The zoom
    /// keeps going.
    fn halt_position(&mut self, camera: &mut CameraDynamics) {
        camera.position_mut().stop();
        let _ = camera.stop_animation();
        self.inertia = None;
        if self.step == Step::Inertia {
            self.reset_move();
        }
    }

    fn reset_move(&mut self) {
        self.set_step(Step::Idle);
        self.history.clear();
    }

    // -- pointer ------------------------------------------------------------

    fn start_move(
        &mut self,
        position: DVec2,
        button: MouseButton,
        now: Duration,
        camera: &mut CameraDynamics,
    ) {
        self.halt(camera);
        self.button = button;
        self.start = position;
        self.cursor = position;
        self.history.clear();
        self.history.log(now, position);
        self.set_step(Step::Click);
    }

    fn do_move(&mut self, position: DVec2, now: Duration, camera: &mut CameraDynamics) {
        match self.step {
            Step::Click => {
                let threshold = self.move_threshold(camera);
                let delta = (position - self.start).abs();
                if delta.x >= threshold || delta.y >= threshold {
                    self.history.clear();
                    self.set_step(Step::Moving);
                    let _ = self.apply_move(position, camera);
                    self.history.log(now, position);
                }
            }
            Step::Moving => {
                let _ = self.apply_move(position, camera);
                self.history.log(now, position);
            }
            Step::Idle | Step::Inertia => {}
        }
    }

    fn stop_move(&mut self, position: DVec2, now: Duration, camera: &mut CameraDynamics) {
        match self.step {
            Step::Moving => {
                if self.controls.move_inertia {
                    self.history.log(now, position);
                    self.start_inertia(position, camera);
                } else {
                    self.reset_move();
                }
            }
            Step::Click => {
                let click = ClickData {
                    rightclick: self.button == MouseButton::Right,
                    x: self.start.x,
                    y: self.start.y,
                };
                self.reset_move();
                self.click(click, now, camera);
            }
            Step::Idle | Step::Inertia => {}
        }
    }

    /// Rotate the camera by the pixel delta from the last cursor position.
    fn apply_move(&mut self, position: DVec2, camera: &mut CameraDynamics) -> bool {
        let viewport = camera.viewport();
        let delta = position - self.cursor;
        self.cursor = position;
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            return false;
        }

        let speed = camera.move_speed();
        let yaw = speed * (delta.x / viewport.width) * camera.hfov().to_radians();
        let pitch = speed * (delta.y / viewport.height) * camera.vfov().to_radians();
        let current = camera.position();
        camera.rotate(Position {
            yaw: current.yaw - yaw,
            pitch: current.pitch + pitch,
        })
    }

    fn click(&mut self, click: ClickData, now: Duration, camera: &CameraDynamics) {
        let threshold = self.move_threshold(camera);
        let event = match self.clicks.register(click, now, threshold) {
            ClickResult::Single(data) => ViewerEvent::Click(data),
            ClickResult::Double(first) => ViewerEvent::DoubleClick(first),
        };
        self.events.push(event);
    }

    // -- inertia ------------------------------------------------------------

    fn start_inertia(&mut self, position: DVec2, camera: &mut CameraDynamics) {
        let speed = self.history.average_speed();
        let direction = self.history.exit_direction();
        let Some(direction) = direction.filter(|_| speed > 0.0 && speed.is_finite())
        else {
            self.reset_move();
            return;
        };

        let cell = Rc::new(Cell::new(None));
        let sink = Rc::clone(&cell);
        let tween = Tween::new(
            TweenOptions::new(INERTIA_DURATION)
                .property("speed", speed, 0.0)
                .easing(Easing::OutQuad)
                .on_tick(move |values, _| sink.set(values.get("speed").copied())),
        );
        camera.set_animation(tween.clone());
        self.inertia = Some(Inertia {
            tween,
            speed: cell,
            direction,
            cursor: position,
        });
        self.set_step(Step::Inertia);
    }

    fn tick_inertia(&mut self, elapsed: Duration, camera: &mut CameraDynamics) -> bool {
        let pixel_ratio = camera.viewport().pixel_ratio;
        let Some(inertia) = self.inertia.as_mut() else {
            return false;
        };

        let pending = inertia.tween.update(elapsed);
        let target = inertia.speed.take().map(|speed| {
            inertia.cursor += inertia.direction * speed * INERTIA_GAIN * pixel_ratio;
            inertia.cursor
        });

        let moved = target.is_some_and(|target| self.apply_move(target, camera));

        if !pending {
            if let Some(inertia) = self.inertia.take() {
                camera.clear_animation(&inertia.tween);
            }
            self.reset_move();
        }
        moved
    }

    // -- touch --------------------------------------------------------------

    fn touch_start(&mut self, touches: &[DVec2], now: Duration, camera: &mut CameraDynamics) {
        match touches {
            [touch] => {
                if !self.controls.touchmove_two_fingers {
                    self.start_move(*touch, MouseButton::Left, now, camera);
                }
                if !self.timers.is_pending(GestureTimer::LongTouch) {
                    self.timers
                        .schedule(GestureTimer::LongTouch, now + LONG_TOUCH_DELAY);
                    self.long_touch_at = Some(*touch);
                }
            }
            [a, b, ..] => {
                self.reset_long_touch();
                self.cancel_two_fingers_hint();
                self.start_pinch(*a, *b, now, camera);
            }
            [] => log::debug!("touch start without touches"),
        }
    }

    fn touch_move(&mut self, touches: &[DVec2], now: Duration, camera: &mut CameraDynamics) {
        match touches {
            [touch] => {
                if let Some(at) = self.long_touch_at {
                    let delta = (*touch - at).abs();
                    let threshold = self.move_threshold(camera);
                    if delta.x >= threshold || delta.y >= threshold {
                        self.reset_long_touch();
                    }
                }
                if self.controls.touchmove_two_fingers {
                    if !self.two_fingers_hint
                        && !self.timers.is_pending(GestureTimer::TwoFingersHint)
                    {
                        self.timers.schedule(
                            GestureTimer::TwoFingersHint,
                            now + TWO_FINGERS_HINT_DELAY,
                        );
                    }
                } else {
                    self.do_move(*touch, now, camera);
                }
            }
            [a, b, ..] => {
                self.move_pinch(*a, *b, now, camera);
                self.reset_long_touch();
                self.cancel_two_fingers_hint();
            }
            [] => log::debug!("touch move without touches"),
        }
    }

    fn touch_end(
        &mut self,
        touches: &[DVec2],
        changed: &[DVec2],
        now: Duration,
        camera: &mut CameraDynamics,
    ) {
        self.reset_long_touch();
        self.cancel_two_fingers_hint();

        match touches {
            [] => {
                let position = changed.first().copied().unwrap_or(self.cursor);
                self.stop_move(position, now, camera);
            }
            [touch] => {
                if self.controls.touchmove_two_fingers {
                    self.reset_move();
                } else if self.step == Step::Moving {
                    // continue as a one-finger drag from the remaining finger
                    self.cursor = *touch;
                    self.history.clear();
                    self.history.log(now, *touch);
                }
            }
            [a, b, ..] => {
                if self.step == Step::Moving {
                    let (distance, center) = pinch_geometry(*a, *b);
                    self.pinch_distance = distance;
                    self.cursor = center;
                }
            }
        }
    }

    fn start_pinch(&mut self, a: DVec2, b: DVec2, now: Duration, camera: &mut CameraDynamics) {
        self.halt(camera);
        let (distance, center) = pinch_geometry(a, b);
        self.pinch_distance = distance;
        self.start = center;
        self.cursor = center;
        self.history.clear();
        self.history.log(now, center);
        self.set_step(Step::Moving);
    }

    fn move_pinch(&mut self, a: DVec2, b: DVec2, now: Duration, camera: &mut CameraDynamics) {
        if self.step != Step::Moving {
            return;
        }
        let (distance, center) = pinch_geometry(a, b);
        let width = camera.viewport().width;
        if width > 0.0 {
            let delta = PINCH_ZOOM_FACTOR * (distance - self.pinch_distance) / width
                * camera.zoom_speed();
            let _ = camera.zoom_to(camera.zoom_level() + delta);
        }
        let _ = self.apply_move(center, camera);
        self.history.log(now, center);
        self.pinch_distance = distance;
    }

    fn reset_long_touch(&mut self) {
        let _ = self.timers.cancel(GestureTimer::LongTouch);
        self.long_touch_at = None;
    }

    fn cancel_two_fingers_hint(&mut self) {
        if !self.controls.touchmove_two_fingers {
            return;
        }
        let _ = self.timers.cancel(GestureTimer::TwoFingersHint);
        if self.two_fingers_hint {
            self.two_fingers_hint = false;
            self.events.push(ViewerEvent::HideHint(Hint::TwoFingers));
        }
    }

    // -- wheel --------------------------------------------------------------

    fn wheel(&mut self, delta_y: f64, ctrl: bool, now: Duration, camera: &mut CameraDynamics) {
        if !self.controls.mousewheel {
            return;
        }
        if self.controls.mousewheel_ctrl_key && !(ctrl || self.ctrl_down) {
            if !self.ctrl_hint {
                self.ctrl_hint = true;
                self.events.push(ViewerEvent::ShowHint(Hint::CtrlZoom));
            }
            self.timers
                .schedule(GestureTimer::CtrlZoomHint, now + CTRL_ZOOM_HINT_TIMEOUT);
            return;
        }
        self.hide_ctrl_hint();

        if delta_y == 0.0 || delta_y.is_nan() {
            return;
        }
        let delta = delta_y.signum() * WHEEL_STEP * camera.zoom_speed();
        camera.zoom_mut().step(-delta, WHEEL_STEP);
    }

    fn hide_ctrl_hint(&mut self) {
        let _ = self.timers.cancel(GestureTimer::CtrlZoomHint);
        if self.ctrl_hint {
            self.ctrl_hint = false;
            self.events.push(ViewerEvent::HideHint(Hint::CtrlZoom));
        }
    }

    // -- keyboard -----------------------------------------------------------

    fn key_down(&mut self, key: &str, now: Duration, camera: &mut CameraDynamics) {
        if self.controls.mousewheel_ctrl_key {
            self.ctrl_down = key == "Control";
            if self.ctrl_down {
                self.hide_ctrl_hint();
            }
        }
        if !self.keyboard_enabled {
            return;
        }
        let Some(action) = self.bindings.lookup(key).cloned() else {
            return;
        };
        let Some(target) = KeyTarget::of(&action) else {
            if let KeyAction::Command(name) = action {
                self.events.push(ViewerEvent::KeyCommand(name));
            }
            return;
        };
        // key repeat, or another key already driving this controller
        if self.held_key(target).press.pending() {
            return;
        }

        if target == KeyTarget::Position {
            if self.zoom_key.press.pending() {
                self.halt_position(camera);
            } else {
                self.halt(camera);
            }
        }
        match action {
            KeyAction::RotateUp => camera.position_mut().roll([(Axis::Pitch, false)], 1.0),
            KeyAction::RotateDown => camera.position_mut().roll([(Axis::Pitch, true)], 1.0),
            KeyAction::RotateRight => camera.position_mut().roll([(Axis::Yaw, false)], 1.0),
            KeyAction::RotateLeft => camera.position_mut().roll([(Axis::Yaw, true)], 1.0),
            KeyAction::ZoomIn => camera.zoom_mut().roll(false, 1.0),
            KeyAction::ZoomOut => camera.zoom_mut().roll(true, 1.0),
            KeyAction::Command(_) => {}
        }
        let _ = self.timers.cancel(GestureTimer::KeyRelease(target));
        let held = self.held_key(target);
        held.press.down(now);
        held.key = Some(key.to_owned());
    }

    fn key_up(&mut self, key: &str, now: Duration, camera: &mut CameraDynamics) {
        self.ctrl_down = false;
        if !self.keyboard_enabled {
            return;
        }
        let Some(target) = self.bindings.lookup(key).and_then(KeyTarget::of) else {
            return;
        };
        let held = self.held_key(target);
        if held.key.as_deref() != Some(key) {
            return;
        }
        match held.press.up(now) {
            Release::Ignored => {}
            Release::Now => {
                held.key = None;
                target.stop(camera);
            }
            Release::Deferred(deadline) => {
                self.timers.schedule(GestureTimer::KeyRelease(target), deadline);
            }
        }
    }

    fn held_key(&mut self, target: KeyTarget) -> &mut HeldKey {
        match target {
            KeyTarget::Position => &mut self.position_key,
            KeyTarget::Zoom => &mut self.zoom_key,
        }
    }
}

/// Distance between two fingers and their midpoint.
fn pinch_geometry(a: DVec2, b: DVec2) -> (f64, DVec2) {
    (a.distance(b), (a + b) * 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::DynamicMode;
    use crate::options::CameraOptions;
    use crate::util::math::shortest_arc;
    use crate::util::timer::ManualClock;

    const FRAME: Duration = Duration::from_millis(16);

    struct Harness {
        clock: ManualClock,
        camera: CameraDynamics,
        recognizer: GestureRecognizer,
    }

    impl Harness {
        fn new(controls: ControlOptions) -> Self {
            let clock = ManualClock::new();
            let camera =
                CameraDynamics::new(&CameraOptions::default(), |_| {}, |_| {})
                    .unwrap();
            let recognizer = GestureRecognizer::new(
                &controls,
                &KeybindingOptions::default(),
                Rc::new(clock.clone()),
            );
            Self {
                clock,
                camera,
                recognizer,
            }
        }

        fn send(&mut self, event: InputEvent) {
            self.recognizer.handle_event(event, &mut self.camera);
        }

        fn tick(&mut self) -> bool {
            self.clock.advance(FRAME);
            let moved = self.recognizer.tick(FRAME, &mut self.camera);
            let updated = self.camera.update(FRAME);
            moved || updated
        }

        fn wait(&mut self, by: Duration) {
            self.clock.advance(by);
            let _ = self.recognizer.tick(Duration::ZERO, &mut self.camera);
        }

        fn events(&mut self) -> Vec<ViewerEvent> {
            self.recognizer.take_events()
        }
    }

    fn down(x: f64, y: f64) -> InputEvent {
        InputEvent::PointerDown {
            button: MouseButton::Left,
            x,
            y,
        }
    }

    fn up(x: f64, y: f64) -> InputEvent {
        InputEvent::PointerUp {
            button: MouseButton::Left,
            x,
            y,
        }
    }

    fn click_at(x: f64, y: f64) -> ViewerEvent {
        ViewerEvent::Click(ClickData {
            rightclick: false,
            x,
            y,
        })
    }

    #[test]
    fn crossing_threshold_starts_drag() {
        let mut h = Harness::new(ControlOptions::default());
        let before = h.camera.position();
        h.send(down(100.0, 100.0));
        assert_eq!(h.recognizer.step(), Step::Click);

        h.send(InputEvent::PointerMove { x: 105.0, y: 100.0 });
        assert_eq!(h.recognizer.step(), Step::Moving);
        let after = h.camera.position();
        assert!(shortest_arc(before.yaw, after.yaw).abs() > 0.0);
        assert!(h.events().is_empty());
    }

    #[test]
    fn small_wobble_is_a_click_at_press_point() {
        let mut h = Harness::new(ControlOptions::default());
        h.send(down(100.0, 100.0));
        h.send(InputEvent::PointerMove { x: 103.0, y: 97.0 });
        assert_eq!(h.recognizer.step(), Step::Click);
        h.send(up(103.0, 97.0));

        assert_eq!(h.events(), vec![click_at(100.0, 100.0)]);
        assert_eq!(h.recognizer.step(), Step::Idle);
    }

    #[test]
    fn right_button_click_is_rightclick() {
        let mut h = Harness::new(ControlOptions::default());
        h.send(InputEvent::PointerDown {
            button: MouseButton::Right,
            x: 10.0,
            y: 10.0,
        });
        h.send(InputEvent::PointerUp {
            button: MouseButton::Right,
            x: 10.0,
            y: 10.0,
        });
        assert_eq!(
            h.events(),
            vec![ViewerEvent::Click(ClickData {
                rightclick: true,
                x: 10.0,
                y: 10.0,
            })]
        );
    }

    #[test]
    fn quick_second_click_is_double_click() {
        let mut h = Harness::new(ControlOptions::default());
        h.send(down(50.0, 50.0));
        h.send(up(50.0, 50.0));
        h.wait(Duration::from_millis(150));
        h.send(down(51.0, 50.0));
        h.send(up(51.0, 50.0));

        assert_eq!(
            h.events(),
            vec![
                click_at(50.0, 50.0),
                ViewerEvent::DoubleClick(ClickData {
                    rightclick: false,
                    x: 50.0,
                    y: 50.0,
                }),
            ]
        );
    }

    #[test]
    fn slow_second_click_is_independent() {
        let mut h = Harness::new(ControlOptions::default());
        h.send(down(50.0, 50.0));
        h.send(up(50.0, 50.0));
        h.wait(Duration::from_millis(400));
        h.send(down(50.0, 50.0));
        h.send(up(50.0, 50.0));

        assert_eq!(h.events(), vec![click_at(50.0, 50.0), click_at(50.0, 50.0)]);
    }

    fn fling(h: &mut Harness) {
        let _ = h.camera.rotate(Position {
            yaw: std::f64::consts::PI,
            pitch: 0.0,
        });
        h.send(down(400.0, 300.0));
        for i in 1..=10 {
            h.clock.advance(FRAME);
            h.send(InputEvent::PointerMove {
                x: 400.0 + 10.0 * f64::from(i),
                y: 300.0,
            });
        }
        h.send(up(500.0, 300.0));
    }

    #[test]
    fn release_glides_with_decreasing_steps() {
        let mut h = Harness::new(ControlOptions::default());
        fling(&mut h);
        assert_eq!(h.recognizer.step(), Step::Inertia);

        let mut steps = Vec::new();
        let mut frames = 0;
        while h.recognizer.step() == Step::Inertia {
            let before = h.camera.position().yaw;
            let _ = h.tick();
            steps.push(shortest_arc(before, h.camera.position().yaw).abs());
            frames += 1;
            assert!(frames <= 70, "glide did not end");
        }

        assert!(steps[0] > 0.0);
        for pair in steps.windows(2) {
            assert!(pair[1] < pair[0], "{steps:?}");
        }
        assert_eq!(h.recognizer.step(), Step::Idle);
        assert!(h.camera.is_idle());
    }

    #[test]
    fn release_without_inertia_goes_idle() {
        let controls = ControlOptions {
            move_inertia: false,
            ..ControlOptions::default()
        };
        let mut h = Harness::new(controls);
        fling(&mut h);
        assert_eq!(h.recognizer.step(), Step::Idle);
    }

    #[test]
    fn press_during_glide_cancels_it() {
        let mut h = Harness::new(ControlOptions::default());
        fling(&mut h);
        let _ = h.tick();
        h.send(down(10.0, 10.0));
        assert_eq!(h.recognizer.step(), Step::Click);
        assert!(h.recognizer.inertia.is_none());
        let yaw = h.camera.position().yaw;
        let _ = h.tick();
        assert_eq!(h.camera.position().yaw, yaw);
    }

    #[test]
    fn long_press_is_right_click() {
        let mut h = Harness::new(ControlOptions::default());
        h.send(InputEvent::TouchStart {
            touches: vec![DVec2::new(50.0, 60.0)],
        });
        h.wait(Duration::from_millis(499));
        assert!(h.events().is_empty());
        h.wait(Duration::from_millis(1));

        assert_eq!(
            h.events(),
            vec![ViewerEvent::Click(ClickData {
                rightclick: true,
                x: 50.0,
                y: 60.0,
            })]
        );
        assert_eq!(h.recognizer.step(), Step::Idle);
    }

    #[test]
    fn moving_finger_cancels_long_press() {
        let mut h = Harness::new(ControlOptions::default());
        h.send(InputEvent::TouchStart {
            touches: vec![DVec2::new(50.0, 60.0)],
        });
        h.send(InputEvent::TouchMove {
            touches: vec![DVec2::new(80.0, 60.0)],
        });
        h.wait(Duration::from_millis(600));
        assert!(h.events().is_empty());
        assert_eq!(h.recognizer.step(), Step::Moving);
    }

    #[test]
    fn pinch_zooms_and_falls_back_to_drag() {
        let mut h = Harness::new(ControlOptions::default());
        h.send(InputEvent::TouchStart {
            touches: vec![DVec2::new(100.0, 100.0), DVec2::new(200.0, 100.0)],
        });
        assert_eq!(h.recognizer.step(), Step::Moving);
        h.send(InputEvent::TouchMove {
            touches: vec![DVec2::new(50.0, 100.0), DVec2::new(250.0, 100.0)],
        });
        // 80 · 100 px / 800 px
        assert!((h.camera.zoom_level() - 60.0).abs() < 1e-9);

        h.send(InputEvent::TouchEnd {
            touches: vec![DVec2::new(250.0, 100.0)],
            changed: vec![DVec2::new(50.0, 100.0)],
        });
        assert_eq!(h.recognizer.step(), Step::Moving);
        let before = h.camera.position().yaw;
        h.send(InputEvent::TouchMove {
            touches: vec![DVec2::new(240.0, 100.0)],
        });
        assert!(shortest_arc(before, h.camera.position().yaw) > 0.0);

        h.send(InputEvent::TouchEnd {
            touches: Vec::new(),
            changed: vec![DVec2::new(240.0, 100.0)],
        });
        assert_ne!(h.recognizer.step(), Step::Moving);
    }

    #[test]
    fn one_finger_asks_for_two_when_required() {
        let controls = ControlOptions {
            touchmove_two_fingers: true,
            ..ControlOptions::default()
        };
        let mut h = Harness::new(controls);
        let yaw = h.camera.position().yaw;
        h.send(InputEvent::TouchStart {
            touches: vec![DVec2::new(10.0, 10.0)],
        });
        h.send(InputEvent::TouchMove {
            touches: vec![DVec2::new(60.0, 10.0)],
        });
        assert_eq!(h.camera.position().yaw, yaw);
        h.wait(TWO_FINGERS_HINT_DELAY);
        assert_eq!(h.events(), vec![ViewerEvent::ShowHint(Hint::TwoFingers)]);

        h.send(InputEvent::TouchEnd {
            touches: Vec::new(),
            changed: vec![DVec2::new(60.0, 10.0)],
        });
        assert_eq!(h.events(), vec![ViewerEvent::HideHint(Hint::TwoFingers)]);
        assert_eq!(h.recognizer.step(), Step::Idle);
    }

    #[test]
    fn wheel_steps_zoom_with_ramp() {
        let mut h = Harness::new(ControlOptions::default());
        h.send(InputEvent::Wheel {
            delta_y: -120.0,
            ctrl: false,
        });
        assert_eq!(h.camera.zoom_mut().target(), 55.0);
        assert_eq!(h.camera.zoom_level(), 50.0);
        assert!(h.tick());
        assert!(h.camera.zoom_level() > 50.0);
    }

    #[test]
    fn wheel_without_ctrl_shows_hint() {
        let controls = ControlOptions {
            mousewheel_ctrl_key: true,
            ..ControlOptions::default()
        };
        let mut h = Harness::new(controls);
        h.send(InputEvent::Wheel {
            delta_y: 120.0,
            ctrl: false,
        });
        assert_eq!(h.events(), vec![ViewerEvent::ShowHint(Hint::CtrlZoom)]);
        assert_eq!(h.camera.zoom_mut().mode(), DynamicMode::Stop);

        h.wait(CTRL_ZOOM_HINT_TIMEOUT);
        assert_eq!(h.events(), vec![ViewerEvent::HideHint(Hint::CtrlZoom)]);

        h.send(InputEvent::Wheel {
            delta_y: 120.0,
            ctrl: true,
        });
        assert_eq!(h.camera.zoom_mut().target(), 45.0);
    }

    #[test]
    fn short_key_tap_still_moves() {
        let controls = ControlOptions {
            keyboard: KeyboardMode::Always,
            ..ControlOptions::default()
        };
        let mut h = Harness::new(controls);
        let yaw = h.camera.position().yaw;
        h.send(InputEvent::KeyDown {
            key: "ArrowRight".to_owned(),
        });
        let _ = h.tick();
        h.send(InputEvent::KeyUp {
            key: "ArrowRight".to_owned(),
        });
        assert_eq!(
            h.camera.position_mut().get(Axis::Yaw).unwrap().mode(),
            DynamicMode::Infinite
        );

        // the stop lands a full minimum press after the release
        for _ in 0..14 {
            let _ = h.tick();
        }
        assert_eq!(
            h.camera.position_mut().get(Axis::Yaw).unwrap().mode(),
            DynamicMode::Stop
        );
        assert!(shortest_arc(yaw, h.camera.position().yaw) > 0.0);
    }

    fn key(h: &mut Harness, name: &str, pressed: bool) {
        let key = name.to_owned();
        h.send(if pressed {
            InputEvent::KeyDown { key }
        } else {
            InputEvent::KeyUp { key }
        });
    }

    fn yaw_mode(h: &mut Harness) -> DynamicMode {
        h.camera.position_mut().get(Axis::Yaw).unwrap().mode()
    }

    #[test]
    fn zoom_and_rotation_keys_are_independent() {
        let controls = ControlOptions {
            keyboard: KeyboardMode::Always,
            ..ControlOptions::default()
        };
        let mut h = Harness::new(controls);
        key(&mut h, "ArrowRight", true);
        h.wait(Duration::from_millis(500));

        key(&mut h, "PageUp", true);
        assert_eq!(h.camera.zoom_mut().mode(), DynamicMode::Infinite);
        assert_eq!(yaw_mode(&mut h), DynamicMode::Infinite);

        // a short zoom tap stops the zoom only
        h.wait(Duration::from_millis(50));
        key(&mut h, "PageUp", false);
        h.wait(Duration::from_millis(300));
        assert_eq!(h.camera.zoom_mut().mode(), DynamicMode::Stop);
        assert_eq!(yaw_mode(&mut h), DynamicMode::Infinite);

        key(&mut h, "ArrowRight", false);
        assert_eq!(yaw_mode(&mut h), DynamicMode::Stop);
    }

    #[test]
    fn rotation_key_leaves_held_zoom_rolling() {
        let controls = ControlOptions {
            keyboard: KeyboardMode::Always,
            ..ControlOptions::default()
        };
        let mut h = Harness::new(controls);
        key(&mut h, "PageDown", true);
        key(&mut h, "ArrowLeft", true);
        assert_eq!(h.camera.zoom_mut().mode(), DynamicMode::Infinite);
        assert_eq!(yaw_mode(&mut h), DynamicMode::Infinite);
    }

    #[test]
    fn releasing_an_ignored_key_keeps_the_held_one() {
        let controls = ControlOptions {
            keyboard: KeyboardMode::Always,
            ..ControlOptions::default()
        };
        let mut h = Harness::new(controls);
        key(&mut h, "ArrowRight", true);
        h.wait(Duration::from_millis(500));
        key(&mut h, "ArrowLeft", true);
        key(&mut h, "ArrowLeft", false);
        assert_eq!(yaw_mode(&mut h), DynamicMode::Infinite);
        assert_eq!(h.camera.position_mut().get(Axis::Yaw).unwrap().target(), f64::INFINITY);
    }

    #[test]
    fn keyboard_follows_fullscreen() {
        let mut h = Harness::new(ControlOptions::default());
        h.send(InputEvent::KeyDown {
            key: "PageUp".to_owned(),
        });
        assert_eq!(h.camera.zoom_mut().mode(), DynamicMode::Stop);

        h.send(InputEvent::FullscreenChanged(true));
        h.send(InputEvent::KeyDown {
            key: "PageUp".to_owned(),
        });
        assert_eq!(h.camera.zoom_mut().mode(), DynamicMode::Infinite);
    }

    #[test]
    fn command_key_is_reported() {
        let controls = ControlOptions {
            keyboard: KeyboardMode::Always,
            ..ControlOptions::default()
        };
        let mut h = Harness::new(controls);
        h.recognizer
            .bindings_mut()
            .bind("h", KeyAction::Command("help".to_owned()));
        h.send(InputEvent::KeyDown {
            key: "h".to_owned(),
        });
        assert_eq!(h.events(), vec![ViewerEvent::KeyCommand("help".to_owned())]);
    }

    #[test]
    fn teardown_clears_timers() {
        let controls = ControlOptions {
            mousewheel_ctrl_key: true,
            ..ControlOptions::default()
        };
        let mut h = Harness::new(controls);
        h.send(InputEvent::TouchStart {
            touches: vec![DVec2::new(5.0, 5.0)],
        });
        h.send(InputEvent::Wheel {
            delta_y: 1.0,
            ctrl: false,
        });
        let _ = h.events();
        assert!(!h.recognizer.timers.is_empty());

        h.recognizer.teardown(&mut h.camera);
        assert!(h.recognizer.timers.is_empty());
        assert_eq!(h.recognizer.step(), Step::Idle);
        h.wait(Duration::from_secs(5));
        assert!(h.events().is_empty());
    }

    #[test]
    fn touch_cancel_drops_the_gesture() {
        let mut h = Harness::new(ControlOptions::default());
        h.send(InputEvent::TouchStart {
            touches: vec![DVec2::new(50.0, 50.0)],
        });
        h.send(InputEvent::TouchMove {
            touches: vec![DVec2::new(70.0, 50.0)],
        });
        assert_eq!(h.recognizer.step(), Step::Moving);

        h.send(InputEvent::TouchCancel);
        assert_eq!(h.recognizer.step(), Step::Idle);
        h.wait(LONG_TOUCH_DELAY * 2);
        assert!(h.events().is_empty());
        assert!(!h.tick());
    }
}
