//! Viewer-level façade tying the camera, the gesture recognizer and API
//! animations to one per-frame tick.

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;
use std::time::Duration;

use crate::animation::{AnimationSpeed, Tween, TweenOptions, TweenValues};
use crate::camera::{CameraDynamics, Position, Viewport};
use crate::error::SwivelError;
use crate::input::{GestureRecognizer, InputEvent, Step, ViewerEvent};
use crate::options::Options;
use crate::util::easing::Easing;
use crate::util::math::{self, HALF_PI};
use crate::util::timer::Clock;

/// Shortest animated transition.
pub const MIN_ANIMATION: Duration = Duration::from_millis(500);

/// Target of [`Navigator::animate`]. Unset fields keep their current
/// value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimateOptions {
    /// Target yaw in radians (any value; wrapped).
    pub yaw: Option<f64>,
    /// Target pitch in radians (clamped).
    pub pitch: Option<f64>,
    /// Target zoom level (clamped to 0..=100).
    pub zoom: Option<f64>,
    /// Target vertical field of view in degrees. Ignored when `zoom` is
    /// set.
    pub fov: Option<f64>,
    /// Transition speed; the configured default when unset.
    pub speed: Option<AnimationSpeed>,
}

/// Result of one [`Navigator::tick`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameUpdate {
    /// Whether the camera changed and the host should redraw.
    pub redraw: bool,
    /// Events produced by timers during this tick.
    pub events: Vec<ViewerEvent>,
}

struct Animation {
    tween: Tween,
    values: Rc<RefCell<Option<TweenValues>>>,
}

/// Motion controller of one panorama viewer.
///
/// The host feeds it input with [`handle_input`](Self::handle_input),
/// calls [`tick`](Self::tick) once per displayed frame, and receives
/// camera values through the callbacks given at construction.
///
/// # Example
///
/// ```ignore
/// let mut nav = Navigator::new(&options, Rc::new(SystemClock::new()),
///     |pos| renderer.set_direction(pos), |level| renderer.set_zoom(level))?;
/// for event in nav.handle_input(input) { host.dispatch(event); }
/// if nav.tick(frame_time).redraw { renderer.draw(); }
/// ```
pub struct Navigator {
    camera: CameraDynamics,
    recognizer: GestureRecognizer,
    animation: Option<Animation>,
    animation_speed: AnimationSpeed,
    destroyed: bool,
}

impl Navigator {
    /// Build the camera and the recognizer from `options`.
    pub fn new(
        options: &Options,
        clock: Rc<dyn Clock>,
        on_position: impl FnMut(Position) + 'static,
        on_zoom: impl FnMut(f64) + 'static,
    ) -> Result<Self, SwivelError> {
        let camera = CameraDynamics::new(&options.camera, on_position, on_zoom)?;
        let recognizer =
            GestureRecognizer::new(&options.controls, &options.keybindings, clock);
        log::debug!(
            "navigator ready: zoom {} fov {}..{}",
            camera.zoom_level(),
            options.camera.min_fov,
            options.camera.max_fov
        );
        Ok(Self {
            camera,
            recognizer,
            animation: None,
            animation_speed: options.camera.animation_speed,
            destroyed: false,
        })
    }

    /// Feed one input event. Returns the events it produced.
    pub fn handle_input(&mut self, event: InputEvent) -> Vec<ViewerEvent> {
        if self.destroyed {
            log::debug!("input after destroy ignored");
            return Vec::new();
        }
        self.recognizer.handle_event(event, &mut self.camera);
        self.recognizer.take_events()
    }

    /// Advance gestures, the running animation and the camera dynamics by
    /// one frame.
    pub fn tick(&mut self, elapsed: Duration) -> FrameUpdate {
        if self.destroyed {
            return FrameUpdate::default();
        }
        let gestures = self.recognizer.tick(elapsed, &mut self.camera);
        let animated = self.tick_animation(elapsed);
        let dynamics = self.camera.update(elapsed);
        FrameUpdate {
            redraw: gestures || animated || dynamics,
            events: self.recognizer.take_events(),
        }
    }

    fn tick_animation(&mut self, elapsed: Duration) -> bool {
        let Some(animation) = self.animation.as_ref() else {
            return false;
        };
        let pending = animation.tween.update(elapsed);
        let values = animation.values.borrow_mut().take();

        let changed = values.is_some_and(|values| self.apply(&values));
        if !pending {
            if let Some(animation) = self.animation.take() {
                self.camera.clear_animation(&animation.tween);
            }
        }
        changed
    }

    fn apply(&mut self, values: &TweenValues) -> bool {
        let current = self.camera.position();
        let moved = if values.contains_key("yaw") || values.contains_key("pitch") {
            self.camera.rotate(Position {
                yaw: values.get("yaw").copied().unwrap_or(current.yaw),
                pitch: values.get("pitch").copied().unwrap_or(current.pitch),
            })
        } else {
            false
        };
        let zoomed = values
            .get("zoom")
            .is_some_and(|&level| self.camera.zoom_to(level));
        moved || zoomed
    }

    /// Animate to a position and/or zoom level.
    ///
    /// Yaw takes the short way around. The duration comes from the speed:
    /// a fixed duration, or an angular rate applied to the great-circle
    /// distance (or to the field-of-view change for a zoom-only move). A
    /// zero duration applies the target at once and returns an already
    /// resolved tween; otherwise the transition lasts at least
    /// [`MIN_ANIMATION`]. Any running animation or glide is cancelled.
    pub fn animate(&mut self, options: AnimateOptions) -> Result<Tween, SwivelError> {
        for (property, value) in [
            ("yaw", options.yaw),
            ("pitch", options.pitch),
            ("zoom", options.zoom),
            ("fov", options.fov),
        ] {
            if let Some(value) = value.filter(|v| !v.is_finite()) {
                return Err(SwivelError::InvalidTarget { property, value });
            }
        }

        self.stop_all();
        let current = self.camera.position();
        let current_zoom = self.camera.zoom_level();

        let yaw = options.yaw.map(|yaw| {
            current.yaw + math::shortest_arc(current.yaw, math::wrap(yaw, TAU))
        });
        let pitch = options.pitch.map(|pitch| pitch.clamp(-HALF_PI, HALF_PI));
        let zoom = options
            .zoom
            .map(|zoom| zoom.clamp(0.0, 100.0))
            .or_else(|| options.fov.map(|fov| self.camera.zoom_level_for(fov)));

        let angle = math::angle_between(
            current.yaw,
            current.pitch,
            yaw.unwrap_or(current.yaw),
            pitch.unwrap_or(current.pitch),
        );
        let fov_change = zoom.map_or(0.0, |zoom| {
            (self.camera.fov_at(zoom) - self.camera.vfov()).abs().to_radians()
        });
        let speed = options.speed.unwrap_or(self.animation_speed);
        let duration = speed.duration_for(angle.max(fov_change));

        let mut tween_options = TweenOptions::new(duration.max(MIN_ANIMATION))
            .easing(Easing::InOutSine);
        for (name, start, end) in [
            ("yaw", current.yaw, yaw),
            ("pitch", current.pitch, pitch),
            ("zoom", current_zoom, zoom),
        ] {
            if let Some(end) = end.filter(|&end| end != start) {
                tween_options = tween_options.property(name, start, end);
            }
        }

        if duration.is_zero() || tween_options.properties.is_empty() {
            let mut values = TweenValues::default();
            for (name, range) in &tween_options.properties {
                let _ = values.insert(*name, range.end);
            }
            let _ = self.apply(&values);
            return Ok(Tween::resolved());
        }

        log::debug!("animating over {duration:?}");
        let values = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&values);
        let tween = Tween::new(tween_options.on_tick(move |v, _| {
            *sink.borrow_mut() = Some(v.clone());
        }));
        self.camera.set_animation(tween.clone());
        self.animation = Some(Animation {
            tween: tween.clone(),
            values,
        });
        Ok(tween)
    }

    /// Snap the view direction. Returns whether it changed.
    pub fn rotate(&mut self, position: Position) -> bool {
        self.camera.rotate(position)
    }

    /// Snap the zoom level. Returns whether it changed.
    pub fn zoom(&mut self, level: f64) -> bool {
        self.camera.zoom_to(level)
    }

    /// Ramp the zoom level up by `step`.
    pub fn zoom_in(&mut self, step: f64) {
        self.camera.zoom_mut().step(step, 1.0);
    }

    /// Ramp the zoom level down by `step`.
    pub fn zoom_out(&mut self, step: f64) {
        self.camera.zoom_mut().step(-step, 1.0);
    }

    /// Cancel the running animation or glide. Returns whether one was
    /// running.
    pub fn stop_animation(&mut self) -> bool {
        self.animation = None;
        self.camera.stop_animation()
    }

    /// Cancel animations and brake every controller.
    pub fn stop_all(&mut self) {
        self.animation = None;
        self.camera.stop_all();
    }

    /// Update the viewport after a resize.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.camera.set_viewport(viewport);
    }

    /// Change the rotation multiplier.
    pub fn set_move_speed(&mut self, speed: f64) {
        self.camera.set_move_speed(speed);
    }

    /// Change the zoom multiplier.
    pub fn set_zoom_speed(&mut self, speed: f64) {
        self.camera.set_zoom_speed(speed);
    }

    /// Enable keyboard control regardless of the configured mode.
    pub fn start_keyboard_control(&mut self) {
        self.recognizer.set_keyboard_enabled(true);
    }

    /// Disable keyboard control.
    pub fn stop_keyboard_control(&mut self) {
        self.recognizer.set_keyboard_enabled(false);
    }

    /// Current view direction.
    #[must_use]
    pub fn position(&self) -> Position {
        self.camera.position()
    }

    /// Current zoom level.
    #[must_use]
    pub fn zoom_level(&self) -> f64 {
        self.camera.zoom_level()
    }

    /// Current gesture phase.
    #[must_use]
    pub fn gesture(&self) -> Step {
        self.recognizer.step()
    }

    /// Read-only access to the camera state.
    #[must_use]
    pub fn camera(&self) -> &CameraDynamics {
        &self.camera
    }

    /// Mutable access to the recognizer (bindings, controls).
    pub fn recognizer_mut(&mut self) -> &mut GestureRecognizer {
        &mut self.recognizer
    }

    /// Whether [`destroy`](Self::destroy) has run.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Cancel everything and clear every pending timer. Later input and
    /// ticks are ignored.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.recognizer.teardown(&mut self.camera);
        self.stop_all();
        self.destroyed = true;
        log::debug!("navigator destroyed");
    }
}

impl Drop for Navigator {
    fn drop(&mut self) {
        self.destroy();
    }
}
