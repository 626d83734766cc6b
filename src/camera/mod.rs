//! Camera motion state: yaw/pitch, zoom level and field of view.
//!
//! [`CameraDynamics`] owns the velocity-seeking controllers behind the view
//! direction and the zoom level, the viewport geometry needed to turn pixel
//! deltas into angles, and the cancel handle of whatever animation is
//! currently steering the camera.

use std::f64::consts::TAU;
use std::time::Duration;

use crate::animation::Tween;
use crate::dynamics::{Dynamic, DynamicConfig, MultiDynamic, Values};
use crate::error::SwivelError;
use crate::options::CameraOptions;
use crate::util::math::{self, HALF_PI};

/// Member names of the position composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal angle, wraps over `[0, 2π)`.
    Yaw,
    /// Vertical angle, clamped to `[-π/2, π/2]`.
    Pitch,
}

/// View direction in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    /// Horizontal angle.
    pub yaw: f64,
    /// Vertical angle.
    pub pitch: f64,
}

impl Position {
    fn from_values(values: &Values<Axis>) -> Self {
        Self {
            yaw: values.get(&Axis::Yaw).copied().unwrap_or_default(),
            pitch: values.get(&Axis::Pitch).copied().unwrap_or_default(),
        }
    }
}

/// Size of the interactive surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in CSS / logical pixels.
    pub width: f64,
    /// Height in CSS / logical pixels.
    pub height: f64,
    /// Device pixels per logical pixel.
    pub pixel_ratio: f64,
}

impl Viewport {
    /// Width over height (1 for a degenerate viewport).
    #[must_use]
    pub fn aspect(&self) -> f64 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            pixel_ratio: 1.0,
        }
    }
}

/// Yaw/pitch composite, zoom scalar and viewport of one viewer.
pub struct CameraDynamics {
    position: MultiDynamic<Axis>,
    zoom: Dynamic,
    min_fov: f64,
    max_fov: f64,
    move_speed: f64,
    zoom_speed: f64,
    viewport: Viewport,
    animation: Option<Tween>,
}

impl CameraDynamics {
    /// Build from options. `on_position` and `on_zoom` receive the initial
    /// values, then every change.
    pub fn new(
        options: &CameraOptions,
        mut on_position: impl FnMut(Position) + 'static,
        on_zoom: impl FnMut(f64) + 'static,
    ) -> Result<Self, SwivelError> {
        let (min_fov, max_fov) = (options.min_fov, options.max_fov);
        let valid = 0.0 < min_fov && min_fov <= max_fov && max_fov < 180.0;
        if !valid {
            return Err(SwivelError::InvalidRange {
                min: min_fov,
                max: max_fov,
            });
        }

        let yaw = Dynamic::detached(DynamicConfig {
            min: 0.0,
            max: TAU,
            default_value: options.default_yaw.to_radians(),
            wrap: true,
        })?;
        let pitch = Dynamic::detached(DynamicConfig {
            min: -HALF_PI,
            max: HALF_PI,
            default_value: options.default_pitch.to_radians(),
            wrap: false,
        })?;
        let position = MultiDynamic::new(
            move |values: &Values<Axis>| {
                on_position(Position::from_values(values));
            },
            [(Axis::Yaw, yaw), (Axis::Pitch, pitch)],
        );
        let zoom = Dynamic::new(
            on_zoom,
            DynamicConfig {
                min: 0.0,
                max: 100.0,
                default_value: options.default_zoom_level,
                wrap: false,
            },
        )?;

        let mut camera = Self {
            position,
            zoom,
            min_fov,
            max_fov,
            move_speed: options.move_speed,
            zoom_speed: options.zoom_speed,
            viewport: Viewport::default(),
            animation: None,
        };
        camera.apply_speeds();
        Ok(camera)
    }

    fn apply_speeds(&mut self) {
        self.position
            .set_speed((self.move_speed * 50.0).to_radians());
        self.zoom.set_speed(self.zoom_speed * 50.0);
    }

    /// Current view direction.
    #[must_use]
    pub fn position(&self) -> Position {
        Position::from_values(&self.position.current())
    }

    /// Current zoom level, 0..=100.
    #[must_use]
    pub fn zoom_level(&self) -> f64 {
        self.zoom.current()
    }

    /// Vertical field of view in degrees for the current zoom level.
    #[must_use]
    pub fn vfov(&self) -> f64 {
        self.fov_at(self.zoom.current())
    }

    /// Vertical field of view in degrees at zoom `level`.
    #[must_use]
    pub fn fov_at(&self, level: f64) -> f64 {
        math::zoom_level_to_fov(level, self.min_fov, self.max_fov)
    }

    /// Zoom level at which the vertical field of view is `fov` degrees,
    /// clamped to 0..=100.
    #[must_use]
    pub fn zoom_level_for(&self, fov: f64) -> f64 {
        math::fov_to_zoom_level(fov, self.min_fov, self.max_fov)
    }

    /// Horizontal field of view in degrees.
    #[must_use]
    pub fn hfov(&self) -> f64 {
        math::vfov_to_hfov(self.vfov(), self.viewport.aspect())
    }

    /// Viewport geometry.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Replace the viewport geometry (on resize or DPI change).
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Drag / keyboard rotation multiplier.
    #[must_use]
    pub fn move_speed(&self) -> f64 {
        self.move_speed
    }

    /// Wheel / pinch / keyboard zoom multiplier.
    #[must_use]
    pub fn zoom_speed(&self) -> f64 {
        self.zoom_speed
    }

    /// Change the rotation multiplier (also rescales the position
    /// dynamics).
    pub fn set_move_speed(&mut self, speed: f64) {
        self.move_speed = speed;
        self.apply_speeds();
    }

    /// Change the zoom multiplier (also rescales the zoom dynamic).
    pub fn set_zoom_speed(&mut self, speed: f64) {
        self.zoom_speed = speed;
        self.apply_speeds();
    }

    /// The yaw/pitch composite.
    pub fn position_mut(&mut self) -> &mut MultiDynamic<Axis> {
        &mut self.position
    }

    /// The zoom controller.
    pub fn zoom_mut(&mut self) -> &mut Dynamic {
        &mut self.zoom
    }

    /// Snap the view direction. Returns whether it changed.
    pub fn rotate(&mut self, position: Position) -> bool {
        self.position
            .set_value([(Axis::Yaw, position.yaw), (Axis::Pitch, position.pitch)])
    }

    /// Snap the zoom level. Returns whether it changed.
    pub fn zoom_to(&mut self, level: f64) -> bool {
        self.zoom.set_value(level)
    }

    /// Advance both controllers by one frame. Returns whether anything
    /// moved.
    pub fn update(&mut self, elapsed: Duration) -> bool {
        let moved = self.position.update(elapsed);
        let zoomed = self.zoom.update(elapsed);
        moved || zoomed
    }

    /// Whether both controllers are at rest and no animation is running.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.animation.is_none()
            && self.zoom.is_idle()
            && [Axis::Yaw, Axis::Pitch]
                .iter()
                .all(|&axis| self.position.get(axis).is_none_or(Dynamic::is_idle))
    }

    /// Make `tween` the active animation, cancelling a different one.
    pub fn set_animation(&mut self, tween: Tween) {
        if let Some(previous) = self.animation.take() {
            if !previous.ptr_eq(&tween) {
                previous.cancel();
            }
        }
        self.animation = Some(tween);
    }

    /// Forget `tween` if it is the active animation.
    pub fn clear_animation(&mut self, tween: &Tween) {
        if self.animation.as_ref().is_some_and(|t| t.ptr_eq(tween)) {
            self.animation = None;
        }
    }

    /// Cancel the active animation, if any. Returns whether one was
    /// running.
    pub fn stop_animation(&mut self) -> bool {
        match self.animation.take() {
            Some(tween) => {
                let running = !tween.is_settled();
                tween.cancel();
                running
            }
            None => false,
        }
    }

    /// Brake every controller and cancel the active animation.
    pub fn stop_all(&mut self) {
        self.position.stop();
        self.zoom.stop();
        let _ = self.stop_animation();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;
    use crate::animation::TweenOptions;

    fn camera() -> (CameraDynamics, Rc<RefCell<Vec<Position>>>, Rc<Cell<f64>>) {
        let positions = Rc::new(RefCell::new(Vec::new()));
        let zoom = Rc::new(Cell::new(-1.0));
        let (p, z) = (Rc::clone(&positions), Rc::clone(&zoom));
        let camera = CameraDynamics::new(
            &CameraOptions::default(),
            move |pos| p.borrow_mut().push(pos),
            move |level| z.set(level),
        )
        .unwrap();
        (camera, positions, zoom)
    }

    #[test]
    fn construction_reports_initial_values() {
        let (camera, positions, zoom) = camera();
        assert_eq!(positions.borrow().len(), 1);
        assert_eq!(zoom.get(), 50.0);
        assert_eq!(camera.zoom_level(), 50.0);
        assert!(camera.is_idle());
    }

    #[test]
    fn fov_follows_zoom_level() {
        let (mut camera, _, _) = camera();
        assert!((camera.vfov() - 60.0).abs() < 1e-9);
        assert!(camera.zoom_to(0.0));
        assert!((camera.vfov() - 90.0).abs() < 1e-9);
        assert!(camera.zoom_to(100.0));
        assert!((camera.vfov() - 30.0).abs() < 1e-9);
        assert!((camera.zoom_level_for(45.0) - 75.0).abs() < 1e-9);
        assert_eq!(camera.zoom_level_for(120.0), 0.0);

        camera.set_viewport(Viewport {
            width: 1200.0,
            height: 600.0,
            pixel_ratio: 1.0,
        });
        assert!(camera.hfov() > camera.vfov());
    }

    #[test]
    fn rotate_wraps_yaw_and_clamps_pitch() {
        let (mut camera, positions, _) = camera();
        assert!(camera.rotate(Position {
            yaw: -1.0,
            pitch: 3.0,
        }));
        let pos = camera.position();
        assert!((pos.yaw - (TAU - 1.0)).abs() < 1e-12);
        assert_eq!(pos.pitch, HALF_PI);
        assert_eq!(*positions.borrow().last().unwrap(), pos);
    }

    #[test]
    fn invalid_fov_range_is_rejected() {
        let options = CameraOptions {
            min_fov: 100.0,
            max_fov: 50.0,
            ..CameraOptions::default()
        };
        assert!(matches!(
            CameraDynamics::new(&options, |_| {}, |_| {}),
            Err(SwivelError::InvalidRange { .. })
        ));
    }

    #[test]
    fn update_ticks_position_and_zoom() {
        let (mut camera, _, zoom) = camera();
        camera.position_mut().roll([(Axis::Yaw, false)], 1.0);
        camera.zoom_mut().roll(false, 1.0);
        assert!(camera.update(Duration::from_millis(16)));
        assert!(camera.position().yaw > 0.0);
        assert!(zoom.get() > 50.0);
        assert!(!camera.is_idle());
    }

    #[test]
    fn stop_all_cancels_animation() {
        let (mut camera, _, _) = camera();
        let tween = Tween::new(
            TweenOptions::new(Duration::from_secs(1)).property("x", 0.0, 1.0),
        );
        camera.set_animation(tween.clone());
        camera.zoom_mut().roll(true, 1.0);

        camera.stop_all();
        assert_eq!(tween.outcome(), Some(false));
        assert_eq!(
            camera.zoom_mut().mode(),
            crate::dynamics::DynamicMode::Stop
        );
        assert!(!camera.stop_animation());
    }

    #[test]
    fn replacing_animation_cancels_previous() {
        let (mut camera, _, _) = camera();
        let first = Tween::new(TweenOptions::new(Duration::from_secs(1)));
        let second = Tween::new(TweenOptions::new(Duration::from_secs(1)));
        camera.set_animation(first.clone());
        camera.set_animation(second.clone());
        assert_eq!(first.outcome(), Some(false));
        assert!(!second.is_settled());

        camera.clear_animation(&first);
        assert!(camera.stop_animation());
    }
}
