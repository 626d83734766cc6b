use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::animation::AnimationSpeed;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Initial view, field-of-view bounds and motion speeds.
pub struct CameraOptions {
    /// Initial yaw in degrees.
    #[schemars(title = "Default Yaw", range(min = 0.0, max = 360.0), extend("step" = 1.0))]
    pub default_yaw: f64,
    /// Initial pitch in degrees.
    #[schemars(title = "Default Pitch", range(min = -90.0, max = 90.0), extend("step" = 1.0))]
    pub default_pitch: f64,
    /// Initial zoom level (0 = widest, 100 = narrowest).
    #[schemars(title = "Default Zoom", range(min = 0.0, max = 100.0), extend("step" = 1.0))]
    pub default_zoom_level: f64,
    /// Narrowest vertical field of view in degrees (zoom level 100).
    #[schemars(title = "Min FOV", range(min = 1.0, max = 179.0), extend("step" = 1.0))]
    pub min_fov: f64,
    /// Widest vertical field of view in degrees (zoom level 0).
    #[schemars(title = "Max FOV", range(min = 1.0, max = 179.0), extend("step" = 1.0))]
    pub max_fov: f64,
    /// Drag / keyboard rotation multiplier.
    #[schemars(title = "Move Speed", range(min = 0.1, max = 5.0), extend("step" = 0.1))]
    pub move_speed: f64,
    /// Wheel / pinch / keyboard zoom multiplier.
    #[schemars(title = "Zoom Speed", range(min = 0.1, max = 5.0), extend("step" = 0.1))]
    pub zoom_speed: f64,
    /// Default speed of animated transitions (`"1500"` ms or `"2rpm"`).
    #[schemars(skip)]
    pub animation_speed: AnimationSpeed,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            default_yaw: 0.0,
            default_pitch: 0.0,
            default_zoom_level: 50.0,
            min_fov: 30.0,
            max_fov: 90.0,
            move_speed: 1.0,
            zoom_speed: 1.0,
            animation_speed: AnimationSpeed::default(),
        }
    }
}
