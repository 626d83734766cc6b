//! Viewer control options with TOML preset support.
//!
//! Camera bounds and speeds, pointer/keyboard behavior and key bindings are
//! consolidated here. Options serialize to/from TOML so hosts can keep
//! presets on disk; [`Options::json_schema`] describes the UI-exposed
//! subset.

mod camera;
mod controls;
mod keybindings;

use std::path::Path;

pub use camera::CameraOptions;
pub use controls::{ControlOptions, KeyboardMode};
pub use keybindings::KeybindingOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::SwivelError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[controls]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Initial view, FOV bounds and speeds.
    pub camera: CameraOptions,
    /// Pointer, touch, wheel and keyboard behavior.
    pub controls: ControlOptions,
    /// Keyboard binding options.
    #[schemars(skip)]
    pub keybindings: KeybindingOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, SwivelError> {
        let content = std::fs::read_to_string(path)?;
        let options = Self::from_toml(&content)?;
        log::info!("loaded options from {}", path.display());
        Ok(options)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    pub fn from_toml(content: &str) -> Result<Self, SwivelError> {
        toml::from_str(content)
            .map_err(|e| SwivelError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), SwivelError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SwivelError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        log::info!("saved options to {}", path.display());
        Ok(())
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationSpeed;
    use crate::input::KeyAction;

    #[test]
    fn default_round_trips_through_toml() {
        let mut opts = Options::default();
        opts.keybindings
            .bind("f", KeyAction::Command("fullscreen".to_owned()));
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[camera]
min_fov = 20.0
animation_speed = "1500"

[controls]
keyboard = "always"
"#;
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.camera.min_fov, 20.0);
        assert_eq!(
            opts.camera.animation_speed,
            AnimationSpeed::Duration(std::time::Duration::from_millis(1500))
        );
        assert_eq!(opts.controls.keyboard, KeyboardMode::Always);
        // Everything else should be default
        assert_eq!(opts.camera.max_fov, 90.0);
        assert!(opts.controls.move_inertia);
        assert_eq!(opts.controls.move_threshold, 4.0);
    }

    #[test]
    fn bad_values_are_parse_errors() {
        let err = Options::from_toml("[camera]\nanimation_speed = \"warp\"\n")
            .unwrap_err();
        assert!(matches!(err, SwivelError::OptionsParse(_)));
    }

    #[test]
    fn keybinding_lookup() {
        let opts = Options::default();
        assert_eq!(
            opts.keybindings.lookup("ArrowUp"),
            Some(&KeyAction::RotateUp)
        );
        assert_eq!(opts.keybindings.lookup("+"), Some(&KeyAction::ZoomIn));
        assert_eq!(opts.keybindings.lookup("KeyZ"), None);
    }

    #[test]
    fn save_load_and_list_presets() {
        let dir = std::env::temp_dir()
            .join(format!("swivel-presets-{}", std::process::id()));
        let mut opts = Options::default();
        opts.controls.mousewheel_ctrl_key = true;
        opts.save(&dir.join("kiosk.toml")).unwrap();
        Options::default().save(&dir.join("default.toml")).unwrap();

        assert_eq!(Options::list_presets(&dir), vec!["default", "kiosk"]);
        let loaded = Options::load(&dir.join("kiosk.toml")).unwrap();
        assert_eq!(loaded, opts);

        assert!(matches!(
            Options::load(&dir.join("missing.toml")),
            Err(SwivelError::Io(_))
        ));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("camera"));
        assert!(props.contains_key("controls"));
        assert!(!props.contains_key("keybindings"));

        let camera = &props["camera"]["properties"];
        assert!(camera.get("min_fov").is_some());
        assert!(camera.get("animation_speed").is_none());
    }
}
