//! Centralized background options with TOML/JSON support.
//!
//! Everything tweakable about the background (grid layout, camera, lights,
//! bloom, surface) lives here. Defaults reproduce the stock look; options
//! serialize to TOML for the native viewer and to JSON for the web host.

mod bloom;
mod camera;
mod grid;
mod lighting;
mod surface;

use std::path::Path;

pub use bloom::BloomOptions;
pub use camera::CameraOptions;
pub use grid::GridOptions;
pub use lighting::LightingOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use surface::SurfaceOptions;

use crate::error::GridGlowError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial files (e.g. only overriding `[bloom]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Instance count and layout constants.
    pub grid: GridOptions,
    /// Camera projection and scroll response.
    pub camera: CameraOptions,
    /// Directional and hemisphere lights.
    pub lighting: LightingOptions,
    /// Bloom post-processing parameters.
    pub bloom: BloomOptions,
    /// Clear color and frame pacing.
    pub surface: SurfaceOptions,
}

impl Options {
    /// Generate JSON Schema describing the options, for host-side settings
    /// panels.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, GridGlowError> {
        let content = std::fs::read_to_string(path).map_err(GridGlowError::Io)?;
        toml::from_str(&content)
            .map_err(|e| GridGlowError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), GridGlowError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| GridGlowError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(GridGlowError::Io)?;
        }
        std::fs::write(path, content).map_err(GridGlowError::Io)
    }

    /// Parse options from a JSON string (the web host passes them this way).
    pub fn from_json(json: &str) -> Result<Self, GridGlowError> {
        serde_json::from_str(json)
            .map_err(|e| GridGlowError::OptionsParse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[bloom]
strength = 0.4
";
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.bloom.strength, 0.4);
        // Everything else should be default
        assert_eq!(opts.bloom.threshold, 0.85);
        assert_eq!(opts.grid.instance_count, 1000);
        assert_eq!(opts.camera.fovy, 75.0);
    }

    #[test]
    fn defaults_match_stock_background() {
        let opts = Options::default();
        assert_eq!(opts.grid.origin_x, 5.5);
        assert_eq!(opts.grid.origin_y, 3.0);
        assert_eq!(opts.grid.spacing, 0.3);
        assert_eq!(opts.grid.depth, -2.0);
        assert_eq!(opts.camera.scroll_factor, -0.001);
        assert_eq!(opts.camera.znear, 0.1);
        assert_eq!(opts.camera.zfar, 1000.0);
        assert_eq!(opts.bloom.radius, 0.4);
        assert_eq!(opts.lighting.directional_target, [0.0, 1.0, 1.0]);
        assert_eq!(opts.surface.clear_color, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn json_overrides_nested_field() {
        let opts =
            Options::from_json(r#"{ "grid": { "instance_count": 64 } }"#)
                .unwrap();
        assert_eq!(opts.grid.instance_count, 64);
        assert_eq!(opts.grid.spacing, 0.3);
    }

    #[test]
    fn malformed_json_is_an_options_error() {
        let err = Options::from_json("{ grid: ").unwrap_err();
        assert!(matches!(err, GridGlowError::OptionsParse(_)));
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = std::env::temp_dir().join("gridglow-options-test");
        let path = dir.join("preset.toml");
        let mut opts = Options::default();
        opts.grid.instance_count = 256;
        opts.bloom.threshold = 0.5;
        opts.save(&path).unwrap();
        let loaded = Options::load(&path).unwrap();
        assert_eq!(loaded, opts);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        for section in ["grid", "camera", "lighting", "bloom", "surface"] {
            assert!(props.contains_key(section), "missing {section}");
        }

        let bloom = &props["bloom"]["properties"];
        assert!(bloom.get("strength").is_some());
        assert!(bloom.get("smooth_width").is_none());
    }
}
