use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Lighting", inline)]
#[serde(default)]
/// One directional light plus a sky/ground hemisphere light.
pub struct LightingOptions {
    /// Directional light color (linear RGB).
    #[schemars(skip)]
    pub directional_color: [f32; 3],
    /// Directional light intensity.
    #[schemars(title = "Key Light", range(min = 0.0, max = 3.0), extend("step" = 0.05))]
    pub directional_intensity: f32,
    /// Directional light position. The light shines from here toward
    /// `directional_target`.
    #[schemars(skip)]
    pub directional_position: [f32; 3],
    /// Point the directional light is aimed at.
    #[schemars(skip)]
    pub directional_target: [f32; 3],
    /// Hemisphere light color for upward-facing normals (linear RGB).
    #[schemars(skip)]
    pub sky_color: [f32; 3],
    /// Hemisphere light color for downward-facing normals (linear RGB).
    #[schemars(skip)]
    pub ground_color: [f32; 3],
    /// Hemisphere light intensity.
    #[schemars(title = "Ambient", range(min = 0.0, max = 2.0), extend("step" = 0.01))]
    pub hemisphere_intensity: f32,
    /// Material base color (linear RGB).
    #[schemars(skip)]
    pub albedo: [f32; 3],
}

/// Decode one sRGB-encoded channel to linear.
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            directional_color: [1.0, 1.0, 1.0],
            directional_intensity: 0.75,
            directional_position: [0.0, 1.0, 0.0],
            directional_target: [0.0, 1.0, 1.0],
            sky_color: [1.0, 1.0, 1.0],
            // #cccccc
            ground_color: [srgb_to_linear(0.8); 3],
            hemisphere_intensity: 0.99,
            albedo: [1.0, 1.0, 1.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srgb_decode_endpoints() {
        assert_eq!(srgb_to_linear(0.0), 0.0);
        assert!((srgb_to_linear(1.0) - 1.0).abs() < 1e-6);
        assert!((srgb_to_linear(0.02) - 0.02 / 12.92).abs() < 1e-9);
    }

    #[test]
    fn default_ground_is_cccccc_in_linear() {
        let ground = LightingOptions::default().ground_color;
        for c in ground {
            assert!((c - 0.603_8).abs() < 1e-3, "{ground:?}");
        }
    }
}
