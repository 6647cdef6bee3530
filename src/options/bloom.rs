use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Bloom", inline)]
#[serde(default)]
/// Bloom post-processing parameters.
pub struct BloomOptions {
    /// Overall glow strength. Zero disables the bloom pass.
    #[schemars(title = "Strength", range(min = 0.0, max = 3.0), extend("step" = 0.01))]
    pub strength: f32,
    /// Spread of the glow across mip levels (0 = tight, 1 = wide).
    #[schemars(title = "Radius", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub radius: f32,
    /// Luminance above which pixels start to glow.
    #[schemars(title = "Threshold", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub threshold: f32,
    /// Width of the soft knee above the threshold.
    #[schemars(skip)]
    pub smooth_width: f32,
}

impl Default for BloomOptions {
    fn default() -> Self {
        Self {
            strength: 0.1,
            radius: 0.4,
            threshold: 0.85,
            smooth_width: 0.01,
        }
    }
}
