use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Surface", inline)]
#[serde(default)]
/// Output surface appearance and frame pacing.
pub struct SurfaceOptions {
    /// Background clear color (linear RGB).
    #[schemars(skip)]
    pub clear_color: [f32; 3],
    /// Frame cap (0 = render on every display refresh).
    #[schemars(title = "Max FPS", range(min = 0, max = 240))]
    pub max_fps: u32,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            clear_color: [1.0, 1.0, 1.0],
            max_fps: 0,
        }
    }
}
