use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Grid", inline)]
#[serde(default)]
/// Instance count and grid layout constants.
pub struct GridOptions {
    /// Number of capsule instances. Rows hold `floor(sqrt(count))` cells.
    #[schemars(title = "Instances", range(min = 0, max = 10000))]
    pub instance_count: u32,
    /// X of the first column; later columns step toward -X.
    #[schemars(skip)]
    pub origin_x: f32,
    /// Y of the first row; later rows step toward -Y.
    #[schemars(skip)]
    pub origin_y: f32,
    /// Distance between neighbouring cells.
    #[schemars(title = "Spacing", range(min = 0.05, max = 1.0), extend("step" = 0.05))]
    pub spacing: f32,
    /// Z plane the grid sits on.
    #[schemars(title = "Depth", range(min = -10.0, max = -0.5), extend("step" = 0.1))]
    pub depth: f32,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            instance_count: 1000,
            origin_x: 5.5,
            origin_y: 3.0,
            spacing: 0.3,
            depth: -2.0,
        }
    }
}
