//! Scene description: what gets drawn, independent of the GPU.
//!
//! The scene is fixed for the lifetime of a renderer: one instanced capsule
//! mesh, one directional light, one hemisphere light and a clear color. Only
//! the camera and the per-instance transforms change per frame, and those are
//! owned by the animator.

use glam::Vec3;

use crate::gpu::lighting::direction_or_up;
use crate::layout::GridConfiguration;
use crate::options::{LightingOptions, Options};
use crate::renderer::geometry::capsule::CapsuleGeometry;

/// The capsule mesh drawn once per grid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct InstancedMesh {
    /// Shape shared by every instance.
    pub geometry: CapsuleGeometry,
    /// Surface base color (linear RGB).
    pub albedo: [f32; 3],
    /// Instance count and placement.
    pub grid: GridConfiguration,
}

/// A light at `position` shining toward `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLight {
    /// Linear RGB color.
    pub color: [f32; 3],
    /// Scalar intensity.
    pub intensity: f32,
    /// Where the light sits.
    pub position: Vec3,
    /// Where the light is aimed.
    pub target: Vec3,
}

impl DirectionalLight {
    /// Light from the `[lighting]` options section.
    #[must_use]
    pub fn from_options(options: &LightingOptions) -> Self {
        Self {
            color: options.directional_color,
            intensity: options.directional_intensity,
            position: Vec3::from_array(options.directional_position),
            target: Vec3::from_array(options.directional_target),
        }
    }

    /// Unit vector from a lit surface back toward the light.
    #[must_use]
    pub fn direction_to_light(&self) -> Vec3 {
        direction_or_up(self.target, self.position)
    }
}

/// Sky/ground gradient light.
#[derive(Debug, Clone, PartialEq)]
pub struct HemisphereLight {
    /// Color received by upward-facing normals.
    pub sky_color: [f32; 3],
    /// Color received by downward-facing normals.
    pub ground_color: [f32; 3],
    /// Scalar intensity.
    pub intensity: f32,
}

/// Everything the renderer draws.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneGraph {
    /// The instanced capsule grid.
    pub mesh: InstancedMesh,
    /// Key light.
    pub directional: DirectionalLight,
    /// Ambient gradient light.
    pub hemisphere: HemisphereLight,
    /// Background color (linear RGB).
    pub clear_color: [f32; 3],
}

impl SceneGraph {
    /// Assemble the scene from options.
    #[must_use]
    pub fn from_options(options: &Options) -> Self {
        let lighting = &options.lighting;
        Self {
            mesh: InstancedMesh {
                geometry: CapsuleGeometry::default(),
                albedo: lighting.albedo,
                grid: GridConfiguration::from_options(&options.grid),
            },
            directional: DirectionalLight::from_options(lighting),
            hemisphere: HemisphereLight {
                sky_color: lighting.sky_color,
                ground_color: lighting.ground_color,
                intensity: lighting.hemisphere_intensity,
            },
            clear_color: options.surface.clear_color,
        }
    }

    /// Background color as a wgpu clear value.
    #[must_use]
    pub fn clear_color(&self) -> wgpu::Color {
        let [r, g, b] = self.clear_color;
        wgpu::Color {
            r: f64::from(r),
            g: f64::from(g),
            b: f64::from(b),
            a: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scene_is_white_on_white() {
        let scene = SceneGraph::from_options(&Options::default());
        assert_eq!(scene.clear_color, [1.0, 1.0, 1.0]);
        assert_eq!(scene.mesh.albedo, [1.0, 1.0, 1.0]);
        assert_eq!(scene.clear_color(), wgpu::Color::WHITE);
    }

    #[test]
    fn default_scene_carries_the_thousand_capsule_grid() {
        let scene = SceneGraph::from_options(&Options::default());
        assert_eq!(scene.mesh.grid.instance_count(), 1000);
        assert_eq!(scene.mesh.grid.row_count(), 31);
        assert_eq!(scene.mesh.geometry, CapsuleGeometry::default());
    }

    #[test]
    fn lights_follow_options() {
        let mut options = Options::default();
        options.lighting.directional_intensity = 2.0;
        options.lighting.hemisphere_intensity = 0.5;
        let scene = SceneGraph::from_options(&options);
        assert_eq!(scene.directional.intensity, 2.0);
        assert_eq!(scene.directional.target, Vec3::new(0.0, 1.0, 1.0));
        assert_eq!(scene.hemisphere.intensity, 0.5);
    }
}
