use glam::Vec3;
use wgpu::util::DeviceExt;

use crate::gpu::render_context::RenderContext;
use crate::scene::{DirectionalLight, HemisphereLight};

/// Lighting configuration shared by the mesh shader.
/// NOTE: Must match WGSL struct layout exactly (80 bytes)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    /// Directional light color (linear RGB)
    pub directional_color: [f32; 3],
    /// Directional light intensity
    pub directional_intensity: f32,
    /// Unit vector from the surface toward the directional light
    pub directional_dir: [f32; 3],
    /// Hemisphere light intensity
    pub hemisphere_intensity: f32,
    /// Hemisphere color for upward normals
    pub sky_color: [f32; 3],
    /// Padding to 16-byte alignment
    pub pad_sky: f32,
    /// Hemisphere color for downward normals
    pub ground_color: [f32; 3],
    /// Padding
    pub pad_ground: f32,
    /// Material base color
    pub albedo: [f32; 3],
    /// Padding
    pub pad_albedo: f32,
}

impl LightingUniform {
    /// Pack the scene's lights and material into shader layout.
    pub fn new(
        directional: &DirectionalLight,
        hemisphere: &HemisphereLight,
        albedo: [f32; 3],
    ) -> Self {
        Self {
            directional_color: directional.color,
            directional_intensity: directional.intensity,
            directional_dir: directional.direction_to_light().to_array(),
            hemisphere_intensity: hemisphere.intensity,
            sky_color: hemisphere.sky_color,
            pad_sky: 0.0,
            ground_color: hemisphere.ground_color,
            pad_ground: 0.0,
            albedo,
            pad_albedo: 0.0,
        }
    }
}

/// Uniform buffer, layout and bind group for [`LightingUniform`].
pub struct Lighting {
    /// CPU copy of the uploaded uniform.
    pub uniform: LightingUniform,
    /// Uniform buffer (group 1, binding 0 in the mesh shader).
    pub buffer: wgpu::Buffer,
    /// Bind group layout shared with the capsule pipeline.
    pub layout: wgpu::BindGroupLayout,
    /// Bind group over `buffer`.
    pub bind_group: wgpu::BindGroup,
}

impl Lighting {
    /// Allocate the lighting buffer and bind group.
    pub fn new(context: &RenderContext, uniform: LightingUniform) -> Self {
        let buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Lighting Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            },
        );

        let layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Lighting Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            },
        );

        let bind_group =
            context.device.create_bind_group(&wgpu::BindGroupDescriptor {
                layout: &layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
                label: Some("Lighting Bind Group"),
            });

        Self {
            uniform,
            buffer,
            layout,
            bind_group,
        }
    }
}

/// Fallback when a light's position and target coincide.
pub(crate) fn direction_or_up(from: Vec3, to: Vec3) -> Vec3 {
    (to - from).try_normalize().unwrap_or(Vec3::Y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::LightingOptions;
    use crate::scene::SceneGraph;

    #[test]
    fn uniform_is_80_bytes() {
        assert_eq!(size_of::<LightingUniform>(), 80);
    }

    #[test]
    fn default_light_points_back_along_its_aim() {
        let options = crate::options::Options::default();
        let scene = SceneGraph::from_options(&options);
        let uniform = LightingUniform::new(
            &scene.directional,
            &scene.hemisphere,
            scene.mesh.albedo,
        );
        // Positioned at (0, 1, 0), aimed at (0, 1, 1): light arrives along +Z.
        assert_eq!(uniform.directional_dir, [0.0, 0.0, -1.0]);
        assert_eq!(uniform.ground_color, options.lighting.ground_color);
        assert!(uniform.ground_color[0] < 0.8);
        assert!((uniform.hemisphere_intensity - 0.99).abs() < 1e-6);
    }

    #[test]
    fn coincident_position_and_target_falls_back_to_up() {
        let lighting = LightingOptions {
            directional_target: [0.0, 1.0, 0.0],
            ..LightingOptions::default()
        };
        let light = DirectionalLight::from_options(&lighting);
        assert_eq!(light.direction_to_light(), Vec3::Y);
    }
}
