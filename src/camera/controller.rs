use wgpu::util::DeviceExt;

use crate::camera::core::{Camera, CameraUniform};
use crate::gpu::render_context::RenderContext;

/// GPU side of the camera: uniform buffer, layout, and bind group.
///
/// The [`Camera`] itself is owned by the animator and replaced on resize;
/// this only mirrors whatever camera the current frame was submitted with.
pub struct CameraBinding {
    /// Last uploaded uniform contents.
    pub uniform: CameraUniform,
    /// Uniform buffer (group 0, binding 0 in the mesh shader).
    pub buffer: wgpu::Buffer,
    /// Bind group layout shared with the capsule pipeline.
    pub layout: wgpu::BindGroupLayout,
    /// Bind group over `buffer`.
    pub bind_group: wgpu::BindGroup,
}

impl CameraBinding {
    /// Allocate the uniform buffer, initialised from `camera`.
    pub fn new(context: &RenderContext, camera: &Camera) -> Self {
        let uniform = CameraUniform::from_camera(camera);

        let buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });

        let layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX
                        | wgpu::ShaderStages::FRAGMENT,
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
                label: Some("Camera Bind Group"),
            });

        Self {
            uniform,
            buffer,
            layout,
            bind_group,
        }
    }

    /// Upload the camera's current view-projection.
    pub fn update_gpu(&mut self, queue: &wgpu::Queue, camera: &Camera) {
        self.uniform = CameraUniform::from_camera(camera);
        queue.write_buffer(
            &self.buffer,
            0,
            bytemuck::cast_slice(&[self.uniform]),
        );
    }
}
