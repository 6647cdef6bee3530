//! Instanced capsule draw pass.
//!
//! One static capsule mesh (vertex + index buffer, uploaded once) drawn
//! `instance_count` times. The per-instance model matrices live in a
//! growable vertex buffer that is rewritten every frame.

use wgpu::util::DeviceExt;

use crate::error::GridGlowError;
use crate::gpu::dynamic_buffer::TypedBuffer;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::layout::InstanceTransform;
use crate::renderer::draw_context::DrawBindGroups;
use crate::renderer::geometry::capsule::{CapsuleGeometry, MeshVertex};
use crate::renderer::pipeline_util;

const INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
    2 => Float32x4,
    3 => Float32x4,
    4 => Float32x4,
    5 => Float32x4,
];

/// Instance buffer layout (slot 1, one mat4 per instance).
fn instance_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: size_of::<InstanceTransform>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &INSTANCE_ATTRIBUTES,
    }
}

fn create_instanced_pipeline(
    context: &RenderContext,
    label: &str,
    shader: &wgpu::ShaderModule,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
) -> wgpu::RenderPipeline {
    let pipeline_layout = context.device.create_pipeline_layout(
        &wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{label} Layout")),
            bind_group_layouts,
            push_constant_ranges: &[],
        },
    );

    context
        .device
        .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[MeshVertex::layout(), instance_layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &pipeline_util::scene_fragment_targets(),
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                // Pole rings are degenerate and winding is not relied on.
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(pipeline_util::depth_stencil_state()),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
}

/// Draws the capsule grid into the HDR scene target.
pub struct CapsuleGridRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    instances: TypedBuffer<InstanceTransform>,
}

impl CapsuleGridRenderer {
    /// Build the pipeline and upload the capsule mesh.
    ///
    /// `bind_group_layouts` are the camera (group 0) and lighting (group 1)
    /// layouts.
    ///
    /// # Errors
    ///
    /// Returns [`GridGlowError::ShaderCompose`] if the mesh shader fails to
    /// compose.
    pub fn new(
        context: &RenderContext,
        geometry: &CapsuleGeometry,
        instance_capacity: u32,
        bind_group_layouts: &[&wgpu::BindGroupLayout],
        shader_composer: &mut ShaderComposer,
    ) -> Result<Self, GridGlowError> {
        let shader = shader_composer.compose(
            &context.device,
            "Capsule Instanced Shader",
            include_str!("../../assets/shaders/raster/capsule_instanced.wgsl"),
            "capsule_instanced.wgsl",
        )?;
        let pipeline = create_instanced_pipeline(
            context,
            "Capsule Instanced Pipeline",
            &shader,
            bind_group_layouts,
        );

        let (vertices, indices) = geometry.generate();
        log::debug!(
            "capsule mesh: {} vertices, {} indices",
            vertices.len(),
            indices.len()
        );
        let vertex_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Capsule Vertex Buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );
        let index_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Capsule Index Buffer"),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        );

        let instances = TypedBuffer::with_capacity(
            &context.device,
            "Capsule Instance Buffer",
            instance_capacity as usize,
            wgpu::BufferUsages::VERTEX,
        );

        Ok(Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            instances,
        })
    }

    /// Replace this frame's instance transforms.
    pub fn upload_instances(
        &mut self,
        context: &RenderContext,
        transforms: &[InstanceTransform],
    ) {
        let _ = self
            .instances
            .write(&context.device, &context.queue, transforms);
    }

    /// Instances drawn by the next [`draw`](Self::draw).
    #[must_use]
    pub fn instance_count(&self) -> u32 {
        self.instances.count() as u32
    }

    /// Record the instanced draw. No-op for an empty grid.
    pub fn draw(
        &self,
        render_pass: &mut wgpu::RenderPass<'_>,
        bind_groups: &DrawBindGroups<'_>,
    ) {
        if self.instances.is_empty() || self.index_count == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, bind_groups.camera, &[]);
        render_pass.set_bind_group(1, bind_groups.lighting, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.instances.buffer().slice(..));
        render_pass.set_index_buffer(
            self.index_buffer.slice(..),
            wgpu::IndexFormat::Uint32,
        );
        render_pass.draw_indexed(0..self.index_count, 0, 0..self.instance_count());
    }
}
