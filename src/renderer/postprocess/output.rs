//! Final pass: HDR scene color → presentation surface.

use wgpu::util::DeviceExt;

use crate::error::GridGlowError;
use crate::gpu::pipeline_helpers::{
    begin_screen_pass, create_screen_space_pipeline, linear_sampler,
    sampled_uniform_bind_group, sampled_uniform_layout,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::renderer::postprocess::screen_pass::{
    PassKind, PassTargets, ScreenPass,
};

/// Gamma exponent applied in the shader for a surface format.
///
/// If sRGB, hardware does gamma correction → gamma = 1.0.
/// If linear, apply gamma = 1/2.2 in shader.
#[must_use]
pub fn output_gamma(format: wgpu::TextureFormat) -> f32 {
    if format.is_srgb() {
        1.0
    } else {
        1.0 / 2.2
    }
}

/// Copies the scene target onto the swapchain.
pub struct OutputPass {
    pipeline: wgpu::RenderPipeline,
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    params_buffer: wgpu::Buffer,
    sampler: wgpu::Sampler,
}

impl OutputPass {
    /// Build the output pipeline for the context's surface format.
    ///
    /// # Errors
    ///
    /// Returns [`GridGlowError::ShaderCompose`] if the output shader fails to
    /// compose.
    pub fn new(
        context: &RenderContext,
        scene_view: &wgpu::TextureView,
        shader_composer: &mut ShaderComposer,
    ) -> Result<Self, GridGlowError> {
        let device = &context.device;
        let gamma = output_gamma(context.format());
        let params_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Output Params Buffer"),
                contents: bytemuck::cast_slice(&[[gamma, 0.0, 0.0, 0.0]]),
                usage: wgpu::BufferUsages::UNIFORM,
            });
        let sampler = linear_sampler(device, "Output Sampler");
        let layout = sampled_uniform_layout(device, "Output Layout");
        let bind_group = sampled_uniform_bind_group(
            device,
            "Output Bind Group",
            &layout,
            scene_view,
            &sampler,
            &params_buffer,
        );

        let shader = shader_composer.compose(
            device,
            "Output Shader",
            include_str!("../../../assets/shaders/screen/output.wgsl"),
            "output.wgsl",
        )?;
        let pipeline = create_screen_space_pipeline(
            device,
            "Output",
            &shader,
            context.format(),
            None,
            &[&layout],
        );

        Ok(Self {
            pipeline,
            layout,
            bind_group,
            params_buffer,
            sampler,
        })
    }
}

impl ScreenPass for OutputPass {
    fn kind(&self) -> PassKind {
        PassKind::Output
    }

    fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        targets: &PassTargets<'_>,
    ) {
        let mut pass = begin_screen_pass(
            encoder,
            "Output",
            targets.surface,
            wgpu::LoadOp::Clear(wgpu::Color::BLACK),
        );
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..3, 0..1);
    }

    fn rebind_input(
        &mut self,
        context: &RenderContext,
        scene_view: &wgpu::TextureView,
    ) {
        self.bind_group = sampled_uniform_bind_group(
            &context.device,
            "Output Bind Group",
            &self.layout,
            scene_view,
            &self.sampler,
            &self.params_buffer,
        );
    }
}
