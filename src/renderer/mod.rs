//! Rendering subsystems for the capsule grid.
//!
//! [`GridRenderer`] is the wgpu [`Compositor`]: it draws the instanced
//! capsules into an HDR scene target, then runs the post-processing chain
//! (bloom, then output to the surface).

/// Instanced capsule draw pass.
pub mod capsule_grid;
/// Bind groups shared by scene draw calls.
pub mod draw_context;
/// Procedural mesh generation.
pub mod geometry;
pub(crate) mod pipeline_util;
pub mod postprocess;

use crate::animator::{Compositor, FrameSubmission};
use crate::camera::controller::CameraBinding;
use crate::camera::core::Camera;
use crate::error::GridGlowError;
use crate::gpu::lighting::{Lighting, LightingUniform};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::texture::{RenderTarget, DEPTH_FORMAT, SCENE_COLOR_FORMAT};
use crate::host::ViewportSize;
use crate::options::{BloomOptions, Options};
use crate::scene::SceneGraph;
use capsule_grid::CapsuleGridRenderer;
use draw_context::DrawBindGroups;
use postprocess::bloom::BloomPass;
use postprocess::chain::PassChain;
use postprocess::output::OutputPass;
use postprocess::screen_pass::{PassKind, PassTargets, ScreenPass};

fn create_targets(context: &RenderContext) -> (RenderTarget, RenderTarget) {
    let (w, h) = (context.width(), context.height());
    (
        RenderTarget::new(&context.device, "Scene Color", w, h, SCENE_COLOR_FORMAT),
        RenderTarget::new(&context.device, "Scene Depth", w, h, DEPTH_FORMAT),
    )
}

/// wgpu renderer for the capsule grid.
pub struct GridRenderer {
    context: RenderContext,
    shader_composer: ShaderComposer,
    camera: CameraBinding,
    lighting: Lighting,
    capsules: CapsuleGridRenderer,
    scene_color: RenderTarget,
    depth: RenderTarget,
    chain: PassChain<Box<dyn ScreenPass>>,
    bloom_options: BloomOptions,
    clear_color: wgpu::Color,
}

impl GridRenderer {
    /// Create the GPU context on `target` and build every pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`GridGlowError::Gpu`] if no usable adapter, device or
    /// surface configuration is found, or [`GridGlowError::ShaderCompose`]
    /// if a shader fails to compose.
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        viewport: ViewportSize,
        scene: &SceneGraph,
        options: &Options,
    ) -> Result<Self, GridGlowError> {
        let context =
            RenderContext::new(target, (viewport.width, viewport.height))
                .await?;
        let mut shader_composer = ShaderComposer::new()?;

        let camera = CameraBinding::new(
            &context,
            &Camera::new(&options.camera, viewport.aspect()),
        );
        let lighting = Lighting::new(
            &context,
            LightingUniform::new(
                &scene.directional,
                &scene.hemisphere,
                scene.mesh.albedo,
            ),
        );
        let capsules = CapsuleGridRenderer::new(
            &context,
            &scene.mesh.geometry,
            scene.mesh.grid.instance_count(),
            &[&camera.layout, &lighting.layout],
            &mut shader_composer,
        )?;

        let (scene_color, depth) = create_targets(&context);
        let mut chain: PassChain<Box<dyn ScreenPass>> = PassChain::new();
        chain.add_pass(Box::new(BloomPass::new(
            &context,
            &scene_color.view,
            (context.width(), context.height()),
            &options.bloom,
            &mut shader_composer,
        )?));
        chain.add_pass(Box::new(OutputPass::new(
            &context,
            &scene_color.view,
            &mut shader_composer,
        )?));

        log::info!(
            "renderer ready: {} capsules at {}x{}",
            scene.mesh.grid.instance_count(),
            context.width(),
            context.height()
        );

        Ok(Self {
            context,
            shader_composer,
            camera,
            lighting,
            capsules,
            scene_color,
            depth,
            chain,
            bloom_options: options.bloom.clone(),
            clear_color: scene.clear_color(),
        })
    }

    /// The underlying GPU context.
    #[must_use]
    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Append a post-processing pass.
    pub fn add_pass(&mut self, pass: Box<dyn ScreenPass>) {
        self.chain.add_pass(pass);
    }

    /// Insert a post-processing pass at `index` (clamped to the chain).
    pub fn insert_pass(&mut self, index: usize, pass: Box<dyn ScreenPass>) {
        self.chain.insert_pass(index, pass);
    }

    /// Remove the first pass of `kind`, returning it with its former index.
    pub fn remove_pass(
        &mut self,
        kind: PassKind,
    ) -> Option<(usize, Box<dyn ScreenPass>)> {
        self.chain.remove_pass(|p| p.kind() == kind)
    }

    fn draw_scene(&self, encoder: &mut wgpu::CommandEncoder) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.scene_color.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(
                wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                },
            ),
            ..Default::default()
        });
        self.capsules.draw(
            &mut pass,
            &DrawBindGroups {
                camera: &self.camera.bind_group,
                lighting: &self.lighting.bind_group,
            },
        );
    }
}

impl Compositor for GridRenderer {
    fn set_size(&mut self, viewport: ViewportSize) {
        self.context.resize(viewport.width, viewport.height);
        let (scene_color, depth) = create_targets(&self.context);
        self.scene_color = scene_color;
        self.depth = depth;
        for pass in self.chain.iter_mut() {
            pass.rebind_input(&self.context, &self.scene_color.view);
        }
    }

    fn rebuild_bloom(
        &mut self,
        viewport: ViewportSize,
    ) -> Result<(), GridGlowError> {
        let bloom = BloomPass::new(
            &self.context,
            &self.scene_color.view,
            (viewport.width, viewport.height),
            &self.bloom_options,
            &mut self.shader_composer,
        )?;
        let index = match self.remove_pass(PassKind::Bloom) {
            Some((index, _old)) => index,
            None => {
                log::warn!("no bloom pass in chain, inserting at the front");
                0
            }
        };
        self.insert_pass(index, Box::new(bloom));
        Ok(())
    }

    fn render(
        &mut self,
        frame: &FrameSubmission<'_>,
    ) -> Result<(), GridGlowError> {
        self.camera.update_gpu(&self.context.queue, frame.camera);
        self.capsules.upload_instances(&self.context, frame.instances);

        let output = self.context.get_next_frame()?;
        let surface_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.context.create_encoder();
        self.draw_scene(&mut encoder);
        let targets = PassTargets {
            scene: &self.scene_color.view,
            surface: &surface_view,
        };
        for pass in self.chain.iter() {
            pass.render(&mut encoder, &targets);
        }
        self.context.submit(encoder);
        output.present();
        Ok(())
    }
}
