//! Bloom post-processing pass. Extracts bright pixels and adds a soft glow.
//!
//! Pipeline: luminance high-pass into a half-resolution target → five mip
//! levels, each blurred with a separable Gaussian whose kernel widens with
//! depth → weighted sum of all five levels added onto the scene color.
//!
//! Every texture is sized once at construction. There is no `resize`: when
//! the viewport changes the renderer drops the pass and builds a new one at
//! the same position in the chain.

use wgpu::util::DeviceExt;

use crate::error::GridGlowError;
use crate::gpu::pipeline_helpers::{
    additive_blend, begin_screen_pass, create_screen_space_pipeline,
    filtering_sampler, linear_sampler, sampled_uniform_bind_group,
    sampled_uniform_layout, texture_2d, uniform_buffer,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::texture::{RenderTarget, SCENE_COLOR_FORMAT};
use crate::options::BloomOptions;
use crate::renderer::postprocess::screen_pass::{
    PassKind, PassTargets, ScreenPass,
};

/// Number of blurred mip levels.
pub const MIP_LEVELS: usize = 5;

/// Gaussian kernel radius per mip level.
const KERNEL_RADII: [i32; MIP_LEVELS] = [3, 5, 7, 9, 11];

/// Base contribution of each mip level before `radius` is applied.
const BLOOM_FACTORS: [f32; MIP_LEVELS] = [1.0, 0.8, 0.6, 0.4, 0.2];

/// Threshold params — must match WGSL struct
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct ThresholdParams {
    threshold: f32,
    smooth_width: f32,
    _pad: [f32; 2],
}

/// Blur direction params — must match WGSL struct
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct BlurParams {
    texel_size: [f32; 2],
    direction: [f32; 2],
    kernel_radius: i32,
    sigma: f32,
    _pad: [f32; 2],
}

/// Composite weights — must match WGSL struct
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct CompositeParams {
    weights: [[f32; 4]; 2],
}

/// Per-level composite weight.
///
/// Each base factor `f` moves toward its mirror `1.2 - f` as `radius` goes
/// from 0 to 1, so a larger radius shifts energy into the blurrier levels.
/// The result is scaled by `strength`.
#[must_use]
pub fn bloom_weights(strength: f32, radius: f32) -> [f32; MIP_LEVELS] {
    BLOOM_FACTORS.map(|f| strength * (f + (1.2 - 2.0 * f) * radius))
}

/// Texture size of each mip level for a `width` x `height` viewport.
///
/// Level 0 is half the viewport (rounded up); each next level halves again.
#[must_use]
pub fn mip_sizes(width: u32, height: u32) -> [(u32, u32); MIP_LEVELS] {
    let mut size = (width.div_ceil(2).max(1), height.div_ceil(2).max(1));
    let mut sizes = [(1, 1); MIP_LEVELS];
    for slot in &mut sizes {
        *slot = size;
        size = (size.0.div_ceil(2).max(1), size.1.div_ceil(2).max(1));
    }
    sizes
}

fn create_mip_chain(
    device: &wgpu::Device,
    sizes: &[(u32, u32); MIP_LEVELS],
    label: &str,
) -> Vec<RenderTarget> {
    sizes
        .iter()
        .enumerate()
        .map(|(i, &(w, h))| {
            RenderTarget::new(
                device,
                &format!("{label} {i}"),
                w,
                h,
                SCENE_COLOR_FORMAT,
            )
        })
        .collect()
}

/// Unreal-style bloom at a fixed resolution.
pub struct BloomPass {
    threshold_pipeline: wgpu::RenderPipeline,
    sampled_layout: wgpu::BindGroupLayout,
    threshold_bind_group: wgpu::BindGroup,
    threshold_buffer: wgpu::Buffer,

    blur_pipeline: wgpu::RenderPipeline,
    // [level][0=horizontal, 1=vertical]
    blur_bind_groups: Vec<[wgpu::BindGroup; 2]>,

    composite_pipeline: wgpu::RenderPipeline,
    composite_bind_group: wgpu::BindGroup,

    bright: RenderTarget,
    horizontal: Vec<RenderTarget>,
    vertical: Vec<RenderTarget>,
    sampler: wgpu::Sampler,

    strength: f32,
    width: u32,
    height: u32,
}

impl BloomPass {
    /// Build every bloom resource for a `width` x `height` viewport, reading
    /// from `scene_view`.
    ///
    /// # Errors
    ///
    /// Returns [`GridGlowError::ShaderCompose`] if a bloom shader fails to
    /// compose.
    pub fn new(
        context: &RenderContext,
        scene_view: &wgpu::TextureView,
        (width, height): (u32, u32),
        options: &BloomOptions,
        shader_composer: &mut ShaderComposer,
    ) -> Result<Self, GridGlowError> {
        let device = &context.device;
        let sizes = mip_sizes(width, height);
        let sampler = linear_sampler(device, "Bloom Sampler");
        let sampled_layout =
            sampled_uniform_layout(device, "Bloom Sampled Layout");

        // --- Threshold ---
        let threshold_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Bloom Threshold Buffer"),
                contents: bytemuck::cast_slice(&[ThresholdParams {
                    threshold: options.threshold,
                    smooth_width: options.smooth_width,
                    _pad: [0.0; 2],
                }]),
                usage: wgpu::BufferUsages::UNIFORM,
            });
        let threshold_bind_group = sampled_uniform_bind_group(
            device,
            "Bloom Threshold Bind Group",
            &sampled_layout,
            scene_view,
            &sampler,
            &threshold_buffer,
        );
        let threshold_shader = shader_composer.compose(
            device,
            "Bloom Threshold Shader",
            include_str!("../../../assets/shaders/screen/bloom_threshold.wgsl"),
            "bloom_threshold.wgsl",
        )?;
        let threshold_pipeline = create_screen_space_pipeline(
            device,
            "Bloom Threshold",
            &threshold_shader,
            SCENE_COLOR_FORMAT,
            None,
            &[&sampled_layout],
        );

        let (w0, h0) = sizes[0];
        let bright =
            RenderTarget::new(device, "Bloom Bright", w0, h0, SCENE_COLOR_FORMAT);
        let horizontal = create_mip_chain(device, &sizes, "Bloom Blur H");
        let vertical = create_mip_chain(device, &sizes, "Bloom Blur V");

        // --- Blur ---
        let blur_shader = shader_composer.compose(
            device,
            "Bloom Blur Shader",
            include_str!("../../../assets/shaders/screen/bloom_blur.wgsl"),
            "bloom_blur.wgsl",
        )?;
        let blur_pipeline = create_screen_space_pipeline(
            device,
            "Bloom Blur",
            &blur_shader,
            SCENE_COLOR_FORMAT,
            None,
            &[&sampled_layout],
        );
        let blur_bind_groups = (0..MIP_LEVELS)
            .map(|level| {
                // Level 0 blurs the bright pass; deeper levels blur the
                // previous level's result, halving as they go.
                let source = if level == 0 {
                    &bright.view
                } else {
                    &vertical[level - 1].view
                };
                let (w, h) = sizes[level];
                let texel_size = [1.0 / w as f32, 1.0 / h as f32];
                let make = |direction: [f32; 2],
                            input: &wgpu::TextureView,
                            tag: &str| {
                    let params = BlurParams {
                        texel_size,
                        direction,
                        kernel_radius: KERNEL_RADII[level],
                        sigma: KERNEL_RADII[level] as f32,
                        _pad: [0.0; 2],
                    };
                    let buffer = device.create_buffer_init(
                        &wgpu::util::BufferInitDescriptor {
                            label: Some(&format!("Bloom Blur {tag} Params {level}")),
                            contents: bytemuck::cast_slice(&[params]),
                            usage: wgpu::BufferUsages::UNIFORM,
                        },
                    );
                    sampled_uniform_bind_group(
                        device,
                        &format!("Bloom Blur {tag} BG {level}"),
                        &sampled_layout,
                        input,
                        &sampler,
                        &buffer,
                    )
                };
                [
                    make([1.0, 0.0], source, "H"),
                    make([0.0, 1.0], &horizontal[level].view, "V"),
                ]
            })
            .collect();

        // --- Composite ---
        let weights = bloom_weights(options.strength, options.radius);
        let composite_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Bloom Composite Buffer"),
                contents: bytemuck::cast_slice(&[CompositeParams {
                    weights: [
                        [weights[0], weights[1], weights[2], weights[3]],
                        [weights[4], 0.0, 0.0, 0.0],
                    ],
                }]),
                usage: wgpu::BufferUsages::UNIFORM,
            });
        let composite_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Bloom Composite Layout"),
                entries: &[
                    texture_2d(0),
                    texture_2d(1),
                    texture_2d(2),
                    texture_2d(3),
                    texture_2d(4),
                    filtering_sampler(5),
                    uniform_buffer(6),
                ],
            });
        let mut composite_entries: Vec<wgpu::BindGroupEntry<'_>> = vertical
            .iter()
            .enumerate()
            .map(|(i, target)| wgpu::BindGroupEntry {
                binding: i as u32,
                resource: wgpu::BindingResource::TextureView(&target.view),
            })
            .collect();
        composite_entries.push(wgpu::BindGroupEntry {
            binding: 5,
            resource: wgpu::BindingResource::Sampler(&sampler),
        });
        composite_entries.push(wgpu::BindGroupEntry {
            binding: 6,
            resource: composite_buffer.as_entire_binding(),
        });
        let composite_bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Bloom Composite Bind Group"),
                layout: &composite_layout,
                entries: &composite_entries,
            });
        let composite_shader = shader_composer.compose(
            device,
            "Bloom Composite Shader",
            include_str!("../../../assets/shaders/screen/bloom_composite.wgsl"),
            "bloom_composite.wgsl",
        )?;
        let composite_pipeline = create_screen_space_pipeline(
            device,
            "Bloom Composite",
            &composite_shader,
            SCENE_COLOR_FORMAT,
            Some(additive_blend()),
            &[&composite_layout],
        );

        log::debug!(
            "bloom built at {width}x{height}, mip 0 {w0}x{h0}, weights {weights:?}"
        );

        Ok(Self {
            threshold_pipeline,
            sampled_layout,
            threshold_bind_group,
            threshold_buffer,
            blur_pipeline,
            blur_bind_groups,
            composite_pipeline,
            composite_bind_group,
            bright,
            horizontal,
            vertical,
            sampler,
            strength: options.strength,
            width,
            height,
        })
    }

    /// Viewport size this pass was built for.
    #[must_use]
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn blur_level(&self, encoder: &mut wgpu::CommandEncoder, level: usize) {
        let [h_bg, v_bg] = &self.blur_bind_groups[level];
        {
            let mut pass = begin_screen_pass(
                encoder,
                "Bloom Blur H",
                &self.horizontal[level].view,
                wgpu::LoadOp::Clear(wgpu::Color::BLACK),
            );
            pass.set_pipeline(&self.blur_pipeline);
            pass.set_bind_group(0, h_bg, &[]);
            pass.draw(0..3, 0..1);
        }
        {
            let mut pass = begin_screen_pass(
                encoder,
                "Bloom Blur V",
                &self.vertical[level].view,
                wgpu::LoadOp::Clear(wgpu::Color::BLACK),
            );
            pass.set_pipeline(&self.blur_pipeline);
            pass.set_bind_group(0, v_bg, &[]);
            pass.draw(0..3, 0..1);
        }
    }
}

impl ScreenPass for BloomPass {
    fn kind(&self) -> PassKind {
        PassKind::Bloom
    }

    /// Threshold → blur each level → composite onto the scene.
    fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        targets: &PassTargets<'_>,
    ) {
        if self.strength <= 0.0 {
            return;
        }

        {
            let mut pass = begin_screen_pass(
                encoder,
                "Bloom Threshold",
                &self.bright.view,
                wgpu::LoadOp::Clear(wgpu::Color::BLACK),
            );
            pass.set_pipeline(&self.threshold_pipeline);
            pass.set_bind_group(0, &self.threshold_bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        for level in 0..MIP_LEVELS {
            self.blur_level(encoder, level);
        }

        let mut pass = begin_screen_pass(
            encoder,
            "Bloom Composite",
            targets.scene,
            wgpu::LoadOp::Load,
        );
        pass.set_pipeline(&self.composite_pipeline);
        pass.set_bind_group(0, &self.composite_bind_group, &[]);
        pass.draw(0..3, 0..1);
    }

    fn rebind_input(
        &mut self,
        context: &RenderContext,
        scene_view: &wgpu::TextureView,
    ) {
        self.threshold_bind_group = sampled_uniform_bind_group(
            &context.device,
            "Bloom Threshold Bind Group",
            &self.sampled_layout,
            scene_view,
            &self.sampler,
            &self.threshold_buffer,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn zero_radius_keeps_base_factors() {
        let w = bloom_weights(1.0, 0.0);
        for (got, want) in w.iter().zip(BLOOM_FACTORS) {
            assert!(approx(*got, want), "{w:?}");
        }
    }

    #[test]
    fn full_radius_mirrors_factors() {
        let w = bloom_weights(1.0, 1.0);
        let want = [0.2, 0.4, 0.6, 0.8, 1.0];
        for (got, want) in w.iter().zip(want) {
            assert!(approx(*got, want), "{w:?}");
        }
    }

    #[test]
    fn default_weights_scale_with_strength() {
        let options = BloomOptions::default();
        let w = bloom_weights(options.strength, options.radius);
        // 0.1 * (1.0 + (1.2 - 2.0) * 0.4)
        assert!(approx(w[0], 0.068));
        assert!(approx(w[2], 0.06));
        assert_eq!(bloom_weights(0.0, 0.4), [0.0; MIP_LEVELS]);
    }

    #[test]
    fn mip_chain_halves_from_half_resolution() {
        let sizes = mip_sizes(1920, 1080);
        assert_eq!(
            sizes,
            [(960, 540), (480, 270), (240, 135), (120, 68), (60, 34)]
        );
    }

    #[test]
    fn mip_chain_never_reaches_zero() {
        let sizes = mip_sizes(3, 1);
        assert_eq!(sizes, [(2, 1), (1, 1), (1, 1), (1, 1), (1, 1)]);
    }

    #[test]
    fn kernels_widen_with_depth() {
        assert!(KERNEL_RADII.windows(2).all(|w| w[0] < w[1]));
    }
}
