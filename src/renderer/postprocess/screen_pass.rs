//! The post-processing pass interface and the per-frame targets passes draw into.

use crate::gpu::render_context::RenderContext;

/// Identifies a pass inside the post-processing chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassKind {
    /// Threshold + blur mip chain + additive composite onto the scene.
    Bloom,
    /// HDR scene copied to the presentation surface.
    Output,
}

/// Views a pass may draw into for the current frame.
pub struct PassTargets<'a> {
    /// HDR scene color (the capsules have already been drawn here).
    pub scene: &'a wgpu::TextureView,
    /// Swapchain view for this frame.
    pub surface: &'a wgpu::TextureView,
}

/// Uniform interface for fullscreen post-processing passes.
pub trait ScreenPass {
    /// Which pass this is.
    fn kind(&self) -> PassKind;
    /// Encode GPU commands for this pass.
    fn render(&self, encoder: &mut wgpu::CommandEncoder, targets: &PassTargets<'_>);
    /// Point the pass at a recreated scene color view.
    fn rebind_input(
        &mut self,
        _context: &RenderContext,
        _scene_view: &wgpu::TextureView,
    ) {
    }
}
