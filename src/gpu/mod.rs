//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, dynamic buffer management,
//! lighting, render targets, and shader composition.

/// Growable GPU buffers with automatic reallocation.
pub mod dynamic_buffer;
/// GPU lighting uniform and bind group management.
pub mod lighting;
/// Shared wgpu boilerplate helpers for screen-space post-process pipelines.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
/// Off-screen render-target textures.
pub mod texture;
