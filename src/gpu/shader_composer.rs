use std::borrow::Cow;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, ComposerError, NagaModuleDescriptor,
    ShaderLanguage, ShaderType,
};

use crate::error::GridGlowError;

/// Wraps `naga_oil::compose::Composer` to provide shader composition with
/// `#import` support.
///
/// Pre-loads the shared WGSL modules at construction time. Consuming shaders
/// use `#import gridglow::module_name` to pull in shared code. The composer
/// produces `naga::Module` IR directly, skipping WGSL re-parse at runtime.
pub struct ShaderComposer {
    composer: Composer,
}

/// Shared module definition: (source, file_path)
struct ModuleDef {
    source: &'static str,
    file_path: &'static str,
}

/// Shared modules in dependency order.
const MODULES: &[ModuleDef] = &[
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/fullscreen.wgsl"),
        file_path: "modules/fullscreen.wgsl",
    },
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/camera.wgsl"),
        file_path: "modules/camera.wgsl",
    },
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/lighting.wgsl"),
        file_path: "modules/lighting.wgsl",
    },
];

fn describe(e: &ComposerError, file_path: &str) -> GridGlowError {
    GridGlowError::ShaderCompose(format!("{file_path}: {e}"))
}

impl ShaderComposer {
    /// Composer with every shared module registered.
    ///
    /// # Errors
    ///
    /// Returns [`GridGlowError::ShaderCompose`] if a shared module fails to
    /// parse.
    pub fn new() -> Result<Self, GridGlowError> {
        let mut composer = Composer::default();

        for m in MODULES {
            let _ = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source: m.source,
                    file_path: m.file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map_err(|e| describe(&e, m.file_path))?;
        }

        Ok(Self { composer })
    }

    /// Compose a shader source string (which may contain `#import`
    /// directives) into a `wgpu::ShaderModule` ready for pipeline creation.
    ///
    /// # Errors
    ///
    /// Returns [`GridGlowError::ShaderCompose`] if composition fails.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        source: &str,
        file_path: &str,
    ) -> Result<wgpu::ShaderModule, GridGlowError> {
        let naga_module = self
            .compose_naga(source, file_path)
            .map_err(|e| describe(&e, file_path))?;

        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(naga_module)),
        }))
    }

    /// Compose a shader source into a `naga::Module` without creating a wgpu
    /// shader module. Useful for testing shader composition without a GPU
    /// device.
    pub fn compose_naga(
        &mut self,
        source: &str,
        file_path: &str,
    ) -> Result<naga::Module, Box<ComposerError>> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path,
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(Box::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every composable shader in the project as (source, file_path).
    fn all_shader_sources() -> Vec<(&'static str, &'static str)> {
        vec![
            (
                include_str!(
                    "../../assets/shaders/raster/capsule_instanced.wgsl"
                ),
                "capsule_instanced.wgsl",
            ),
            (
                include_str!("../../assets/shaders/screen/bloom_threshold.wgsl"),
                "bloom_threshold.wgsl",
            ),
            (
                include_str!("../../assets/shaders/screen/bloom_blur.wgsl"),
                "bloom_blur.wgsl",
            ),
            (
                include_str!("../../assets/shaders/screen/bloom_composite.wgsl"),
                "bloom_composite.wgsl",
            ),
            (
                include_str!("../../assets/shaders/screen/output.wgsl"),
                "output.wgsl",
            ),
        ]
    }

    #[test]
    fn test_all_shaders_compose() {
        let mut composer = ShaderComposer::new().unwrap();
        for (source, file_path) in all_shader_sources() {
            let module = composer
                .compose_naga(source, file_path)
                .unwrap_or_else(|e| {
                    panic!("Shader '{file_path}' failed to compose: {e}")
                });
            let entry_points: Vec<&str> =
                module.entry_points.iter().map(|ep| ep.name.as_str()).collect();
            assert!(entry_points.contains(&"vs_main"), "{file_path}");
            assert!(entry_points.contains(&"fs_main"), "{file_path}");
        }
    }

    #[test]
    fn capsule_shader_imports_lighting_layout() {
        let mut composer = ShaderComposer::new().unwrap();
        let module = composer
            .compose_naga(
                include_str!(
                    "../../assets/shaders/raster/capsule_instanced.wgsl"
                ),
                "capsule_instanced.wgsl",
            )
            .unwrap_or_else(|e| panic!("capsule shader failed to compose: {e}"));

        let lighting = module.types.iter().find_map(|(_, ty)| {
            let named = ty
                .name
                .as_deref()
                .is_some_and(|n| n.starts_with("LightingUniform"));
            match &ty.inner {
                naga::TypeInner::Struct { members, span } if named => {
                    Some((members.len(), *span))
                }
                _ => None,
            }
        });
        // Ten fields, padded to match the Rust uniform.
        assert_eq!(lighting, Some((10, 80)));
    }
}
