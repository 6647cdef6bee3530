//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;

/// Errors produced by the gridglow crate.
#[derive(Debug)]
pub enum GridGlowError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// A WGSL shader failed to compose or validate.
    ShaderCompose(String),
    /// The presentation surface could not hand out a frame.
    Surface(wgpu::SurfaceError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML/JSON options parsing or serialization failure.
    OptionsParse(String),
    /// Viewer event-loop failure.
    Viewer(String),
    /// Browser host failure (DOM access, canvas creation).
    Web(String),
}

impl fmt::Display for GridGlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::ShaderCompose(msg) => {
                write!(f, "shader composition error: {msg}")
            }
            Self::Surface(e) => write!(f, "surface error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
            Self::Web(msg) => write!(f, "web host error: {msg}"),
        }
    }
}

impl std::error::Error for GridGlowError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Surface(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for GridGlowError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<wgpu::SurfaceError> for GridGlowError {
    fn from(e: wgpu::SurfaceError) -> Self {
        Self::Surface(e)
    }
}

impl From<std::io::Error> for GridGlowError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl GridGlowError {
    /// Whether the error means the surface must be reconfigured before the
    /// next frame (lost or outdated swapchain).
    #[must_use]
    pub fn is_surface_stale(&self) -> bool {
        matches!(
            self,
            Self::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_surface_detection() {
        assert!(GridGlowError::Surface(wgpu::SurfaceError::Lost)
            .is_surface_stale());
        assert!(GridGlowError::Surface(wgpu::SurfaceError::Outdated)
            .is_surface_stale());
        assert!(!GridGlowError::Surface(wgpu::SurfaceError::Timeout)
            .is_surface_stale());
        assert!(!GridGlowError::Viewer("closed".to_owned()).is_surface_stale());
    }

    #[test]
    fn display_prefixes_variant() {
        let err = GridGlowError::OptionsParse("bad key".to_owned());
        assert_eq!(err.to_string(), "options parse error: bad key");
    }
}
