use glam::{Mat4, Vec3};

use crate::options::CameraOptions;

/// Perspective camera looking down -Z. Only the eye's Y coordinate moves
/// (driven by page scroll); the projection is rebuilt on resize.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
    /// Camera Y per unit of scroll offset.
    pub scroll_factor: f32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform buffer holding the view-projection matrix and eye position.
pub struct CameraUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Camera world-space position.
    pub position: [f32; 3],
    /// Viewport aspect ratio.
    pub aspect: f32,
}

impl Camera {
    /// Fresh camera at the origin for a viewport with the given aspect ratio.
    #[must_use]
    pub fn new(options: &CameraOptions, aspect: f32) -> Self {
        Self {
            eye: Vec3::ZERO,
            aspect,
            fovy: options.fovy,
            znear: options.znear,
            zfar: options.zfar,
            scroll_factor: options.scroll_factor,
        }
    }

    /// Move the camera vertically for a page scroll offset (in pixels).
    pub fn follow_scroll(&mut self, scroll_offset: f64) {
        self.eye.y = (scroll_offset * f64::from(self.scroll_factor)) as f32;
    }

    /// View matrix: eye at `self.eye`, looking along -Z with +Y up.
    #[must_use]
    pub fn build_view(&self) -> Mat4 {
        Mat4::look_to_rh(self.eye, Vec3::NEG_Z, Vec3::Y)
    }

    /// Projection matrix.
    #[must_use]
    pub fn build_projection(&self) -> Mat4 {
        // perspective_rh already uses [0,1] depth range (wgpu/Vulkan
        // convention)
        Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        )
    }

    /// Build the combined view-projection matrix.
    #[must_use]
    pub fn build_matrix(&self) -> Mat4 {
        self.build_projection() * self.build_view()
    }
}

impl CameraUniform {
    /// Uniform snapshot of the given camera.
    #[must_use]
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            view_proj: camera.build_matrix().to_cols_array_2d(),
            position: camera.eye.to_array(),
            aspect: camera.aspect,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec4Swizzles;

    use super::*;

    #[test]
    fn scroll_moves_camera_down() {
        let mut camera = Camera::new(&CameraOptions::default(), 1.5);
        camera.follow_scroll(500.0);
        assert!((camera.eye.y + 0.5).abs() < 1e-6);
        assert_eq!(camera.eye.x, 0.0);
        assert_eq!(camera.eye.z, 0.0);

        camera.follow_scroll(0.0);
        assert_eq!(camera.eye.y, 0.0);
    }

    #[test]
    fn grid_origin_projects_in_front_of_camera() {
        let camera = Camera::new(&CameraOptions::default(), 16.0 / 9.0);
        let clip = camera.build_matrix()
            * glam::Vec4::new(0.0, 0.0, -2.0, 1.0);
        let ndc = clip.xyz() / clip.w;
        assert!(clip.w > 0.0);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
    }

    #[test]
    fn uniform_tracks_eye_and_aspect() {
        let mut camera = Camera::new(&CameraOptions::default(), 2.0);
        camera.follow_scroll(1000.0);
        let uniform = CameraUniform::from_camera(&camera);
        assert_eq!(uniform.aspect, 2.0);
        assert!((uniform.position[1] + 1.0).abs() < 1e-6);
    }
}
