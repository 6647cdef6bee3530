//! Capsule mesh
//!
//! A cylinder of `length` along Y capped by two hemispheres of `radius`.
//! The surface is built as a stack of rings swept around the Y axis:
//! `cap_segments + 1` rings for the bottom hemisphere (south pole up to the
//! equator at `y = -length / 2`), then the same for the top hemisphere
//! (equator at `y = +length / 2` up to the north pole). The straight body is
//! the band between the two equators.
//!
//! Each ring repeats its first vertex at the end to close the seam. The pole
//! rings collapse to a point and produce degenerate triangles, which the
//! rasterizer drops.

use std::f32::consts::{FRAC_PI_2, TAU};

/// Vertex of a lit mesh.
/// Must match `VertexInput` in `capsule_instanced.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Object-space unit normal.
    pub normal: [f32; 3],
}

impl MeshVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    /// Vertex buffer layout (slot 0, per vertex).
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Capsule shape parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapsuleGeometry {
    /// Hemisphere and body radius.
    pub radius: f32,
    /// Length of the straight body (excluding caps).
    pub length: f32,
    /// Latitude subdivisions per hemisphere.
    pub cap_segments: u32,
    /// Subdivisions around the axis.
    pub radial_segments: u32,
}

impl Default for CapsuleGeometry {
    fn default() -> Self {
        Self {
            radius: 0.1,
            length: 1.0,
            cap_segments: 10,
            radial_segments: 20,
        }
    }
}

impl CapsuleGeometry {
    fn ring_count(&self) -> u32 {
        2 * (self.cap_segments.max(1) + 1)
    }

    fn ring_len(&self) -> u32 {
        self.radial_segments.max(3) + 1
    }

    /// Number of vertices [`generate`](Self::generate) produces.
    #[must_use]
    pub fn vertex_count(&self) -> u32 {
        self.ring_count() * self.ring_len()
    }

    /// Number of indices [`generate`](Self::generate) produces.
    #[must_use]
    pub fn index_count(&self) -> u32 {
        (self.ring_count() - 1) * (self.ring_len() - 1) * 6
    }

    /// Triangle-list vertices and `u32` indices.
    #[must_use]
    pub fn generate(&self) -> (Vec<MeshVertex>, Vec<u32>) {
        let caps = self.cap_segments.max(1);
        let radial = self.radial_segments.max(3);
        let half = self.length * 0.5;

        let mut vertices = Vec::with_capacity(self.vertex_count() as usize);
        // (latitude, y offset): bottom cap -pi/2..0, top cap 0..pi/2
        let bottom = (0..=caps).map(|j| {
            (-FRAC_PI_2 + FRAC_PI_2 * j as f32 / caps as f32, -half)
        });
        let top =
            (0..=caps).map(|j| (FRAC_PI_2 * j as f32 / caps as f32, half));
        for (phi, offset) in bottom.chain(top) {
            let (sin_phi, cos_phi) = phi.sin_cos();
            for s in 0..=radial {
                let theta = TAU * s as f32 / radial as f32;
                let (sin_theta, cos_theta) = theta.sin_cos();
                let normal =
                    [cos_phi * sin_theta, sin_phi, cos_phi * cos_theta];
                vertices.push(MeshVertex {
                    position: [
                        self.radius * normal[0],
                        self.radius * normal[1] + offset,
                        self.radius * normal[2],
                    ],
                    normal,
                });
            }
        }

        let ring_len = radial + 1;
        let mut indices = Vec::with_capacity(self.index_count() as usize);
        for ring in 0..self.ring_count() - 1 {
            for s in 0..radial {
                let a = ring * ring_len + s;
                let b = a + ring_len;
                indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
            }
        }

        (vertices, indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_capsule_counts() {
        let capsule = CapsuleGeometry::default();
        let (vertices, indices) = capsule.generate();
        // 22 rings of 21 vertices
        assert_eq!(vertices.len(), 462);
        assert_eq!(indices.len(), 21 * 20 * 6);
        assert_eq!(vertices.len() as u32, capsule.vertex_count());
        assert_eq!(indices.len() as u32, capsule.index_count());
    }

    #[test]
    fn indices_stay_in_range() {
        let (vertices, indices) = CapsuleGeometry::default().generate();
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
    }

    #[test]
    fn normals_are_unit_length() {
        let (vertices, _) = CapsuleGeometry::default().generate();
        for v in &vertices {
            let [x, y, z] = v.normal;
            let len = (x * x + y * y + z * z).sqrt();
            assert!((len - 1.0).abs() < 1e-5, "normal {:?}", v.normal);
        }
    }

    #[test]
    fn extents_match_radius_and_length() {
        let capsule = CapsuleGeometry::default();
        let (vertices, _) = capsule.generate();
        let min_y = vertices
            .iter()
            .map(|v| v.position[1])
            .fold(f32::INFINITY, f32::min);
        let max_y = vertices
            .iter()
            .map(|v| v.position[1])
            .fold(f32::NEG_INFINITY, f32::max);
        assert!((min_y + 0.6).abs() < 1e-5);
        assert!((max_y - 0.6).abs() < 1e-5);
        for v in &vertices {
            let [x, _, z] = v.position;
            assert!((x * x + z * z).sqrt() <= capsule.radius + 1e-5);
        }
    }

    #[test]
    fn body_vertices_point_outward() {
        let (vertices, _) = CapsuleGeometry::default().generate();
        // First vertex of the bottom equator ring (ring index 10).
        let v = vertices[10 * 21];
        assert!((v.position[1] + 0.5).abs() < 1e-5);
        assert!(v.normal[1].abs() < 1e-5);
    }

    #[test]
    fn degenerate_parameters_are_clamped() {
        let capsule = CapsuleGeometry {
            cap_segments: 0,
            radial_segments: 1,
            ..CapsuleGeometry::default()
        };
        let (vertices, indices) = capsule.generate();
        assert_eq!(vertices.len(), 4 * 4);
        assert_eq!(indices.len(), 3 * 3 * 6);
    }
}
