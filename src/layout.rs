//! Instance layout for the capsule grid.
//!
//! Each instance index maps to a cell on a square-ish grid:
//!
//! ```text
//! px = i mod row_count        x = origin_x - px * spacing
//! py = i div row_count        y = origin_y - py * spacing
//!                             z = depth
//! transform(i) = Translation(x, y, z) * RotationX(pi / 2)
//! ```
//!
//! The transform is a pure function of `(i, row_count)` and is recomputed in
//! full every frame. When the instance count is not a perfect square the last
//! row is left partially filled.

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec3};

use crate::options::GridOptions;

/// Immutable grid description: how many instances and where they go.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfiguration {
    instance_count: u32,
    row_count: u32,
    origin_x: f32,
    origin_y: f32,
    spacing: f32,
    depth: f32,
}

/// Integer grid coordinates of one instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    /// Column (`i mod row_count`).
    pub px: u32,
    /// Row (`i div row_count`).
    pub py: u32,
}

/// Per-instance model matrix as uploaded to the GPU.
///
/// Must match the `InstanceInput` locations in `capsule_instanced.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceTransform {
    /// Column-major model matrix.
    pub model: [[f32; 4]; 4],
}

impl From<Mat4> for InstanceTransform {
    fn from(m: Mat4) -> Self {
        Self {
            model: m.to_cols_array_2d(),
        }
    }
}

impl GridConfiguration {
    /// Grid with the default layout constants and `instance_count` cells.
    #[must_use]
    pub fn new(instance_count: u32) -> Self {
        Self::from_options(&GridOptions {
            instance_count,
            ..GridOptions::default()
        })
    }

    /// Grid from the `[grid]` options section.
    #[must_use]
    pub fn from_options(options: &GridOptions) -> Self {
        Self {
            instance_count: options.instance_count,
            row_count: options.instance_count.isqrt(),
            origin_x: options.origin_x,
            origin_y: options.origin_y,
            spacing: options.spacing,
            depth: options.depth,
        }
    }

    /// Total number of instances.
    #[must_use]
    pub fn instance_count(&self) -> u32 {
        self.instance_count
    }

    /// Cells per row, `floor(sqrt(instance_count))`.
    #[must_use]
    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    /// Grid coordinates of instance `index`, or `None` when out of range.
    ///
    /// A zero row count only happens for an empty grid, so every in-range
    /// index divides by a non-zero value.
    #[must_use]
    pub fn cell(&self, index: u32) -> Option<GridCell> {
        if index >= self.instance_count || self.row_count == 0 {
            return None;
        }
        Some(GridCell {
            px: index % self.row_count,
            py: index / self.row_count,
        })
    }

    /// World-space translation of a cell.
    #[must_use]
    pub fn position(&self, cell: GridCell) -> Vec3 {
        Vec3::new(
            self.origin_x - cell.px as f32 * self.spacing,
            self.origin_y - cell.py as f32 * self.spacing,
            self.depth,
        )
    }

    /// Model matrix of instance `index`: the grid translation applied after a
    /// quarter turn about X, which lays the Y-aligned capsule along Z.
    #[must_use]
    pub fn transform(&self, index: u32) -> Option<Mat4> {
        self.cell(index).map(|cell| {
            Mat4::from_translation(self.position(cell))
                * Mat4::from_rotation_x(FRAC_PI_2)
        })
    }

    /// Every model matrix, in index order.
    #[must_use]
    pub fn transforms(&self) -> Vec<Mat4> {
        (0..self.instance_count)
            .filter_map(|i| self.transform(i))
            .collect()
    }

    /// Every model matrix in GPU layout, in index order.
    #[must_use]
    pub fn instance_data(&self) -> Vec<InstanceTransform> {
        (0..self.instance_count)
            .filter_map(|i| self.transform(i))
            .map(InstanceTransform::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn row_count_is_floor_sqrt() {
        assert_eq!(GridConfiguration::new(0).row_count(), 0);
        assert_eq!(GridConfiguration::new(1).row_count(), 1);
        assert_eq!(GridConfiguration::new(15).row_count(), 3);
        assert_eq!(GridConfiguration::new(16).row_count(), 4);
        assert_eq!(GridConfiguration::new(1000).row_count(), 31);
    }

    #[test]
    fn empty_grid_has_no_transforms() {
        let grid = GridConfiguration::new(0);
        assert!(grid.transforms().is_empty());
        assert!(grid.instance_data().is_empty());
        assert_eq!(grid.cell(0), None);
        assert_eq!(grid.transform(0), None);
    }

    #[test]
    fn sixteen_instances_place_index_five() {
        let grid = GridConfiguration::new(16);
        assert_eq!(grid.row_count(), 4);
        let cell = grid.cell(5).unwrap();
        assert_eq!(cell, GridCell { px: 1, py: 1 });

        let m = grid.transform(5).unwrap();
        let t = m.w_axis.truncate();
        assert!((t.x - 5.2).abs() < EPS);
        assert!((t.y - 2.7).abs() < EPS);
        assert!((t.z + 2.0).abs() < EPS);
    }

    #[test]
    fn transform_rotates_quarter_turn_about_x() {
        let grid = GridConfiguration::new(4);
        let m = grid.transform(0).unwrap();
        // Local +Y (capsule axis) ends up along world +Z.
        let axis = m.transform_vector3(Vec3::Y);
        assert!((axis - Vec3::Z).length() < EPS);
        let origin = m.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(5.5, 3.0, -2.0)).length() < EPS);
    }

    #[test]
    fn positions_step_down_by_spacing() {
        for n in [1_u32, 2, 9, 10, 37, 100] {
            let grid = GridConfiguration::new(n);
            for i in 0..n {
                let cell = grid.cell(i).unwrap();
                let p = grid.position(cell);
                assert!((p.x - (5.5 - 0.3 * cell.px as f32)).abs() < EPS);
                assert!((p.y - (3.0 - 0.3 * cell.py as f32)).abs() < EPS);
                if cell.px > 0 {
                    let left = grid.position(GridCell {
                        px: cell.px - 1,
                        ..cell
                    });
                    assert!(p.x < left.x);
                    assert!((left.x - p.x - 0.3).abs() < EPS);
                }
                if cell.py > 0 {
                    let above = grid.position(GridCell {
                        py: cell.py - 1,
                        ..cell
                    });
                    assert!(p.y < above.y);
                    assert!((above.y - p.y - 0.3).abs() < EPS);
                }
            }
        }
    }

    #[test]
    fn cells_are_unique_and_match_div_mod() {
        for n in [1_u32, 5, 16, 17, 1000] {
            let grid = GridConfiguration::new(n);
            let r = grid.row_count();
            let cells: HashSet<GridCell> =
                (0..n).filter_map(|i| grid.cell(i)).collect();
            let expected: HashSet<GridCell> = (0..n)
                .map(|i| GridCell {
                    px: i % r,
                    py: i / r,
                })
                .collect();
            assert_eq!(cells.len(), n as usize);
            assert_eq!(cells, expected);
        }
    }

    #[test]
    fn non_square_count_leaves_last_row_partial() {
        let grid = GridConfiguration::new(10);
        assert_eq!(grid.row_count(), 3);
        let last_row: Vec<GridCell> = (0..10)
            .filter_map(|i| grid.cell(i))
            .filter(|c| c.py == 3)
            .collect();
        assert_eq!(last_row, vec![GridCell { px: 0, py: 3 }]);
    }

    #[test]
    fn recomputation_is_bit_identical() {
        let grid = GridConfiguration::new(1000);
        let a = grid.instance_data();
        let b = grid.instance_data();
        assert_eq!(bytemuck::cast_slice::<_, u8>(&a), bytemuck::cast_slice::<_, u8>(&b));
    }

    #[test]
    fn custom_layout_constants() {
        let grid = GridConfiguration::from_options(&GridOptions {
            instance_count: 4,
            origin_x: 0.0,
            origin_y: 0.0,
            spacing: 1.0,
            depth: -5.0,
        });
        let p = grid.position(grid.cell(3).unwrap());
        assert_eq!(p, Vec3::new(-1.0, -1.0, -5.0));
    }
}
