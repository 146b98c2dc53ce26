/*
 * Spatial Grid Module
 *
 * This module defines the SpatialGrid struct, a uniform grid over the
 * world cube used to speed up neighbor lookups. The grid only narrows
 * the candidate set; the query layer still applies the exact distance
 * test, so results are identical to a plain linear scan. It is rebuilt
 * from a position snapshot at the start of every tick it is used.
 */

use glam::Vec3;

pub struct SpatialGrid {
    pub cell_size: f32,
    cells_per_axis: usize,
    half_bound: f32,
    cells: Vec<Vec<usize>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32, max_bound: f32) -> Self {
        // A degenerate cell size collapses the grid to a single cell, which
        // is still correct (every agent becomes a candidate).
        let cell_size = if cell_size > 0.0 { cell_size } else { max_bound };
        let cells_per_axis = ((max_bound / cell_size).ceil() as usize).max(1);

        Self {
            cell_size,
            cells_per_axis,
            half_bound: max_bound / 2.0,
            cells: vec![Vec::new(); cells_per_axis * cells_per_axis * cells_per_axis],
        }
    }

    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    /// Insert an agent index at its position.
    pub fn insert(&mut self, index: usize, position: Vec3) {
        let (x, y, z) = self.cell_coords(position);
        let cell = self.cell_index(x, y, z);
        self.cells[cell].push(index);
    }

    /// Clear and re-populate the grid from a slice of positions.
    pub fn rebuild(&mut self, positions: &[Vec3]) {
        self.clear();
        for (index, &position) in positions.iter().enumerate() {
            self.insert(index, position);
        }
    }

    /// Indices of every agent whose cell intersects the sphere at
    /// `position` with the given `radius`. A superset of the true neighbor
    /// set; callers apply the exact distance filter.
    pub fn candidates(&self, position: Vec3, radius: f32) -> Vec<usize> {
        let (lo_x, lo_y, lo_z) = self.cell_coords(position - Vec3::splat(radius));
        let (hi_x, hi_y, hi_z) = self.cell_coords(position + Vec3::splat(radius));

        let mut result = Vec::new();
        for z in lo_z..=hi_z {
            for y in lo_y..=hi_y {
                for x in lo_x..=hi_x {
                    result.extend_from_slice(&self.cells[self.cell_index(x, y, z)]);
                }
            }
        }
        result
    }

    // Convert a world position to clamped cell coordinates
    fn cell_coords(&self, position: Vec3) -> (usize, usize, usize) {
        let max_cell = self.cells_per_axis as f32 - 1.0;
        let coord = |v: f32| ((v + self.half_bound) / self.cell_size).clamp(0.0, max_cell) as usize;
        (coord(position.x), coord(position.y), coord(position.z))
    }

    #[inline]
    fn cell_index(&self, x: usize, y: usize, z: usize) -> usize {
        (z * self.cells_per_axis + y) * self.cells_per_axis + x
    }
}
