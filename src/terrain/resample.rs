//! Nearest-neighbour resampling
//!
//! Output cell (x, y) of an Rx x Rz target maps to source pixel
//! `round(x / (Rx - 1) * (srcW - 1))`, `round(y / (Rz - 1) * (srcH - 1))`.
//! Halfway indices round to even.

use log::{debug, warn};

use crate::heightmap::normalizer::NormalizedHeightmap;
use crate::terrain::resolution::ResolutionTable;

/// Heights in `[0, 1]` on a regular grid, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct OutputGrid {
    resolution_x: usize,
    resolution_z: usize,
    heights: Vec<f32>,
}

impl OutputGrid {
    pub fn resolution_x(&self) -> usize {
        self.resolution_x
    }

    pub fn resolution_z(&self) -> usize {
        self.resolution_z
    }

    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// Height at column `x`, row `z`
    pub fn get(&self, x: usize, z: usize) -> Option<f32> {
        if x < self.resolution_x && z < self.resolution_z {
            Some(self.heights[z * self.resolution_x + x])
        } else {
            None
        }
    }

    /// One row of heights
    pub fn row(&self, z: usize) -> &[f32] {
        let start = z * self.resolution_x;
        &self.heights[start..start + self.resolution_x]
    }
}

/// Normalized coordinate of output index `i` among `target` cells
pub fn normalized_coord(i: usize, target: usize) -> f64 {
    if target <= 1 {
        0.0
    } else {
        i as f64 / (target - 1) as f64
    }
}

/// Source pixel index for output index `i`
pub fn source_index(i: usize, target: usize, source: usize) -> usize {
    let t = normalized_coord(i, target);
    (t * source.saturating_sub(1) as f64).round_ties_even() as usize
}

/// Samples `map` onto a `resolution_x` x `resolution_z` grid
///
/// A source index outside the heightmap contributes a height of 0.
pub fn resample_grid(map: &NormalizedHeightmap, resolution_x: usize, resolution_z: usize) -> OutputGrid {
    let mut heights = Vec::with_capacity(resolution_x * resolution_z);
    let mut out_of_bounds = 0usize;

    let columns: Vec<usize> = (0..resolution_x)
        .map(|x| source_index(x, resolution_x, map.width()))
        .collect();

    for z in 0..resolution_z {
        let src_y = source_index(z, resolution_z, map.height());
        for &src_x in &columns {
            let h = map.height01(src_x, src_y).unwrap_or_else(|| {
                out_of_bounds += 1;
                0.0
            });
            heights.push(h);
        }
    }

    if out_of_bounds > 0 {
        warn!("{} resampled cells fell outside the {}x{} heightmap", out_of_bounds, map.width(), map.height());
    }

    OutputGrid { resolution_x, resolution_z, heights }
}

/// Square grid at the table resolution nearest the smaller source side
pub fn build_grid(map: &NormalizedHeightmap, table: &ResolutionTable) -> OutputGrid {
    let resolution = table.snap(map.width() as u32, map.height() as u32) as usize;
    debug!("Resampling {}x{} heightmap to {}x{} grid", map.width(), map.height(), resolution, resolution);
    resample_grid(map, resolution, resolution)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(width: usize, height: usize) -> NormalizedHeightmap {
        let samples = (0..width * height).map(|i| (i * 1000) as u16).collect();
        NormalizedHeightmap::new(width, height, samples, 0.0, 1.0).unwrap()
    }

    #[test]
    fn test_source_index_mapping() {
        assert_eq!(source_index(0, 33, 100), 0);
        assert_eq!(source_index(32, 33, 100), 99);
        assert_eq!(source_index(0, 1, 100), 0);
        // 1/2 * 3 = 1.5 rounds to even
        assert_eq!(source_index(1, 3, 4), 2);
        // 1/4 * 2 = 0.5 rounds to even
        assert_eq!(source_index(1, 5, 3), 0);
    }

    #[test]
    fn test_identity_resample() {
        let map = ramp(4, 3);
        let grid = resample_grid(&map, 4, 3);
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(grid.get(x, y), map.height01(x, y));
            }
        }
    }

    #[test]
    fn test_corners_preserved_when_upsampling() {
        let map = ramp(3, 3);
        let grid = resample_grid(&map, 33, 33);
        assert_eq!(grid.get(0, 0), map.height01(0, 0));
        assert_eq!(grid.get(32, 0), map.height01(2, 0));
        assert_eq!(grid.get(0, 32), map.height01(0, 2));
        assert_eq!(grid.get(32, 32), map.height01(2, 2));
        assert_eq!(grid.row(5).len(), 33);
    }

    #[test]
    fn test_empty_heightmap_yields_zeros() {
        let map = NormalizedHeightmap::new(0, 0, Vec::new(), 0.0, 1.0).unwrap();
        let grid = resample_grid(&map, 2, 2);
        assert_eq!(grid.heights(), &[0.0; 4]);
    }

    #[test]
    fn test_build_grid_snaps() {
        let map = ramp(40, 60);
        let grid = build_grid(&map, &ResolutionTable::default());
        assert_eq!((grid.resolution_x(), grid.resolution_z()), (33, 33));
    }
}
