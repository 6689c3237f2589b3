//! Grid PNG writer

use image::{ImageBuffer, Luma};
use log::info;
use std::path::Path;

use crate::errors::TerrainResult;
use crate::terrain::resample::OutputGrid;

fn to_sample(height: f32) -> u16 {
    (height.clamp(0.0, 1.0) as f64 * u16::MAX as f64).round() as u16
}

/// Writes a `[0, 1]` grid as a 16-bit grayscale PNG, highest row first
pub fn write_grid_png<P: AsRef<Path>>(grid: &OutputGrid, path: P) -> TerrainResult<()> {
    let rx = grid.resolution_x() as u32;
    let rz = grid.resolution_z() as u32;
    let image: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_fn(rx, rz, |x, y| {
        let z = (rz - 1 - y) as usize;
        Luma([to_sample(grid.row(z)[x as usize])])
    });
    image.save(path.as_ref())?;
    info!("Wrote {}x{} grid to {}", rx, rz, path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heightmap::normalizer::NormalizedHeightmap;
    use crate::terrain::resample::resample_grid;
    use tempfile::tempdir;

    #[test]
    fn test_grid_png() {
        let map = NormalizedHeightmap::new(2, 2, vec![0, 0, u16::MAX, u16::MAX], 0.0, 1.0).unwrap();
        let grid = resample_grid(&map, 3, 3);

        let dir = tempdir().unwrap();
        let path = dir.path().join("grid.png");
        write_grid_png(&grid, &path).unwrap();

        let png = image::open(&path).unwrap().into_luma16();
        assert_eq!(png.dimensions(), (3, 3));
        assert_eq!(png.get_pixel(0, 0)[0], u16::MAX);
        assert_eq!(png.get_pixel(2, 2)[0], 0);
    }
}
