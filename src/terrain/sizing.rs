//! Terrain dimensions
//!
//! A terrain's world size comes either from fixed settings or from the
//! heightmap's metadata: vertical size from its elevation range, planar
//! size from raster dimensions times pixel size.

use log::debug;

use crate::geo::georeference::GeoReference;
use crate::heightmap::normalizer::{NormalizedHeightmap, RANGE_EPSILON};

/// World size of one terrain tile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainSize {
    /// Extent along X
    pub width: f64,
    /// Extent along Y, the height of a sample of 1.0
    pub height: f64,
    /// Extent along Z
    pub length: f64,
}

impl TerrainSize {
    pub fn as_f32(&self) -> [f32; 3] {
        [self.width as f32, self.height as f32, self.length as f32]
    }

    /// Planar extent (x, z)
    pub fn planar(&self) -> (f64, f64) {
        (self.width, self.length)
    }
}

/// How terrain size is chosen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainSizing {
    pub use_metadata_size: bool,
    pub use_metadata_height: bool,
    pub width: f64,
    pub length: f64,
    pub height: f64,
}

impl Default for TerrainSizing {
    fn default() -> Self {
        TerrainSizing {
            use_metadata_size: true,
            use_metadata_height: true,
            width: 6000.0,
            length: 6000.0,
            height: 100.0,
        }
    }
}

impl TerrainSizing {
    pub fn resolve(&self, map: &NormalizedHeightmap, geo: &GeoReference) -> TerrainSize {
        let mut size = TerrainSize {
            width: self.width,
            height: self.height,
            length: self.length,
        };

        if self.use_metadata_height {
            size.height = (map.max_elevation() - map.min_elevation()).max(RANGE_EPSILON);
        }
        if self.use_metadata_size {
            size.width = map.width() as f64 * geo.pixel_size_x;
            size.length = map.height() as f64 * geo.pixel_size_y;
        }

        debug!("Terrain size {} x {} x {}", size.width, size.height, size.length);
        size
    }
}
