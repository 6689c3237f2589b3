//! Tile-based elevation decoding
//!
//! Each tile is read in full into one reusable scratch buffer, then only
//! its in-bounds sub-rectangle is copied into the grid. Rows are flipped
//! the same way as in the strip path.

use log::{debug, warn};

use crate::io::byte_order::ByteOrderHandler;
use crate::raster::elevation::ElevationGrid;
use crate::raster::header::{RasterHeader, TileLayout};
use crate::raster::samples::widen_samples;
use crate::raster::source::RasterSource;

/// Decodes tiled rasters tile by tile
pub struct TileDecoder<'a> {
    header: &'a RasterHeader,
    layout: TileLayout,
    handler: &'a dyn ByteOrderHandler,
    /// Scratch buffer sized to one decompressed tile
    tile: Vec<u8>,
}

impl<'a> TileDecoder<'a> {
    pub fn new(header: &'a RasterHeader, layout: TileLayout, handler: &'a dyn ByteOrderHandler) -> Self {
        TileDecoder {
            header,
            layout,
            handler,
            tile: vec![0u8; header.tile_bytes()],
        }
    }

    /// Pixel origin of tile `index`
    fn tile_origin(&self, index: usize) -> (u64, u64) {
        let stride = self.header.tiles_across().max(1) as usize;
        let column = (index % stride) as u64;
        let row = (index / stride) as u64;
        (column * self.layout.tile_width as u64, row * self.layout.tile_height as u64)
    }

    /// Reads every tile of the source into `grid`
    pub fn extract(&mut self, source: &mut dyn RasterSource, grid: &mut ElevationGrid) {
        let width = self.header.width as u64;
        let height = self.header.height as u64;
        let tile_count = source.tile_count();
        let bytes_per_sample = self.header.bytes_per_sample();
        let tile_row_bytes = self.layout.tile_width as usize * bytes_per_sample;
        let kind = self.header.sample_kind();
        let mut truncated_tiles = 0usize;

        debug!("Decoding {} tiles of {} bytes", tile_count, self.tile.len());

        for index in 0..tile_count {
            let (tile_x, tile_y) = self.tile_origin(index);
            if tile_x >= width || tile_y >= height {
                debug!("Tile {} lies outside the raster, skipping", index);
                continue;
            }

            let read = source.read_encoded_tile(index, &mut self.tile);
            if read < self.tile.len() {
                truncated_tiles += 1;
                self.tile[read..].fill(0);
            }

            let copy_width = (self.layout.tile_width as u64).min(width - tile_x) as usize;
            let copy_height = (self.layout.tile_height as u64).min(height - tile_y) as usize;

            for r in 0..copy_height {
                let src_start = r * tile_row_bytes;
                let src = &self.tile[src_start..src_start + copy_width * bytes_per_sample];

                let out_y = (height - 1 - (tile_y + r as u64)) as usize;
                let out_row = grid.row_mut(out_y);
                let dst = &mut out_row[tile_x as usize..tile_x as usize + copy_width];
                widen_samples(src, dst, kind, self.handler);
            }
        }

        if truncated_tiles > 0 {
            warn!("{} of {} tiles were truncated", truncated_tiles, tile_count);
        }
    }
}
