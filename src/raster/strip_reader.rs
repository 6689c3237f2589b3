//! Strip-based elevation decoding
//!
//! Stripped rasters are read one scanline at a time through the source.
//! Each source row y lands in output row `height - 1 - y`.

use log::{debug, warn};

use crate::io::byte_order::ByteOrderHandler;
use crate::raster::elevation::ElevationGrid;
use crate::raster::header::RasterHeader;
use crate::raster::samples::widen_samples;
use crate::raster::source::RasterSource;

/// Decodes stripped rasters row by row
pub struct StripDecoder<'a> {
    header: &'a RasterHeader,
    handler: &'a dyn ByteOrderHandler,
    /// Scratch row reused for every scanline
    row: Vec<u8>,
}

impl<'a> StripDecoder<'a> {
    pub fn new(header: &'a RasterHeader, handler: &'a dyn ByteOrderHandler) -> Self {
        StripDecoder {
            header,
            handler,
            row: vec![0u8; header.row_bytes()],
        }
    }

    /// Reads every scanline into `grid`
    ///
    /// Short rows are copied as far as they go; the rest of the output row
    /// keeps its zero fill.
    pub fn extract(&mut self, source: &mut dyn RasterSource, grid: &mut ElevationGrid) {
        let height = self.header.height;
        let kind = self.header.sample_kind();
        let mut truncated_rows = 0usize;

        debug!("Decoding {} scanlines of {} bytes from {} strip(s)",
               height, self.row.len(), self.header.strip_count());

        for y in 0..height {
            let read = source.read_scanline(y, &mut self.row);
            if read < self.row.len() {
                truncated_rows += 1;
                debug!("Scanline {} truncated: {} of {} bytes", y, read, self.row.len());
            }

            let out_row = grid.row_mut((height - 1 - y) as usize);
            widen_samples(&self.row[..read.min(self.row.len())], out_row, kind, self.handler);
        }

        if truncated_rows > 0 {
            warn!("{} of {} scanlines were truncated", truncated_rows, height);
        }
    }
}
