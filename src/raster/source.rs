//! Random-access raster source
//!
//! The decoder and the geo tag reader only talk to a source through this
//! trait: tag lookup, header, and decompressed row or tile reads.

use crate::io::byte_order::ByteOrder;
use crate::raster::header::RasterHeader;
use crate::tiff::tag_value::TagValue;

/// A single-image raster that can be read by row or by tile
pub trait RasterSource {
    /// Value of a tag in the image directory, `Missing` when absent
    fn tag(&self, tag: u16) -> TagValue;

    /// Header of the image
    fn header(&self) -> &RasterHeader;

    /// Byte order of multi-byte samples in the decoded rows and tiles
    fn byte_order(&self) -> ByteOrder;

    /// Number of tiles in a tiled raster, 0 when striped
    fn tile_count(&self) -> usize;

    /// Copies the decoded bytes of raster row `row` into `buf`
    ///
    /// Returns the number of bytes written, which is smaller than
    /// `buf.len()` when the stored row is truncated.
    fn read_scanline(&mut self, row: u32, buf: &mut [u8]) -> usize;

    /// Copies the decoded bytes of tile `index` into `buf`
    ///
    /// Returns the number of bytes written, which is smaller than
    /// `buf.len()` when the stored tile is truncated.
    fn read_encoded_tile(&mut self, index: usize, buf: &mut [u8]) -> usize;
}
