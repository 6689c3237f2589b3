//! Raster decoding
//!
//! Turns a single-band raster source into an `ElevationGrid` with source
//! rows flipped, whatever the source's strip or tile organization.

pub mod decoder;
pub mod elevation;
pub mod header;
pub mod samples;
pub mod source;
pub mod strip_reader;
pub mod tile_reader;

#[cfg(test)]
mod tests;

pub use decoder::decode_elevation;
pub use elevation::ElevationGrid;
pub use header::{RasterHeader, SampleFormat, SampleKind, TileLayout};
pub use source::RasterSource;
