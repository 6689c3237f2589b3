//! TIFF file format parsing module
//!
//! This module provides structures and functions for reading
//! TIFF and BigTIFF format files and exposing their first image as a
//! raster source.

pub mod errors;
pub mod ifd;
pub(crate) mod types;
pub mod reader;
pub mod tag_value;
pub mod source;
pub mod builder;
pub mod constants;
pub mod geo_key_parser;
pub(crate) mod validation;
#[cfg(test)]
mod tests;

pub use crate::io::byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};
pub use errors::{TiffError, TiffResult};
pub use ifd::{IFD, IFDEntry};
pub use reader::TiffReader;
pub use tag_value::TagValue;
pub use source::TiffSource;
pub use types::TiffContainer;
pub use geo_key_parser::{GeoKeyEntry, GeoKeyParser};
pub use builder::{FieldData, SampleData, TiffBuilder};
