//! Error types for the TIFF container layer

use std::io;
use thiserror::Error;

/// Errors raised while parsing the TIFF container structure
#[derive(Debug, Error)]
pub enum TiffError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// Invalid byte order marker
    #[error("Invalid byte order marker: {0:#06x}")]
    InvalidByteOrder(u16),

    /// Invalid BigTIFF header
    #[error("Invalid BigTIFF header: offset size {offset_size}, reserved {reserved}")]
    InvalidBigTIFFHeader { offset_size: u16, reserved: u16 },

    /// Unsupported TIFF version
    #[error("Unsupported TIFF version: {0}")]
    UnsupportedVersion(u16),

    /// IFD offset outside the file
    #[error("Invalid IFD offset: {offset} (file size: {file_size})")]
    InvalidIfdOffset { offset: u64, file_size: u64 },

    /// The file has no readable image directory
    #[error("No image file directory found")]
    NoImageDirectory,

    /// Tag not found
    #[error("Tag not found: {0}")]
    TagNotFound(u16),

    /// Unsupported field type
    #[error("Unsupported field type: {0}")]
    UnsupportedFieldType(u16),

    /// A tag was requested before the header was parsed
    #[error("Byte order not yet determined")]
    HeaderNotRead,

    /// A tag payload runs past the end of the file
    #[error("Tag {tag} data at offset {offset} ({size} bytes) exceeds file size {file_size}")]
    TagDataOutOfBounds { tag: u16, offset: u64, size: u64, file_size: u64 },

    /// Image dimensions not found
    #[error("Image dimensions not found")]
    MissingDimensions,
}

/// Result type for TIFF operations
pub type TiffResult<T> = Result<T, TiffError>;
