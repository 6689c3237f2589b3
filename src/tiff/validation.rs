//! TIFF validation utilities
//!
//! Checks applied while walking the container structure so that a
//! malformed file fails early with a precise error instead of a read past
//! the end of the buffer.

use log::{debug, error, warn};
use std::io::SeekFrom;

use crate::io::byte_order::ByteOrderHandler;
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::header;
use crate::tiff::errors::{TiffError, TiffResult};

/// Validates an IFD offset against the file size
///
/// The smallest legal offset is 8, directly after a classic header.
pub fn validate_ifd_offset(offset: u64, file_size: u64) -> TiffResult<()> {
    if offset >= file_size || offset < 8 {
        return Err(TiffError::InvalidIfdOffset { offset, file_size });
    }

    Ok(())
}

/// Gets the file size for validation purposes
///
/// Returns u64::MAX if the size couldn't be determined; the reader
/// position is restored either way.
pub fn get_file_size(reader: &mut dyn SeekableReader) -> TiffResult<u64> {
    let current_position = reader.stream_position()?;
    let file_size = match reader.seek(SeekFrom::End(0)) {
        Ok(size) => size,
        Err(e) => {
            warn!("Could not determine file size: {}", e);
            u64::MAX
        }
    };
    reader.seek(SeekFrom::Start(current_position))?;

    Ok(file_size)
}

/// Validates the BigTIFF header
///
/// After the version number (43) a BigTIFF header carries the offset size,
/// which must be 8, and a reserved word, which must be 0.
pub fn validate_bigtiff_header(
    reader: &mut dyn SeekableReader,
    byte_order_handler: &dyn ByteOrderHandler,
) -> TiffResult<()> {
    let offset_size = byte_order_handler.read_u16(reader)?;
    let reserved = byte_order_handler.read_u16(reader)?;

    debug!("BigTIFF offset size: {}, reserved: {}", offset_size, reserved);

    if offset_size != header::BIGTIFF_OFFSET_SIZE || reserved != 0 {
        error!("Invalid BigTIFF header: offset_size={}, reserved={}", offset_size, reserved);
        return Err(TiffError::InvalidBigTIFFHeader { offset_size, reserved });
    }

    Ok(())
}
