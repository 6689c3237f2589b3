//! IFD utilities
//!
//! Offset arithmetic shared by the reader and the test builder. Classic
//! TIFF directories use a 2-byte entry count, 12-byte entries and a 4-byte
//! next pointer; BigTIFF widens these to 8, 20 and 8 bytes.

use log::debug;

use crate::io::byte_order::ByteOrderHandler;
use crate::io::seekable::SeekableReader;
use crate::tiff::errors::TiffResult;

/// Reads an IFD offset (first or next) in the width used by the format
pub fn read_ifd_offset(
    reader: &mut dyn SeekableReader,
    is_big_tiff: bool,
    byte_order_handler: &dyn ByteOrderHandler,
) -> TiffResult<u64> {
    let offset = if is_big_tiff {
        byte_order_handler.read_u64(reader)?
    } else {
        byte_order_handler.read_u32(reader)? as u64
    };
    debug!("IFD offset: {}", offset);
    Ok(offset)
}

/// Size of one directory entry in bytes
pub fn entry_size(is_big_tiff: bool) -> u64 {
    if is_big_tiff { 20 } else { 12 }
}

/// Size of the entry count that opens a directory
pub fn count_size(is_big_tiff: bool) -> u64 {
    if is_big_tiff { 8 } else { 2 }
}

/// Size of a directory with `entry_count` entries, next pointer included
pub fn calculate_ifd_size(entry_count: usize, is_big_tiff: bool) -> u64 {
    let pointer = if is_big_tiff { 8 } else { 4 };
    count_size(is_big_tiff) + entry_size(is_big_tiff) * entry_count as u64 + pointer
}

/// Position of the next-IFD pointer of a directory starting at `ifd_offset`
pub fn next_pointer_position(ifd_offset: u64, entry_count: usize, is_big_tiff: bool) -> u64 {
    ifd_offset + count_size(is_big_tiff) + entry_size(is_big_tiff) * entry_count as u64
}
