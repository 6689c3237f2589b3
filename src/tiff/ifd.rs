//! Image File Directory (IFD) structures and methods
//!
//! An IFD is the per-image tag table of a TIFF file. Each entry carries the
//! raw bytes of its value slot so that inline values can be decoded later
//! in the file's byte order.

use std::collections::HashMap;
use std::fmt;
use log::{debug, trace};

use crate::tiff::constants::field_types;

/// Represents an Image File Directory (IFD) in a TIFF file
#[derive(Debug, Clone)]
pub struct IFD {
    /// Entries in this IFD, in file order
    pub entries: Vec<IFDEntry>,
    /// IFD number (0-based)
    pub number: usize,
    /// Offset to this IFD in the file
    pub offset: u64,
    /// Tag to position in `entries`
    tag_map: HashMap<u16, usize>,
}

/// Represents an entry in an Image File Directory (IFD)
///
/// For small values `slot` holds the value itself; otherwise
/// `value_offset` points at the value bytes elsewhere in the file.
#[derive(Debug, Clone)]
pub struct IFDEntry {
    /// TIFF tag identifier
    pub tag: u16,
    /// Field type
    pub field_type: u16,
    /// Number of values
    pub count: u64,
    /// Value slot interpreted as an offset
    pub value_offset: u64,
    /// Raw value slot bytes (4 used for classic TIFF, 8 for BigTIFF)
    pub slot: [u8; 8],
}

/// Size in bytes of a single value of the given field type
pub fn field_type_size(field_type: u16) -> Option<usize> {
    match field_type {
        field_types::BYTE | field_types::ASCII | field_types::SBYTE | field_types::UNDEFINED => Some(1),
        field_types::SHORT | field_types::SSHORT => Some(2),
        field_types::LONG | field_types::SLONG | field_types::FLOAT | field_types::IFD => Some(4),
        field_types::RATIONAL | field_types::SRATIONAL | field_types::DOUBLE => Some(8),
        field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 => Some(8),
        _ => None,
    }
}

impl IFDEntry {
    /// Creates a new IFD entry
    pub fn new(tag: u16, field_type: u16, count: u64, value_offset: u64, slot: [u8; 8]) -> Self {
        trace!("IFD entry: tag={}, type={}, count={}, offset/value={}",
               tag, field_type, count, value_offset);

        Self {
            tag,
            field_type,
            count,
            value_offset,
            slot,
        }
    }

    /// Total payload size in bytes
    ///
    /// None for an unknown field type or a count whose size overflows `u64`.
    pub fn data_size(&self) -> Option<u64> {
        field_type_size(self.field_type).and_then(|size| (size as u64).checked_mul(self.count))
    }

    /// Determines if the value is stored inline in the entry's value slot
    pub fn is_value_inline(&self, is_big_tiff: bool) -> bool {
        let inline_size = if is_big_tiff { 8 } else { 4 };
        matches!(self.data_size(), Some(size) if size <= inline_size)
    }
}

impl IFD {
    /// Creates a new, empty IFD
    pub fn new(number: usize, offset: u64) -> Self {
        debug!("Creating IFD #{} at offset {}", number, offset);

        Self {
            entries: Vec::new(),
            number,
            offset,
            tag_map: HashMap::new(),
        }
    }

    /// Adds an entry; a repeated tag replaces the earlier lookup target
    pub fn add_entry(&mut self, entry: IFDEntry) {
        self.tag_map.insert(entry.tag, self.entries.len());
        self.entries.push(entry);
    }

    /// Gets an IFD entry by tag
    pub fn get_entry(&self, tag: u16) -> Option<&IFDEntry> {
        self.tag_map.get(&tag).map(|&index| &self.entries[index])
    }

    /// Checks if this IFD has a specific tag
    pub fn has_tag(&self, tag: u16) -> bool {
        self.tag_map.contains_key(&tag)
    }

    /// Gets the number of entries in this IFD
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Display for IFD {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "IFD #{} (offset: {})", self.number, self.offset)?;
        writeln!(f, "  Number of entries: {}", self.entries.len())?;
        for entry in &self.entries {
            writeln!(f, "    tag {} type {} count {} value/offset {}",
                     entry.tag, entry.field_type, entry.count, entry.value_offset)?;
        }
        Ok(())
    }
}
