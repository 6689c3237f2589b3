//! TIFF file reader implementation
//!
//! This module implements the TIFF/BigTIFF container reader that uses the
//! Strategy pattern to handle different byte orders.

use log::{debug, info, trace, warn};
use std::io::SeekFrom;

use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::header;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::{field_type_size, IFD, IFDEntry};
use crate::tiff::tag_value::TagValue;
use crate::tiff::types::TiffContainer;
use crate::tiff::validation;
use crate::utils::format_utils;
use crate::utils::ifd_utils;

/// Reader for TIFF and BigTIFF files
pub struct TiffReader {
    /// Current byte order handler
    byte_order_handler: Option<Box<dyn ByteOrderHandler>>,
    /// Byte order of the last header read
    byte_order: Option<ByteOrder>,
    /// Whether currently reading BigTIFF format
    is_big_tiff: bool,
}

impl Default for TiffReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TiffReader {
    /// Creates a new TIFF reader
    pub fn new() -> Self {
        TiffReader {
            byte_order_handler: None,
            byte_order: None,
            is_big_tiff: false,
        }
    }

    /// Returns the byte order handler, failing if no header was read yet
    fn handler(&self) -> TiffResult<&dyn ByteOrderHandler> {
        self.byte_order_handler
            .as_deref()
            .ok_or(TiffError::HeaderNotRead)
    }

    /// Reads a TIFF file from the given reader
    ///
    /// This method handles the core process of reading a TIFF file:
    /// 1. Detect byte order (little/big endian)
    /// 2. Check for TIFF or BigTIFF format
    /// 3. Read all IFDs (Image File Directories)
    ///
    /// Fails if the header is malformed, the first IFD offset lies outside
    /// the file, or no directory could be read at all.
    pub fn read(&mut self, reader: &mut dyn SeekableReader) -> TiffResult<TiffContainer> {
        debug!("Reader::read starting");
        reader.seek(SeekFrom::Start(0))?;

        let (byte_order, handler) = format_utils::detect_byte_order(reader)?;
        let (is_big_tiff, _) = format_utils::detect_tiff_format(reader, handler.as_ref())?;
        let first_ifd_offset = ifd_utils::read_ifd_offset(reader, is_big_tiff, handler.as_ref())?;
        debug!("First IFD offset: {}", first_ifd_offset);

        self.byte_order_handler = Some(handler);
        self.byte_order = Some(byte_order);
        self.is_big_tiff = is_big_tiff;

        let file_size = validation::get_file_size(reader)?;
        validation::validate_ifd_offset(first_ifd_offset, file_size)?;

        let mut tiff = TiffContainer::new(is_big_tiff, byte_order);
        tiff.ifds = self.read_ifd_chain(reader, first_ifd_offset, file_size)?;

        if tiff.ifds.is_empty() {
            return Err(TiffError::NoImageDirectory);
        }

        info!("Read {} IFDs from TIFF file", tiff.ifds.len());
        Ok(tiff)
    }

    /// Reads a chain of IFDs starting from the given offset
    ///
    /// The first directory must parse; a broken link further down the chain
    /// only ends the walk.
    fn read_ifd_chain(
        &self,
        reader: &mut dyn SeekableReader,
        first_ifd_offset: u64,
        file_size: u64,
    ) -> TiffResult<Vec<IFD>> {
        let mut ifds = Vec::new();
        let mut ifd_offset = first_ifd_offset;
        let handler = self.handler()?;

        while ifd_offset != 0 && ifds.len() < header::MAX_IFDS {
            debug!("Reading IFD at offset: {}", ifd_offset);

            let ifd = match self.read_ifd(reader, ifd_offset, ifds.len()) {
                Ok(ifd) => ifd,
                Err(e) if ifds.is_empty() => return Err(e),
                Err(e) => {
                    warn!("Error reading IFD {}: {}", ifds.len(), e);
                    break;
                }
            };

            // The entries were just consumed, so the reader sits on the next pointer
            let next_ifd_offset = match ifd_utils::read_ifd_offset(reader, self.is_big_tiff, handler) {
                Ok(offset) => offset,
                Err(e) => {
                    warn!("Error reading next IFD offset: {}", e);
                    ifds.push(ifd);
                    break;
                }
            };

            if next_ifd_offset != 0 && validation::validate_ifd_offset(next_ifd_offset, file_size).is_err() {
                warn!("Invalid next IFD offset: {}, stopping IFD chain", next_ifd_offset);
                ifds.push(ifd);
                break;
            }

            // Guards against a directory pointing back at itself
            if next_ifd_offset == ifd_offset {
                warn!("IFD at offset {} links to itself, stopping IFD chain", ifd_offset);
                ifds.push(ifd);
                break;
            }

            ifds.push(ifd);
            ifd_offset = next_ifd_offset;
        }

        Ok(ifds)
    }

    /// Reads an IFD from the reader
    ///
    /// An IFD consists of an entry count followed by fixed-size entries,
    /// each describing one tag.
    pub fn read_ifd(&self, reader: &mut dyn SeekableReader, offset: u64, number: usize) -> TiffResult<IFD> {
        reader.seek(SeekFrom::Start(offset))?;

        let entry_count = self.read_ifd_entry_count(reader)?;
        debug!("IFD entry count: {}", entry_count);

        let mut ifd = IFD::new(number, offset);
        for _ in 0..entry_count {
            let entry = self.read_ifd_entry(reader)?;
            ifd.add_entry(entry);
        }

        trace!("{}", ifd);
        Ok(ifd)
    }

    /// Reads the entry count from an IFD
    fn read_ifd_entry_count(&self, reader: &mut dyn SeekableReader) -> TiffResult<u64> {
        let handler = self.handler()?;
        if self.is_big_tiff {
            Ok(handler.read_u64(reader)?)
        } else {
            Ok(handler.read_u16(reader)? as u64)
        }
    }

    /// Reads a single IFD entry, keeping the raw value slot
    fn read_ifd_entry(&self, reader: &mut dyn SeekableReader) -> TiffResult<IFDEntry> {
        let handler = self.handler()?;

        let tag = handler.read_u16(reader)?;
        let field_type = handler.read_u16(reader)?;
        let count = if self.is_big_tiff {
            handler.read_u64(reader)?
        } else {
            handler.read_u32(reader)? as u64
        };

        let mut slot = [0u8; 8];
        let value_offset = if self.is_big_tiff {
            reader.read_exact(&mut slot)?;
            handler.decode_u64(&slot)
        } else {
            reader.read_exact(&mut slot[..4])?;
            handler.decode_u32(&slot[..4]) as u64
        };

        Ok(IFDEntry::new(tag, field_type, count, value_offset, slot))
    }

    /// Reads and decodes the value of one entry
    ///
    /// Inline values are decoded from the slot bytes; larger payloads are
    /// read from `value_offset`.
    pub fn read_tag(&self, reader: &mut dyn SeekableReader, entry: &IFDEntry) -> TiffResult<TagValue> {
        let handler = self.handler()?;
        if field_type_size(entry.field_type).is_none() {
            return Err(TiffError::UnsupportedFieldType(entry.field_type));
        }

        if entry.is_value_inline(self.is_big_tiff) {
            return TagValue::decode(entry.field_type, entry.count as usize, &entry.slot, handler);
        }

        let file_size = validation::get_file_size(reader)?;
        let size = entry.data_size().unwrap_or(u64::MAX);
        if entry.value_offset.saturating_add(size) > file_size {
            return Err(TiffError::TagDataOutOfBounds {
                tag: entry.tag,
                offset: entry.value_offset,
                size,
                file_size,
            });
        }

        let mut buffer = vec![0u8; size as usize];
        reader.seek(SeekFrom::Start(entry.value_offset))?;
        reader.read_exact(&mut buffer)?;

        TagValue::decode(entry.field_type, entry.count as usize, &buffer, handler)
    }

    /// Reads a tag from a directory, yielding `Missing` when absent
    pub fn read_tag_value(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<TagValue> {
        match ifd.get_entry(tag) {
            Some(entry) => self.read_tag(reader, entry),
            None => Ok(TagValue::Missing),
        }
    }

    /// Returns whether the current file is a BigTIFF
    pub fn is_big_tiff(&self) -> bool {
        self.is_big_tiff
    }

    /// Byte order of the last header read, if any
    pub fn byte_order(&self) -> Option<ByteOrder> {
        self.byte_order
    }
}
