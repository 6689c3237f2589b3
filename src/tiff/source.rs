//! In-memory TIFF raster source
//!
//! The whole file is read once; the first image directory's tags are
//! resolved up front and strips or tiles are sliced straight out of the
//! buffer on request.

use log::{debug, warn};
use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::path::Path;

use crate::io::byte_order::ByteOrder;
use crate::raster::header::RasterHeader;
use crate::raster::source::RasterSource;
use crate::tiff::constants::tags;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::reader::TiffReader;
use crate::tiff::tag_value::TagValue;

/// A TIFF file held in memory, exposing its full-resolution image
pub struct TiffSource {
    data: Vec<u8>,
    byte_order: ByteOrder,
    is_big_tiff: bool,
    ifd_count: usize,
    tags: HashMap<u16, TagValue>,
    header: RasterHeader,
    chunk_offsets: Vec<u64>,
    chunk_byte_counts: Vec<u64>,
}

impl TiffSource {
    /// Reads and parses a TIFF file from disk
    pub fn open<P: AsRef<Path>>(path: P) -> TiffResult<Self> {
        let path = path.as_ref();
        debug!("Opening raster source {}", path.display());
        let data = fs::read(path)?;
        Self::from_bytes(data)
    }

    /// Parses a TIFF file already in memory
    pub fn from_bytes(data: Vec<u8>) -> TiffResult<Self> {
        let mut cursor = Cursor::new(data);
        let mut reader = TiffReader::new();
        let tiff = reader.read(&mut cursor)?;
        let ifd = tiff.main_ifd().ok_or(TiffError::NoImageDirectory)?;

        let mut tag_values = HashMap::with_capacity(ifd.entry_count());
        for entry in &ifd.entries {
            match reader.read_tag(&mut cursor, entry) {
                Ok(value) => {
                    debug!("Tag {}: {} value(s)", entry.tag, value.len());
                    tag_values.insert(entry.tag, value);
                }
                Err(e) => warn!("Skipping unreadable tag {}: {}", entry.tag, e),
            }
        }

        if !ifd.has_tag(tags::MODEL_PIXEL_SCALE_TAG) && !ifd.has_tag(tags::MODEL_TIEPOINT_TAG) {
            debug!("No pixel scale or tiepoint tags; raster is not georeferenced");
        }
        for extra in tiff.secondary_ifds() {
            debug!("Ignoring image directory #{} at offset {}", extra.number, extra.offset);
        }

        let header = RasterHeader::from_tags(|tag| tag_values.get(&tag).cloned().unwrap_or_default())?;

        let (offsets_tag, counts_tag) = if header.is_tiled() {
            (tags::TILE_OFFSETS, tags::TILE_BYTE_COUNTS)
        } else {
            (tags::STRIP_OFFSETS, tags::STRIP_BYTE_COUNTS)
        };
        let chunk_offsets = tag_values.get(&offsets_tag).map(TagValue::as_u64s).unwrap_or_default();
        let chunk_byte_counts = tag_values.get(&counts_tag).map(TagValue::as_u64s).unwrap_or_default();

        if chunk_offsets.is_empty() {
            warn!("Image directory has no data offsets; raster will decode as zeros");
        }

        Ok(TiffSource {
            data: cursor.into_inner(),
            byte_order: tiff.byte_order,
            is_big_tiff: tiff.is_big_tiff,
            ifd_count: tiff.ifd_count(),
            tags: tag_values,
            header,
            chunk_offsets,
            chunk_byte_counts,
        })
    }

    pub fn is_big_tiff(&self) -> bool {
        self.is_big_tiff
    }

    pub fn ifd_count(&self) -> usize {
        self.ifd_count
    }

    /// Tags of the main image directory, sorted by tag number
    pub fn tags(&self) -> Vec<(u16, &TagValue)> {
        let mut entries: Vec<_> = self.tags.iter().map(|(&tag, value)| (tag, value)).collect();
        entries.sort_by_key(|&(tag, _)| tag);
        entries
    }

    /// Stored bytes of strip or tile `index`, clamped to the file
    fn chunk(&self, index: usize, expected: usize) -> &[u8] {
        let Some(&offset) = self.chunk_offsets.get(index) else {
            return &[];
        };
        let count = self
            .chunk_byte_counts
            .get(index)
            .copied()
            .unwrap_or(expected as u64);

        let start = (offset as usize).min(self.data.len());
        let end = start.saturating_add(count as usize).min(self.data.len());
        &self.data[start..end]
    }
}

impl RasterSource for TiffSource {
    fn tag(&self, tag: u16) -> TagValue {
        self.tags.get(&tag).cloned().unwrap_or_default()
    }

    fn header(&self) -> &RasterHeader {
        &self.header
    }

    fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    fn tile_count(&self) -> usize {
        if self.header.is_tiled() {
            self.chunk_offsets.len()
        } else {
            0
        }
    }

    fn read_scanline(&mut self, row: u32, buf: &mut [u8]) -> usize {
        let rows_per_strip = self.header.rows_per_strip.max(1);
        let row_bytes = self.header.row_bytes();
        let strip = (row / rows_per_strip) as usize;
        let row_in_strip = (row % rows_per_strip) as usize;

        let strip_data = self.chunk(strip, row_bytes * rows_per_strip as usize);
        let start = row_in_strip * row_bytes;
        if start >= strip_data.len() {
            return 0;
        }

        let available = &strip_data[start..];
        let count = available.len().min(row_bytes).min(buf.len());
        buf[..count].copy_from_slice(&available[..count]);
        count
    }

    fn read_encoded_tile(&mut self, index: usize, buf: &mut [u8]) -> usize {
        let tile_data = self.chunk(index, self.header.tile_bytes());
        let count = tile_data.len().min(buf.len());
        buf[..count].copy_from_slice(&tile_data[..count]);
        count
    }
}
