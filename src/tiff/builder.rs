//! In-memory TIFF construction
//!
//! Assembles small single-image TIFF or BigTIFF files, striped or tiled,
//! with optional GeoTIFF tags. Used to produce fixtures for decoding tests
//! and sample inputs for the CLI.
//!
//! Layout: header, image chunks, external tag data, then the single IFD.

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use log::debug;
use std::collections::{BTreeMap, HashMap};
use std::io;

use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::{compression, field_types, header, photometric, sample_format, tags};
use crate::tiff::errors::TiffResult;

/// Pixel samples to embed, row-major, top row first
#[derive(Debug, Clone)]
pub enum SampleData {
    U16(Vec<u16>),
    I16(Vec<i16>),
    F32(Vec<f32>),
}

impl SampleData {
    fn bits(&self) -> u16 {
        match self {
            SampleData::U16(_) | SampleData::I16(_) => 16,
            SampleData::F32(_) => 32,
        }
    }

    fn format(&self) -> u16 {
        match self {
            SampleData::U16(_) => sample_format::UNSIGNED,
            SampleData::I16(_) => sample_format::SIGNED,
            SampleData::F32(_) => sample_format::IEEEFP,
        }
    }

    fn len(&self) -> usize {
        match self {
            SampleData::U16(v) => v.len(),
            SampleData::I16(v) => v.len(),
            SampleData::F32(v) => v.len(),
        }
    }
}

/// Typed payload of an extra tag
#[derive(Debug, Clone)]
pub enum FieldData {
    Shorts(Vec<u16>),
    Longs(Vec<u32>),
    Long8s(Vec<u64>),
    Doubles(Vec<f64>),
    Ascii(String),
}

impl FieldData {
    fn field_type(&self) -> u16 {
        match self {
            FieldData::Shorts(_) => field_types::SHORT,
            FieldData::Longs(_) => field_types::LONG,
            FieldData::Long8s(_) => field_types::LONG8,
            FieldData::Doubles(_) => field_types::DOUBLE,
            FieldData::Ascii(_) => field_types::ASCII,
        }
    }

    fn count(&self) -> u64 {
        match self {
            FieldData::Shorts(v) => v.len() as u64,
            FieldData::Longs(v) => v.len() as u64,
            FieldData::Long8s(v) => v.len() as u64,
            FieldData::Doubles(v) => v.len() as u64,
            // NUL terminator included
            FieldData::Ascii(s) => s.len() as u64 + 1,
        }
    }
}

/// Byte-order aware writes into a growing buffer
struct Encoder {
    order: ByteOrder,
}

impl Encoder {
    fn u16(&self, out: &mut Vec<u8>, v: u16) -> io::Result<()> {
        match self.order {
            ByteOrder::LittleEndian => out.write_u16::<LittleEndian>(v),
            ByteOrder::BigEndian => out.write_u16::<BigEndian>(v),
        }
    }

    fn i16(&self, out: &mut Vec<u8>, v: i16) -> io::Result<()> {
        match self.order {
            ByteOrder::LittleEndian => out.write_i16::<LittleEndian>(v),
            ByteOrder::BigEndian => out.write_i16::<BigEndian>(v),
        }
    }

    fn u32(&self, out: &mut Vec<u8>, v: u32) -> io::Result<()> {
        match self.order {
            ByteOrder::LittleEndian => out.write_u32::<LittleEndian>(v),
            ByteOrder::BigEndian => out.write_u32::<BigEndian>(v),
        }
    }

    fn u64(&self, out: &mut Vec<u8>, v: u64) -> io::Result<()> {
        match self.order {
            ByteOrder::LittleEndian => out.write_u64::<LittleEndian>(v),
            ByteOrder::BigEndian => out.write_u64::<BigEndian>(v),
        }
    }

    fn f32(&self, out: &mut Vec<u8>, v: f32) -> io::Result<()> {
        match self.order {
            ByteOrder::LittleEndian => out.write_f32::<LittleEndian>(v),
            ByteOrder::BigEndian => out.write_f32::<BigEndian>(v),
        }
    }

    fn f64(&self, out: &mut Vec<u8>, v: f64) -> io::Result<()> {
        match self.order {
            ByteOrder::LittleEndian => out.write_f64::<LittleEndian>(v),
            ByteOrder::BigEndian => out.write_f64::<BigEndian>(v),
        }
    }

    fn offset(&self, out: &mut Vec<u8>, v: u64, is_big_tiff: bool) -> io::Result<()> {
        if is_big_tiff { self.u64(out, v) } else { self.u32(out, v as u32) }
    }

    fn field(&self, field: &FieldData) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        match field {
            FieldData::Shorts(v) => for &x in v { self.u16(&mut out, x)?; },
            FieldData::Longs(v) => for &x in v { self.u32(&mut out, x)?; },
            FieldData::Long8s(v) => for &x in v { self.u64(&mut out, x)?; },
            FieldData::Doubles(v) => for &x in v { self.f64(&mut out, x)?; },
            FieldData::Ascii(s) => {
                out.extend_from_slice(s.as_bytes());
                out.push(0);
            }
        }
        Ok(out)
    }

    fn sample(&self, out: &mut Vec<u8>, samples: &SampleData, index: Option<usize>) -> io::Result<()> {
        match (samples, index) {
            (SampleData::U16(v), Some(i)) => self.u16(out, v[i]),
            (SampleData::I16(v), Some(i)) => self.i16(out, v[i]),
            (SampleData::F32(v), Some(i)) => self.f32(out, v[i]),
            (SampleData::F32(_), None) => self.f32(out, 0.0),
            (_, None) => self.u16(out, 0),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Layout {
    Striped { rows_per_strip: u32 },
    Tiled { tile_width: u32, tile_height: u32 },
}

/// Builder for single-image TIFF files
#[derive(Debug, Clone)]
pub struct TiffBuilder {
    byte_order: ByteOrder,
    is_big_tiff: bool,
    width: u32,
    height: u32,
    samples: SampleData,
    layout: Layout,
    extra: BTreeMap<u16, FieldData>,
    truncations: HashMap<usize, usize>,
}

impl TiffBuilder {
    /// Starts a little-endian classic TIFF of the given size, one strip,
    /// all samples zero
    pub fn new(width: u32, height: u32) -> Self {
        TiffBuilder {
            byte_order: ByteOrder::LittleEndian,
            is_big_tiff: false,
            width,
            height,
            samples: SampleData::U16(vec![0; width as usize * height as usize]),
            layout: Layout::Striped { rows_per_strip: height.max(1) },
            extra: BTreeMap::new(),
            truncations: HashMap::new(),
        }
    }

    pub fn byte_order(mut self, order: ByteOrder) -> Self {
        self.byte_order = order;
        self
    }

    pub fn big_tiff(mut self, is_big_tiff: bool) -> Self {
        self.is_big_tiff = is_big_tiff;
        self
    }

    pub fn u16_samples(mut self, samples: Vec<u16>) -> Self {
        self.samples = SampleData::U16(samples);
        self
    }

    pub fn i16_samples(mut self, samples: Vec<i16>) -> Self {
        self.samples = SampleData::I16(samples);
        self
    }

    pub fn f32_samples(mut self, samples: Vec<f32>) -> Self {
        self.samples = SampleData::F32(samples);
        self
    }

    pub fn rows_per_strip(mut self, rows: u32) -> Self {
        self.layout = Layout::Striped { rows_per_strip: rows.max(1) };
        self
    }

    pub fn tiled(mut self, tile_width: u32, tile_height: u32) -> Self {
        self.layout = Layout::Tiled { tile_width, tile_height };
        self
    }

    /// Sets or overrides any tag
    pub fn tag(mut self, tag: u16, value: FieldData) -> Self {
        self.extra.insert(tag, value);
        self
    }

    pub fn pixel_scale(self, x: f64, y: f64) -> Self {
        self.tag(tags::MODEL_PIXEL_SCALE_TAG, FieldData::Doubles(vec![x, y, 0.0]))
    }

    /// Ties raster pixel (0, 0) to model point (x, y)
    pub fn tiepoint(self, x: f64, y: f64) -> Self {
        self.tag(tags::MODEL_TIEPOINT_TAG, FieldData::Doubles(vec![0.0, 0.0, 0.0, x, y, 0.0]))
    }

    pub fn geo_key_directory(self, keys: Vec<u16>) -> Self {
        self.tag(tags::GEO_KEY_DIRECTORY_TAG, FieldData::Shorts(keys))
    }

    /// Minimal GeoKey directory declaring a projected EPSG code
    pub fn epsg(self, code: u16) -> Self {
        self.geo_key_directory(vec![1, 1, 0, 1, 3072, 0, 1, code])
    }

    pub fn no_data(self, value: &str) -> Self {
        self.tag(tags::GDAL_NODATA, FieldData::Ascii(value.to_string()))
    }

    pub fn samples_per_pixel(self, count: u16) -> Self {
        self.tag(tags::SAMPLES_PER_PIXEL, FieldData::Shorts(vec![count]))
    }

    pub fn compression(self, code: u16) -> Self {
        self.tag(tags::COMPRESSION, FieldData::Shorts(vec![code]))
    }

    /// Stores only the first `keep_bytes` of strip or tile `index`
    pub fn truncate_chunk(mut self, index: usize, keep_bytes: usize) -> Self {
        self.truncations.insert(index, keep_bytes);
        self
    }

    fn sample_index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = y as usize * self.width as usize + x as usize;
        (index < self.samples.len()).then_some(index)
    }

    /// Encodes image data as strips or tiles
    fn encode_chunks(&self, enc: &Encoder) -> io::Result<Vec<Vec<u8>>> {
        let mut chunks = Vec::new();
        match self.layout {
            Layout::Striped { rows_per_strip } => {
                let mut y = 0;
                while y < self.height {
                    let rows = rows_per_strip.min(self.height - y);
                    let mut chunk = Vec::new();
                    for row in y..y + rows {
                        for x in 0..self.width {
                            enc.sample(&mut chunk, &self.samples, self.sample_index(x, row))?;
                        }
                    }
                    chunks.push(chunk);
                    y += rows;
                }
            }
            Layout::Tiled { tile_width, tile_height } => {
                let across = self.width.div_ceil(tile_width.max(1));
                let down = self.height.div_ceil(tile_height.max(1));
                for tile_row in 0..down {
                    for tile_col in 0..across {
                        let mut chunk = Vec::new();
                        for ty in 0..tile_height {
                            for tx in 0..tile_width {
                                let index = self.sample_index(tile_col * tile_width + tx, tile_row * tile_height + ty);
                                enc.sample(&mut chunk, &self.samples, index)?;
                            }
                        }
                        chunks.push(chunk);
                    }
                }
            }
        }

        for (&index, &keep) in &self.truncations {
            if let Some(chunk) = chunks.get_mut(index) {
                chunk.truncate(keep);
            }
        }
        Ok(chunks)
    }

    fn offsets_field(&self, values: Vec<u64>) -> FieldData {
        if self.is_big_tiff {
            FieldData::Long8s(values)
        } else {
            FieldData::Longs(values.into_iter().map(|v| v as u32).collect())
        }
    }

    /// Serializes the file
    pub fn build(&self) -> TiffResult<Vec<u8>> {
        let enc = Encoder { order: self.byte_order };
        let mut out = Vec::new();

        out.extend_from_slice(&self.byte_order.marker());
        if self.is_big_tiff {
            enc.u16(&mut out, header::BIG_TIFF_VERSION)?;
            enc.u16(&mut out, header::BIGTIFF_OFFSET_SIZE)?;
            enc.u16(&mut out, 0)?;
            enc.u64(&mut out, 0)?;
        } else {
            enc.u16(&mut out, header::TIFF_VERSION)?;
            enc.u32(&mut out, 0)?;
        }
        let ifd_pointer_position = out.len() - if self.is_big_tiff { 8 } else { 4 };

        let chunks = self.encode_chunks(&enc)?;
        let mut chunk_offsets = Vec::with_capacity(chunks.len());
        let mut chunk_counts = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            chunk_offsets.push(out.len() as u64);
            chunk_counts.push(chunk.len() as u64);
            out.extend_from_slice(chunk);
        }

        let mut fields: BTreeMap<u16, FieldData> = BTreeMap::new();
        fields.insert(tags::IMAGE_WIDTH, FieldData::Longs(vec![self.width]));
        fields.insert(tags::IMAGE_LENGTH, FieldData::Longs(vec![self.height]));
        fields.insert(tags::BITS_PER_SAMPLE, FieldData::Shorts(vec![self.samples.bits()]));
        fields.insert(tags::COMPRESSION, FieldData::Shorts(vec![compression::NONE]));
        fields.insert(tags::PHOTOMETRIC_INTERPRETATION, FieldData::Shorts(vec![photometric::BLACK_IS_ZERO]));
        fields.insert(tags::SAMPLES_PER_PIXEL, FieldData::Shorts(vec![1]));
        fields.insert(tags::SAMPLE_FORMAT, FieldData::Shorts(vec![self.samples.format()]));
        match self.layout {
            Layout::Striped { rows_per_strip } => {
                fields.insert(tags::ROWS_PER_STRIP, FieldData::Longs(vec![rows_per_strip]));
                fields.insert(tags::STRIP_OFFSETS, self.offsets_field(chunk_offsets));
                fields.insert(tags::STRIP_BYTE_COUNTS, self.offsets_field(chunk_counts));
            }
            Layout::Tiled { tile_width, tile_height } => {
                fields.insert(tags::TILE_WIDTH, FieldData::Longs(vec![tile_width]));
                fields.insert(tags::TILE_LENGTH, FieldData::Longs(vec![tile_height]));
                fields.insert(tags::TILE_OFFSETS, self.offsets_field(chunk_offsets));
                fields.insert(tags::TILE_BYTE_COUNTS, self.offsets_field(chunk_counts));
            }
        }
        for (&tag, value) in &self.extra {
            fields.insert(tag, value.clone());
        }

        // External payloads go before the directory, word aligned
        let inline_size = if self.is_big_tiff { 8 } else { 4 };
        let mut slots: Vec<(u16, u16, u64, Vec<u8>)> = Vec::with_capacity(fields.len());
        for (&tag, field) in &fields {
            let bytes = enc.field(field)?;
            let slot = if bytes.len() <= inline_size {
                let mut slot = bytes;
                slot.resize(inline_size, 0);
                slot
            } else {
                if out.len() % 2 == 1 {
                    out.push(0);
                }
                let offset = out.len() as u64;
                out.extend_from_slice(&bytes);
                let mut slot = Vec::with_capacity(inline_size);
                enc.offset(&mut slot, offset, self.is_big_tiff)?;
                slot
            };
            slots.push((tag, field.field_type(), field.count(), slot));
        }

        if out.len() % 2 == 1 {
            out.push(0);
        }
        let ifd_offset = out.len() as u64;
        let mut pointer = Vec::with_capacity(inline_size);
        enc.offset(&mut pointer, ifd_offset, self.is_big_tiff)?;
        out[ifd_pointer_position..ifd_pointer_position + inline_size].copy_from_slice(&pointer);

        if self.is_big_tiff {
            enc.u64(&mut out, slots.len() as u64)?;
        } else {
            enc.u16(&mut out, slots.len() as u16)?;
        }
        for (tag, field_type, count, slot) in &slots {
            enc.u16(&mut out, *tag)?;
            enc.u16(&mut out, *field_type)?;
            enc.offset(&mut out, *count, self.is_big_tiff)?;
            out.extend_from_slice(slot);
        }
        enc.offset(&mut out, 0, self.is_big_tiff)?;

        debug!("Built {} byte TIFF with {} chunks and {} tags", out.len(), chunks.len(), slots.len());
        Ok(out)
    }
}
