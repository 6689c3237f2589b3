//! Byte order handling for TIFF files
//!
//! This module implements the Strategy pattern for handling different
//! byte orders (little-endian vs big-endian). The same handler is used
//! for structural reads (header, IFD entries) and for decoding tag payloads
//! and pixel samples that have already been pulled into memory.

use byteorder::{BigEndian, ByteOrder as ByteOrderExt, LittleEndian, ReadBytesExt};
use std::io::Result;

use crate::io::seekable::SeekableReader;
use crate::tiff::errors::{TiffError, TiffResult};

/// Represents the byte order of a TIFF file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian byte order (II)
    LittleEndian,
    /// Big-endian byte order (MM)
    BigEndian,
}

impl ByteOrder {
    /// Detects the byte order from the first two bytes of a TIFF header
    pub fn detect(reader: &mut dyn SeekableReader) -> TiffResult<Self> {
        let marker = reader.read_u16::<LittleEndian>()?;
        match marker {
            0x4949 => Ok(ByteOrder::LittleEndian), // "II" (Intel)
            0x4D4D => Ok(ByteOrder::BigEndian),    // "MM" (Motorola)
            _ => Err(TiffError::InvalidByteOrder(marker)),
        }
    }

    /// Returns a string representation of this byte order
    pub fn name(&self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "Little Endian (II)",
            ByteOrder::BigEndian => "Big Endian (MM)",
        }
    }

    /// The two marker bytes that open a TIFF header in this byte order
    pub fn marker(&self) -> [u8; 2] {
        match self {
            ByteOrder::LittleEndian => [0x49, 0x49],
            ByteOrder::BigEndian => [0x4D, 0x4D],
        }
    }

    /// Creates the appropriate handler for this byte order
    pub fn create_handler(&self) -> Box<dyn ByteOrderHandler> {
        match self {
            ByteOrder::LittleEndian => Box::new(LittleEndianHandler),
            ByteOrder::BigEndian => Box::new(BigEndianHandler),
        }
    }
}

/// Trait for byte order handling strategies
///
/// The `read_*` methods consume from a reader; the `decode_*` methods
/// interpret the leading bytes of an in-memory slice. Callers of `decode_*`
/// must pass at least as many bytes as the decoded type occupies.
pub trait ByteOrderHandler: Send + Sync {
    /// Read a u16 value
    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16>;

    /// Read a u32 value
    fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32>;

    /// Read a u64 value
    fn read_u64(&self, reader: &mut dyn SeekableReader) -> Result<u64>;

    fn decode_u16(&self, bytes: &[u8]) -> u16;

    fn decode_i16(&self, bytes: &[u8]) -> i16;

    fn decode_u32(&self, bytes: &[u8]) -> u32;

    fn decode_u64(&self, bytes: &[u8]) -> u64;

    fn decode_f32(&self, bytes: &[u8]) -> f32;

    fn decode_f64(&self, bytes: &[u8]) -> f64;
}

/// Little-endian byte order handler
pub struct LittleEndianHandler;

impl ByteOrderHandler for LittleEndianHandler {
    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16> {
        reader.read_u16::<LittleEndian>()
    }

    fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32> {
        reader.read_u32::<LittleEndian>()
    }

    fn read_u64(&self, reader: &mut dyn SeekableReader) -> Result<u64> {
        reader.read_u64::<LittleEndian>()
    }

    fn decode_u16(&self, bytes: &[u8]) -> u16 {
        LittleEndian::read_u16(bytes)
    }

    fn decode_i16(&self, bytes: &[u8]) -> i16 {
        LittleEndian::read_i16(bytes)
    }

    fn decode_u32(&self, bytes: &[u8]) -> u32 {
        LittleEndian::read_u32(bytes)
    }

    fn decode_u64(&self, bytes: &[u8]) -> u64 {
        LittleEndian::read_u64(bytes)
    }

    fn decode_f32(&self, bytes: &[u8]) -> f32 {
        LittleEndian::read_f32(bytes)
    }

    fn decode_f64(&self, bytes: &[u8]) -> f64 {
        LittleEndian::read_f64(bytes)
    }
}

/// Big-endian byte order handler
pub struct BigEndianHandler;

impl ByteOrderHandler for BigEndianHandler {
    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16> {
        reader.read_u16::<BigEndian>()
    }

    fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32> {
        reader.read_u32::<BigEndian>()
    }

    fn read_u64(&self, reader: &mut dyn SeekableReader) -> Result<u64> {
        reader.read_u64::<BigEndian>()
    }

    fn decode_u16(&self, bytes: &[u8]) -> u16 {
        BigEndian::read_u16(bytes)
    }

    fn decode_i16(&self, bytes: &[u8]) -> i16 {
        BigEndian::read_i16(bytes)
    }

    fn decode_u32(&self, bytes: &[u8]) -> u32 {
        BigEndian::read_u32(bytes)
    }

    fn decode_u64(&self, bytes: &[u8]) -> u64 {
        BigEndian::read_u64(bytes)
    }

    fn decode_f32(&self, bytes: &[u8]) -> f32 {
        BigEndian::read_f32(bytes)
    }

    fn decode_f64(&self, bytes: &[u8]) -> f64 {
        BigEndian::read_f64(bytes)
    }
}
