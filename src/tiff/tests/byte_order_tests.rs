//! Tests for the byte order module

extern crate std;

use std::io::Cursor;
use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use crate::io::byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};
use crate::tiff::errors::TiffError;

#[test]
fn test_byte_order_detection() {
    let mut cursor = Cursor::new(b"II".to_vec());
    std::assert_eq!(ByteOrder::detect(&mut cursor).unwrap(), ByteOrder::LittleEndian);

    let mut cursor = Cursor::new(b"MM".to_vec());
    std::assert_eq!(ByteOrder::detect(&mut cursor).unwrap(), ByteOrder::BigEndian);
}

#[test]
fn test_byte_order_detection_invalid() {
    let mut buffer = Vec::new();
    buffer.write_u16::<LittleEndian>(0x1234).unwrap();
    let mut cursor = Cursor::new(buffer);

    let result = ByteOrder::detect(&mut cursor);
    std::assert!(std::matches!(result, Err(TiffError::InvalidByteOrder(0x1234))));
}

#[test]
fn test_marker_round_trips_through_detection() {
    for order in [ByteOrder::LittleEndian, ByteOrder::BigEndian] {
        let mut cursor = Cursor::new(order.marker().to_vec());
        std::assert_eq!(ByteOrder::detect(&mut cursor).unwrap(), order);
    }
}

#[test]
fn test_big_endian_handler_reads() {
    let mut buffer = Vec::new();
    buffer.write_u16::<BigEndian>(0x1234).unwrap();
    buffer.write_u32::<BigEndian>(0x12345678).unwrap();
    buffer.write_u64::<BigEndian>(0x1234567890ABCDEF).unwrap();
    let mut cursor = Cursor::new(buffer);

    let handler = BigEndianHandler;

    std::assert_eq!(handler.read_u16(&mut cursor).unwrap(), 0x1234);
    std::assert_eq!(handler.read_u32(&mut cursor).unwrap(), 0x12345678);
    std::assert_eq!(handler.read_u64(&mut cursor).unwrap(), 0x1234567890ABCDEF);
}

#[test]
fn test_decode_from_slices() {
    let le = LittleEndianHandler;
    let be = BigEndianHandler;

    std::assert_eq!(le.decode_u16(&[0x34, 0x12]), 0x1234);
    std::assert_eq!(be.decode_u16(&[0x12, 0x34]), 0x1234);
    std::assert_eq!(le.decode_i16(&(-9999i16).to_le_bytes()), -9999);
    std::assert_eq!(be.decode_u32(&[0, 0, 0x0B, 0xEB]), 3051);
    std::assert_eq!(le.decode_f32(&152.25f32.to_le_bytes()), 152.25);
    std::assert_eq!(be.decode_f64(&30.0f64.to_be_bytes()), 30.0);
    std::assert_eq!(be.decode_u64(&7u64.to_be_bytes()), 7);
}
