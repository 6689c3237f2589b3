use std::io::Cursor;
use byteorder::{BigEndian, LittleEndian, WriteBytesExt};

/// Hand-assembled little-endian TIFF with a 2-entry IFD (800 x 600)
pub fn create_test_tiff_buffer() -> Cursor<Vec<u8>> {
    let mut buffer = Vec::new();

    buffer.write_u16::<LittleEndian>(0x4949).unwrap(); // II
    buffer.write_u16::<LittleEndian>(42).unwrap();
    buffer.write_u32::<LittleEndian>(8).unwrap();      // IFD offset

    buffer.write_u16::<LittleEndian>(2).unwrap();      // Entry count

    // ImageWidth, LONG
    buffer.write_u16::<LittleEndian>(256).unwrap();
    buffer.write_u16::<LittleEndian>(4).unwrap();
    buffer.write_u32::<LittleEndian>(1).unwrap();
    buffer.write_u32::<LittleEndian>(800).unwrap();

    // ImageLength, SHORT stored in the first two slot bytes
    buffer.write_u16::<LittleEndian>(257).unwrap();
    buffer.write_u16::<LittleEndian>(3).unwrap();
    buffer.write_u32::<LittleEndian>(1).unwrap();
    buffer.write_u16::<LittleEndian>(600).unwrap();
    buffer.write_u16::<LittleEndian>(0).unwrap();

    buffer.write_u32::<LittleEndian>(0).unwrap();      // No next IFD

    Cursor::new(buffer)
}

/// Hand-assembled big-endian TIFF whose IFD holds an inline SHORT
/// and an external DOUBLE pair
pub fn create_big_endian_tiff_buffer() -> Cursor<Vec<u8>> {
    let mut buffer = Vec::new();

    buffer.write_u16::<BigEndian>(0x4D4D).unwrap(); // MM
    buffer.write_u16::<BigEndian>(42).unwrap();
    buffer.write_u32::<BigEndian>(24).unwrap();     // IFD after the doubles

    // Offset 8: two doubles
    buffer.write_f64::<BigEndian>(30.0).unwrap();
    buffer.write_f64::<BigEndian>(10.0).unwrap();

    // Offset 24: IFD
    buffer.write_u16::<BigEndian>(2).unwrap();

    // BitsPerSample, SHORT: value in the first two slot bytes
    buffer.write_u16::<BigEndian>(258).unwrap();
    buffer.write_u16::<BigEndian>(3).unwrap();
    buffer.write_u32::<BigEndian>(1).unwrap();
    buffer.write_u16::<BigEndian>(16).unwrap();
    buffer.write_u16::<BigEndian>(0).unwrap();

    // ModelPixelScale, DOUBLE x2 at offset 8
    buffer.write_u16::<BigEndian>(33550).unwrap();
    buffer.write_u16::<BigEndian>(12).unwrap();
    buffer.write_u32::<BigEndian>(2).unwrap();
    buffer.write_u32::<BigEndian>(8).unwrap();

    buffer.write_u32::<BigEndian>(0).unwrap();

    Cursor::new(buffer)
}

/// Hand-assembled little-endian BigTIFF with a 2-entry IFD (1024 x 768)
pub fn create_test_bigtiff_buffer() -> Cursor<Vec<u8>> {
    let mut buffer = Vec::new();

    buffer.write_u16::<LittleEndian>(0x4949).unwrap();
    buffer.write_u16::<LittleEndian>(43).unwrap();
    buffer.write_u16::<LittleEndian>(8).unwrap();      // Offset size
    buffer.write_u16::<LittleEndian>(0).unwrap();      // Reserved
    buffer.write_u64::<LittleEndian>(16).unwrap();     // IFD offset

    buffer.write_u64::<LittleEndian>(2).unwrap();

    buffer.write_u16::<LittleEndian>(256).unwrap();
    buffer.write_u16::<LittleEndian>(16).unwrap();     // LONG8
    buffer.write_u64::<LittleEndian>(1).unwrap();
    buffer.write_u64::<LittleEndian>(1024).unwrap();

    buffer.write_u16::<LittleEndian>(257).unwrap();
    buffer.write_u16::<LittleEndian>(4).unwrap();      // LONG
    buffer.write_u64::<LittleEndian>(1).unwrap();
    buffer.write_u32::<LittleEndian>(768).unwrap();
    buffer.write_u32::<LittleEndian>(0).unwrap();

    buffer.write_u64::<LittleEndian>(0).unwrap();

    Cursor::new(buffer)
}
