//! Tests for the in-memory raster source and the builder that feeds it

extern crate std;

use crate::io::byte_order::ByteOrder;
use crate::raster::source::RasterSource;
use crate::raster::header::SampleFormat;
use crate::tiff::constants::tags;
use crate::tiff::builder::TiffBuilder;
use crate::tiff::errors::TiffError;
use crate::tiff::source::TiffSource;
use crate::tiff::tag_value::TagValue;

#[test]
fn test_striped_source_scanlines() {
    let bytes = TiffBuilder::new(3, 4)
        .u16_samples((0..12).collect())
        .rows_per_strip(3)
        .build()
        .unwrap();
    let mut source = TiffSource::from_bytes(bytes).unwrap();

    let header = source.header().clone();
    std::assert_eq!((header.width, header.height), (3, 4));
    std::assert_eq!(header.rows_per_strip, 3);
    std::assert_eq!(source.tile_count(), 0);

    let mut row = [0u8; 6];
    std::assert_eq!(source.read_scanline(3, &mut row), 6);
    std::assert_eq!(row, [9, 0, 10, 0, 11, 0]);
    std::assert_eq!(source.read_scanline(1, &mut row), 6);
    std::assert_eq!(row, [3, 0, 4, 0, 5, 0]);
}

#[test]
fn test_big_endian_tiled_bigtiff_source() {
    let bytes = TiffBuilder::new(5, 3)
        .byte_order(ByteOrder::BigEndian)
        .big_tiff(true)
        .f32_samples((0..15).map(|v| v as f32 * 0.5).collect())
        .tiled(4, 2)
        .build()
        .unwrap();
    let mut source = TiffSource::from_bytes(bytes).unwrap();

    std::assert!(source.is_big_tiff());
    std::assert_eq!(source.byte_order(), ByteOrder::BigEndian);
    std::assert_eq!(source.header().sample_format, SampleFormat::Float);
    std::assert_eq!(source.tile_count(), 4);

    // Tile 1 starts at column 4: first row holds sample 4 then padding
    let mut tile = std::vec![0u8; 4 * 2 * 4];
    std::assert_eq!(source.read_encoded_tile(1, &mut tile), tile.len());
    std::assert_eq!(f32::from_be_bytes([tile[0], tile[1], tile[2], tile[3]]), 2.0);
    std::assert_eq!(f32::from_be_bytes([tile[4], tile[5], tile[6], tile[7]]), 0.0);
}

#[test]
fn test_truncated_strip_reports_short_read() {
    let bytes = TiffBuilder::new(4, 2)
        .u16_samples(std::vec![7; 8])
        .truncate_chunk(0, 11)
        .build()
        .unwrap();
    let mut source = TiffSource::from_bytes(bytes).unwrap();

    let mut row = [0u8; 8];
    std::assert_eq!(source.read_scanline(0, &mut row), 8);
    std::assert_eq!(source.read_scanline(1, &mut row), 3);
}

#[test]
fn test_geo_tags_are_exposed() {
    let bytes = TiffBuilder::new(2, 2)
        .pixel_scale(10.0, 10.0)
        .tiepoint(500000.0, 6700000.0)
        .epsg(3067)
        .no_data("-9999")
        .build()
        .unwrap();
    let source = TiffSource::from_bytes(bytes).unwrap();

    std::assert_eq!(source.tag(tags::MODEL_PIXEL_SCALE_TAG).as_f64s()[..2], [10.0, 10.0]);
    std::assert_eq!(source.tag(tags::MODEL_TIEPOINT_TAG).len(), 6);
    std::assert_eq!(source.tag(tags::GEO_KEY_DIRECTORY_TAG).as_u16s(), std::vec![1, 1, 0, 1, 3072, 0, 1, 3067]);
    std::assert_eq!(source.tag(tags::GDAL_NODATA), TagValue::Ascii("-9999".to_string()));
    std::assert_eq!(source.tag(12345), TagValue::Missing);
}

#[test]
fn test_missing_dimensions_fail() {
    let bytes = TiffBuilder::new(2, 2)
        .tag(tags::IMAGE_WIDTH, crate::tiff::builder::FieldData::Longs(std::vec![0]))
        .build()
        .unwrap();
    std::assert!(std::matches!(TiffSource::from_bytes(bytes), Err(TiffError::MissingDimensions)));
}

#[test]
fn test_not_a_tiff() {
    let result = TiffSource::from_bytes(b"PK\x03\x04 definitely a zip".to_vec());
    std::assert!(std::matches!(result, Err(TiffError::InvalidByteOrder(_))));
}
