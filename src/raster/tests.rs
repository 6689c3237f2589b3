//! Decoder tests over synthetic rasters

use crate::errors::TerrainError;
use crate::io::byte_order::ByteOrder;
use crate::raster::decode_elevation;
use crate::tiff::constants::tags;
use crate::tiff::{FieldData, TiffBuilder, TiffSource};

fn decode(builder: TiffBuilder) -> Vec<f32> {
    let mut source = TiffSource::from_bytes(builder.build().unwrap()).unwrap();
    decode_elevation(&mut source).unwrap().into_vec()
}

#[test]
fn test_striped_decode_flips_rows() {
    // Row 0 (north) = 10, row 1 (south) = 20
    let grid = decode(TiffBuilder::new(2, 2).u16_samples(vec![10, 10, 20, 20]));
    assert_eq!(grid, vec![20.0, 20.0, 10.0, 10.0]);
}

#[test]
fn test_float_decode_preserves_values() {
    let grid = decode(
        TiffBuilder::new(2, 2)
            .byte_order(ByteOrder::BigEndian)
            .f32_samples(vec![-12.5, 0.25, 8848.0, f32::NAN]),
    );
    assert_eq!(grid[0], 8848.0);
    assert!(grid[1].is_nan());
    assert_eq!(grid[2], -12.5);
    assert_eq!(grid[3], 0.25);
}

#[test]
fn test_signed_samples_widen_as_signed() {
    let grid = decode(TiffBuilder::new(1, 2).i16_samples(vec![-32768, 42]));
    assert_eq!(grid, vec![42.0, -32768.0]);
}

#[test]
fn test_tiled_matches_striped() {
    let samples: Vec<f32> = (0..64).map(|v| (v * 7 % 23) as f32 + 0.5).collect();
    let striped = decode(TiffBuilder::new(8, 8).f32_samples(samples.clone()).rows_per_strip(3));
    let tiled = decode(TiffBuilder::new(8, 8).f32_samples(samples).tiled(4, 4));

    let striped_bits: Vec<u32> = striped.iter().map(|v| v.to_bits()).collect();
    let tiled_bits: Vec<u32> = tiled.iter().map(|v| v.to_bits()).collect();
    assert_eq!(striped_bits, tiled_bits);
}

#[test]
fn test_overhanging_tiles_copy_in_bounds_part() {
    let samples: Vec<u16> = (1..=15).collect();
    let striped = decode(TiffBuilder::new(5, 3).u16_samples(samples.clone()));
    let tiled = decode(TiffBuilder::new(5, 3).u16_samples(samples).tiled(4, 2));
    assert_eq!(striped, tiled);
    // Bottom-left output cell is source row 2, column 0
    assert_eq!(tiled[0], 11.0);
}

#[test]
fn test_truncated_tile_keeps_zero_fill() {
    // Tile 0 keeps only its first row (2 samples of 2 bytes)
    let grid = decode(
        TiffBuilder::new(2, 2)
            .u16_samples(vec![1, 2, 3, 4])
            .tiled(2, 2)
            .truncate_chunk(0, 4),
    );
    assert_eq!(grid, vec![0.0, 0.0, 1.0, 2.0]);
}

#[test]
fn test_truncated_strip_keeps_partial_row() {
    let grid = decode(
        TiffBuilder::new(3, 2)
            .u16_samples(vec![1, 2, 3, 4, 5, 6])
            .truncate_chunk(0, 9),
    );
    // Source row 1 lost its last 1.5 samples; the half sample is dropped
    assert_eq!(grid, vec![4.0, 0.0, 0.0, 1.0, 2.0, 3.0]);
}

#[test]
fn test_multiband_rejected_without_grid() {
    let bytes = TiffBuilder::new(2, 2).samples_per_pixel(3).build().unwrap();
    let mut source = TiffSource::from_bytes(bytes).unwrap();
    assert!(matches!(decode_elevation(&mut source), Err(TerrainError::UnsupportedRasterFormat(_))));
}

#[test]
fn test_compressed_rejected() {
    let bytes = TiffBuilder::new(2, 2).compression(5).build().unwrap();
    let mut source = TiffSource::from_bytes(bytes).unwrap();
    assert!(matches!(decode_elevation(&mut source), Err(TerrainError::UnsupportedRasterFormat(_))));
}

#[test]
fn test_huge_tile_dimensions_rejected_before_allocation() {
    let bytes = TiffBuilder::new(4, 4)
        .u16_samples(vec![0; 16])
        .tiled(4, 4)
        .tag(tags::TILE_WIDTH, FieldData::Longs(vec![u32::MAX]))
        .tag(tags::TILE_LENGTH, FieldData::Longs(vec![u32::MAX]))
        .build()
        .unwrap();
    let mut source = TiffSource::from_bytes(bytes).unwrap();
    assert!(matches!(decode_elevation(&mut source), Err(TerrainError::UnsupportedRasterFormat(_))));
}

#[test]
fn test_huge_declared_raster_rejected_before_allocation() {
    // A few hundred bytes claiming a 1,000,000 x 1,000,000 raster
    let bytes = TiffBuilder::new(2, 2)
        .u16_samples(vec![1, 2, 3, 4])
        .tag(tags::IMAGE_WIDTH, FieldData::Longs(vec![1_000_000]))
        .tag(tags::IMAGE_LENGTH, FieldData::Longs(vec![1_000_000]))
        .build()
        .unwrap();
    let mut source = TiffSource::from_bytes(bytes).unwrap();
    assert!(matches!(decode_elevation(&mut source), Err(TerrainError::UnsupportedRasterFormat(_))));
}
