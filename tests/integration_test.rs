//! Integration tests for the import and terrain pipeline

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::tempdir;

use terrainkit::tiff::TiffBuilder;
use terrainkit::{
    build_terrain, build_terrain_batch, import_heightmap, BatchOptions, ImportSettings, MeshTier, RangePolicy,
    TerrainError, TerrainRequest, TerrainSizing, TerrainSurface,
};

/// Writes a 4x4 float tile with 10 m pixels whose upper-left corner is (x, y)
fn write_tile(dir: &Path, name: &str, x: f64, y: f64, base: f32) -> PathBuf {
    let samples = (0..16).map(|i| base + i as f32).collect();
    let bytes = TiffBuilder::new(4, 4)
        .f32_samples(samples)
        .pixel_scale(10.0, 10.0)
        .tiepoint(x, y)
        .epsg(3067)
        .build()
        .unwrap();
    let path = dir.join(format!("{}.tif", name));
    fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn test_import_tiled_big_endian_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tiled.tif");
    let samples: Vec<u16> = (0..12 * 10).map(|i| i as u16).collect();
    let bytes = TiffBuilder::new(12, 10)
        .byte_order(terrainkit::tiff::ByteOrder::BigEndian)
        .u16_samples(samples)
        .tiled(16, 16)
        .build()
        .unwrap();
    fs::write(&path, bytes).unwrap();

    let imported = import_heightmap(&path, &ImportSettings::default()).unwrap();
    assert_eq!(imported.name, "tiled");
    assert_eq!(imported.heightmap.width(), 12);
    assert_eq!(imported.heightmap.height(), 10);
    assert_eq!(imported.heightmap.min_elevation(), 0.0);
    assert_eq!(imported.heightmap.max_elevation(), 119.0);
    // Last source row ends up first
    assert_eq!(imported.heightmap.elevation_at(0, 0).map(f64::round), Some(108.0));
    assert!(!imported.geo.georeferenced);

    let tile = build_terrain(&imported, &TerrainRequest::default(), &TerrainSizing::default(), (0.0, 0.0)).unwrap();
    match tile.surface {
        TerrainSurface::Grid(grid) => assert_eq!(grid.resolution_x(), 33),
        TerrainSurface::Mesh(_) => panic!("expected a grid"),
    }
}

#[test]
fn test_manual_range_clamps() {
    let dir = tempdir().unwrap();
    let path = write_tile(dir.path(), "clamped", 0.0, 40.0, 95.0);
    let settings = ImportSettings { range: RangePolicy::Manual { min: 0.0, max: 100.0 } };

    let imported = import_heightmap(&path, &settings).unwrap();
    assert_eq!(imported.heightmap.min_elevation(), 0.0);
    assert_eq!(imported.heightmap.max_elevation(), 100.0);
    assert!(imported.heightmap.samples().iter().filter(|&&s| s == u16::MAX).count() >= 10);
}

#[test]
fn test_batch_adjacency_and_failure_isolation() {
    let dir = tempdir().unwrap();
    let southwest = write_tile(dir.path(), "sw", 1000.0, 2040.0, 0.0);
    let southeast = write_tile(dir.path(), "se", 1040.0, 2040.0, 20.0);
    let northwest = write_tile(dir.path(), "nw", 1000.0, 2080.0, 40.0);
    let broken = dir.path().join("broken.tif");
    fs::write(&broken, b"II\x2a\x00garbage").unwrap();
    let missing = dir.path().join("missing.tif");

    let options = BatchOptions {
        request: TerrainRequest::Mesh(MeshTier::Half),
        ..BatchOptions::default()
    };
    let paths = vec![southwest, broken.clone(), southeast, northwest, missing.clone()];
    let report = build_terrain_batch(&paths, &options);

    let names: Vec<&str> = report.tiles.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["sw", "se", "nw"]);
    assert_eq!(report.failures.len(), 2);
    assert_eq!(report.failures[0].path, broken);
    assert_eq!(report.failures[1].path, missing);
    assert!(report
        .failures
        .iter()
        .all(|f| matches!(f.error, TerrainError::SourceOpenFailure { .. })));

    let reference = report.reference.unwrap();
    assert_eq!((reference.min_x, reference.min_y), (1000.0, 2000.0));
    assert_eq!(report.tiles[0].offset, (0.0, 0.0));
    assert_eq!(report.tiles[1].offset, (40.0, 0.0));
    assert_eq!(report.tiles[2].offset, (0.0, 40.0));

    let sw = &report.neighbors[0];
    assert_eq!(sw.right, Some(1));
    assert_eq!(sw.top, Some(2));
    assert_eq!(sw.left, None);
    assert_eq!(sw.bottom, None);
    assert_eq!(report.neighbors[1].left, Some(0));
    assert_eq!(report.neighbors[2].bottom, Some(0));
    // Diagonal tiles are not neighbours
    assert_eq!(report.neighbors[1].count(), 1);
    assert_eq!(report.neighbors[2].count(), 1);

    for tile in &report.tiles {
        assert_eq!(tile.size.width, 40.0);
        assert_eq!(tile.size.length, 40.0);
        match &tile.surface {
            TerrainSurface::Mesh(mesh) => assert_eq!(mesh.vertex_count(), 4),
            TerrainSurface::Grid(_) => panic!("expected a mesh"),
        }
    }
}

#[test]
fn test_batch_without_georeferencing_has_no_neighbours() {
    let dir = tempdir().unwrap();
    let paths: Vec<PathBuf> = ["a", "b"]
        .iter()
        .map(|name| {
            let path = dir.path().join(format!("{}.tif", name));
            fs::write(&path, TiffBuilder::new(2, 2).u16_samples(vec![1, 2, 3, 4]).build().unwrap()).unwrap();
            path
        })
        .collect();

    let report = build_terrain_batch(&paths, &BatchOptions::default());
    assert_eq!(report.tiles.len(), 2);
    assert!(report.reference.is_none());
    assert!(report.tiles.iter().all(|t| t.offset == (0.0, 0.0)));
    assert!(report.neighbors.iter().all(|n| n.count() == 0));
}
