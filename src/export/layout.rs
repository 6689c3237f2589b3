//! Batch layout document
//!
//! Lists every placed tile with its offset, size and neighbours by name so a
//! host can stitch the terrains without re-running adjacency.

use std::fs;
use std::path::Path;

use crate::errors::TerrainResult;
use crate::export::toml_error;
use crate::pipeline::BatchReport;

pub fn layout_document(report: &BatchReport) -> toml::Table {
    let mut root = toml::Table::new();
    if let Some(reference) = report.reference {
        let mut corner = toml::Table::new();
        corner.insert("min_x".into(), toml::Value::Float(reference.min_x));
        corner.insert("min_y".into(), toml::Value::Float(reference.min_y));
        root.insert("reference".into(), toml::Value::Table(corner));
    }

    let name_of = |index: &Option<usize>| index.and_then(|i| report.tiles.get(i)).map(|t| t.name.clone());

    let tiles = report
        .tiles
        .iter()
        .zip(&report.neighbors)
        .map(|(tile, neighbors)| {
            let mut entry = toml::Table::new();
            entry.insert("name".into(), toml::Value::String(tile.name.clone()));
            entry.insert("offset_x".into(), toml::Value::Float(tile.offset.0));
            entry.insert("offset_z".into(), toml::Value::Float(tile.offset.1));
            entry.insert("width".into(), toml::Value::Float(tile.size.width));
            entry.insert("length".into(), toml::Value::Float(tile.size.length));
            entry.insert("height".into(), toml::Value::Float(tile.size.height));
            for (side, handle) in [
                ("left", &neighbors.left),
                ("right", &neighbors.right),
                ("top", &neighbors.top),
                ("bottom", &neighbors.bottom),
            ] {
                if let Some(name) = name_of(handle) {
                    entry.insert(side.into(), toml::Value::String(name));
                }
            }
            toml::Value::Table(entry)
        })
        .collect();
    root.insert("tiles".into(), toml::Value::Array(tiles));

    if !report.failures.is_empty() {
        let failed = report
            .failures
            .iter()
            .map(|f| toml::Value::String(f.path.display().to_string()))
            .collect();
        root.insert("failed".into(), toml::Value::Array(failed));
    }
    root
}

/// Writes the layout document of a batch
pub fn write_layout<P: AsRef<Path>>(report: &BatchReport, path: P) -> TerrainResult<()> {
    let text = toml::to_string(&layout_document(report)).map_err(toml_error)?;
    fs::write(path, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::georeference::GeoReference;
    use crate::pipeline::{TerrainSurface, TerrainTile};
    use crate::terrain::adjacency::{Neighbors, ReferenceCorner};
    use crate::terrain::mesh::{MeshBounds, OutputMesh};
    use crate::terrain::sizing::TerrainSize;

    fn tile(name: &str, offset: (f64, f64)) -> TerrainTile {
        TerrainTile {
            name: name.to_string(),
            geo: GeoReference::default(),
            size: TerrainSize { width: 10.0, height: 1.0, length: 10.0 },
            offset,
            surface: TerrainSurface::Mesh(OutputMesh {
                positions: Vec::new(),
                uvs: Vec::new(),
                normals: Vec::new(),
                indices: Vec::new(),
                bounds: MeshBounds { min: [0.0; 3], max: [0.0; 3] },
                resolution_x: 0,
                resolution_z: 0,
            }),
        }
    }

    #[test]
    fn test_neighbours_by_name() {
        let report = BatchReport {
            tiles: vec![tile("west", (0.0, 0.0)), tile("east", (10.0, 0.0))],
            neighbors: vec![
                Neighbors { right: Some(1), ..Neighbors::default() },
                Neighbors { left: Some(0), ..Neighbors::default() },
            ],
            failures: Vec::new(),
            reference: Some(ReferenceCorner { min_x: 500.0, min_y: 100.0 }),
        };

        let text = toml::to_string(&layout_document(&report)).unwrap();
        let doc: toml::Value = text.parse().unwrap();
        assert_eq!(doc["reference"]["min_x"].as_float(), Some(500.0));
        let tiles = doc["tiles"].as_array().unwrap();
        assert_eq!(tiles[0]["right"].as_str(), Some("east"));
        assert!(tiles[0].get("left").is_none());
        assert_eq!(tiles[1]["left"].as_str(), Some("west"));
        assert_eq!(tiles[1]["offset_x"].as_float(), Some(10.0));
        assert!(doc.get("failed").is_none());
    }
}
