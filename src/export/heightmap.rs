//! Heightmap writers
//!
//! The `.r16` dump keeps the heightmap row order (row 0 is the southern
//! edge). The PNG is written north-up so it reads like a map.

use image::{ImageBuffer, Luma};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{TerrainError, TerrainResult};
use crate::export::toml_error;
use crate::geo::georeference::GeoReference;
use crate::heightmap::normalizer::NormalizedHeightmap;
use crate::pipeline::ImportedHeightmap;

/// Paths written for one heightmap
#[derive(Debug, Clone, PartialEq)]
pub struct HeightmapFiles {
    pub png: PathBuf,
    pub raw: PathBuf,
    pub meta: PathBuf,
}

/// Writes the heightmap as a 16-bit grayscale PNG, north row first
pub fn write_heightmap_png<P: AsRef<Path>>(map: &NormalizedHeightmap, path: P) -> TerrainResult<()> {
    let width = map.width();
    let height = map.height();
    let mut pixels = Vec::with_capacity(width * height);
    for row in (0..height).rev() {
        pixels.extend_from_slice(&map.samples()[row * width..(row + 1) * width]);
    }

    let image: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_raw(width as u32, height as u32, pixels)
        .ok_or_else(|| TerrainError::UnsupportedRasterFormat(format!(
            "heightmap {}x{} does not fit a PNG buffer", width, height
        )))?;
    image.save(path.as_ref())?;
    Ok(())
}

/// Writes the raw little-endian 16-bit samples
pub fn write_raw16<P: AsRef<Path>>(map: &NormalizedHeightmap, path: P) -> TerrainResult<()> {
    fs::write(path, map.to_le_bytes())?;
    Ok(())
}

fn geo_table(geo: &GeoReference) -> toml::Table {
    let mut table = toml::Table::new();
    table.insert("georeferenced".into(), toml::Value::Boolean(geo.georeferenced));
    table.insert("epsg_code".into(), toml::Value::Integer(geo.epsg_code as i64));
    table.insert("pixel_size_x".into(), toml::Value::Float(geo.pixel_size_x));
    table.insert("pixel_size_y".into(), toml::Value::Float(geo.pixel_size_y));
    table.insert("origin_x".into(), toml::Value::Float(geo.origin_x));
    table.insert("origin_y".into(), toml::Value::Float(geo.origin_y));
    table.insert("min_x".into(), toml::Value::Float(geo.min_x));
    table.insert("max_x".into(), toml::Value::Float(geo.max_x));
    table.insert("min_y".into(), toml::Value::Float(geo.min_y));
    table.insert("max_y".into(), toml::Value::Float(geo.max_y));
    if geo.has_no_data {
        table.insert("no_data".into(), toml::Value::Float(geo.no_data_value));
    }
    table
}

/// Sidecar document describing an imported heightmap
pub fn metadata_document(imported: &ImportedHeightmap) -> toml::Table {
    let map = &imported.heightmap;
    let mut root = toml::Table::new();
    root.insert("name".into(), toml::Value::String(imported.name.clone()));
    root.insert("width".into(), toml::Value::Integer(map.width() as i64));
    root.insert("height".into(), toml::Value::Integer(map.height() as i64));
    root.insert("min_elevation".into(), toml::Value::Float(map.min_elevation()));
    root.insert("max_elevation".into(), toml::Value::Float(map.max_elevation()));
    root.insert("geo".into(), toml::Value::Table(geo_table(&imported.geo)));
    root
}

/// Writes the `.meta.toml` sidecar
pub fn write_metadata<P: AsRef<Path>>(imported: &ImportedHeightmap, path: P) -> TerrainResult<()> {
    let text = toml::to_string(&metadata_document(imported)).map_err(toml_error)?;
    fs::write(path, text)?;
    Ok(())
}

/// Writes `<name>.png`, `<name>.r16` and `<name>.meta.toml` into `dir`
pub fn write_heightmap_files<P: AsRef<Path>>(imported: &ImportedHeightmap, dir: P) -> TerrainResult<HeightmapFiles> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let files = HeightmapFiles {
        png: dir.join(format!("{}.png", imported.name)),
        raw: dir.join(format!("{}.r16", imported.name)),
        meta: dir.join(format!("{}.meta.toml", imported.name)),
    };

    write_heightmap_png(&imported.heightmap, &files.png)?;
    write_raw16(&imported.heightmap, &files.raw)?;
    write_metadata(imported, &files.meta)?;

    info!("Wrote heightmap {} to {}", imported.name, dir.display());
    Ok(files)
}
