//! GeoTIFF elevation import and terrain generation
//!
//! Decodes single-band DEM rasters (striped or tiled, 16-bit integer or
//! 32-bit float), normalizes them to 16-bit heightmaps, and builds snapped
//! height grids or triangle meshes. Batches of tiles are placed against a
//! shared reference corner and their edge neighbours resolved.

pub mod io;
pub mod tiff;
pub mod raster;
pub mod geo;
pub mod heightmap;
pub mod terrain;
pub mod pipeline;
pub mod config;
pub mod export;
pub mod commands;
pub mod errors;
pub mod utils;

pub use config::PipelineConfig;
pub use errors::{TerrainError, TerrainResult};
pub use geo::GeoReference;
pub use heightmap::{NormalizedHeightmap, RangePolicy};
pub use pipeline::{
    build_terrain, build_terrain_batch, import_from_bytes, import_heightmap, BatchOptions, BatchReport,
    ImportSettings, ImportedHeightmap, TerrainRequest, TerrainSurface, TerrainTile,
};
pub use raster::{ElevationGrid, RasterSource};
pub use terrain::{MeshTier, Neighbors, OutputGrid, OutputMesh, ResolutionTable, TerrainSizing};
pub use tiff::{TiffReader, TiffSource};
