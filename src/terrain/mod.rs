//! Terrain surfaces
//!
//! Resampling of normalized heightmaps into grids and meshes, terrain
//! sizing, and adjacency between placed tiles.

pub mod adjacency;
pub mod mesh;
pub mod resample;
pub mod resolution;
pub mod sizing;

pub use adjacency::{resolve_neighbors, Neighbors, ReferenceCorner, TileBounds, EDGE_TOLERANCE};
pub use mesh::{build_mesh, MeshBounds, OutputMesh};
pub use resample::{build_grid, resample_grid, OutputGrid};
pub use resolution::{closest_supported_resolution, MeshTier, ResolutionTable, SUPPORTED_RESOLUTIONS};
pub use sizing::{TerrainSize, TerrainSizing};
