//! Import and terrain pipeline
//!
//! One file runs decode, normalize and surface building in sequence. A
//! batch runs that per file on the rayon pool, then fixes the reference
//! corner, places every tile and resolves adjacency once all files are in.

use log::{info, warn};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use crate::errors::{TerrainError, TerrainResult};
use crate::geo::georeference::GeoReference;
use crate::geo::tag_reader::read_geo_reference;
use crate::heightmap::normalizer::{normalize, NormalizedHeightmap, RangePolicy};
use crate::raster::decoder::decode_elevation;
use crate::raster::header::RasterHeader;
use crate::raster::source::RasterSource;
use crate::terrain::adjacency::{resolve_neighbors, Neighbors, ReferenceCorner, TileBounds};
use crate::terrain::mesh::{build_mesh, OutputMesh};
use crate::terrain::resample::{build_grid, OutputGrid};
use crate::terrain::resolution::{MeshTier, ResolutionTable};
use crate::terrain::sizing::{TerrainSize, TerrainSizing};
use crate::tiff::source::TiffSource;
use crate::utils::progress::ProgressTracker;

/// Settings for turning a raster into a normalized heightmap
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImportSettings {
    pub range: RangePolicy,
}

/// A decoded, normalized heightmap with its metadata
#[derive(Debug, Clone)]
pub struct ImportedHeightmap {
    /// File stem of the source
    pub name: String,
    pub header: RasterHeader,
    pub geo: GeoReference,
    pub heightmap: NormalizedHeightmap,
}

fn source_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Imports from an already opened source
pub fn import_from_source(
    source: &mut dyn RasterSource,
    name: &str,
    settings: &ImportSettings,
) -> TerrainResult<ImportedHeightmap> {
    let header = source.header().clone();
    header.log_summary();

    let geo = read_geo_reference(source, header.width, header.height);
    let grid = decode_elevation(source)?;
    let heightmap = normalize(grid, settings.range)?;

    info!("Imported {} ({}x{})", name, heightmap.width(), heightmap.height());
    Ok(ImportedHeightmap {
        name: name.to_string(),
        header,
        geo,
        heightmap,
    })
}

/// Imports from TIFF bytes held in memory
pub fn import_from_bytes(name: &str, bytes: Vec<u8>, settings: &ImportSettings) -> TerrainResult<ImportedHeightmap> {
    let mut source = TiffSource::from_bytes(bytes).map_err(|e| TerrainError::open_failure(name, e))?;
    import_from_source(&mut source, name, settings)
}

/// Imports a TIFF file from disk
pub fn import_heightmap<P: AsRef<Path>>(path: P, settings: &ImportSettings) -> TerrainResult<ImportedHeightmap> {
    let path = path.as_ref();
    info!("Importing {}", path.display());
    let mut source = TiffSource::open(path).map_err(|e| TerrainError::open_failure(path, e))?;
    import_from_source(&mut source, &source_name(path), settings)
}

/// Kind of surface to build
#[derive(Debug, Clone, PartialEq)]
pub enum TerrainRequest {
    /// Square height grid snapped to a resolution table
    Grid(ResolutionTable),
    /// Triangle mesh at a tier of the source resolution
    Mesh(MeshTier),
}

impl Default for TerrainRequest {
    fn default() -> Self {
        TerrainRequest::Grid(ResolutionTable::default())
    }
}

/// Surface of a built tile
#[derive(Debug, Clone, PartialEq)]
pub enum TerrainSurface {
    Grid(OutputGrid),
    Mesh(OutputMesh),
}

/// A terrain tile ready for the consumer
#[derive(Debug, Clone)]
pub struct TerrainTile {
    pub name: String,
    pub geo: GeoReference,
    pub size: TerrainSize,
    /// Placement (x, z) relative to the batch reference corner
    pub offset: (f64, f64),
    pub surface: TerrainSurface,
}

impl TerrainTile {
    /// Planar bounds of the placed tile
    pub fn bounds<H>(&self, handle: H) -> TileBounds<H> {
        TileBounds::from_placement(self.offset, self.size.planar(), handle)
    }
}

/// Builds the surface of one imported heightmap
pub fn build_terrain(
    imported: &ImportedHeightmap,
    request: &TerrainRequest,
    sizing: &TerrainSizing,
    offset: (f64, f64),
) -> TerrainResult<TerrainTile> {
    let size = sizing.resolve(&imported.heightmap, &imported.geo);
    let surface = match request {
        TerrainRequest::Grid(table) => TerrainSurface::Grid(build_grid(&imported.heightmap, table)),
        TerrainRequest::Mesh(tier) => TerrainSurface::Mesh(build_mesh(&imported.heightmap, *tier, size.as_f32())?),
    };

    Ok(TerrainTile {
        name: imported.name.clone(),
        geo: imported.geo.clone(),
        size,
        offset,
        surface,
    })
}

/// Options for batch processing
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    pub import: ImportSettings,
    pub request: TerrainRequest,
    pub sizing: TerrainSizing,
    pub show_progress: bool,
}

/// A file that failed somewhere in its pipeline
#[derive(Debug)]
pub struct BatchFailure {
    pub path: PathBuf,
    pub error: TerrainError,
}

/// Result of a batch run
///
/// `neighbors[i]` belongs to `tiles[i]`; neighbour handles are indices
/// into `tiles`.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub tiles: Vec<TerrainTile>,
    pub neighbors: Vec<Neighbors<usize>>,
    pub failures: Vec<BatchFailure>,
    pub reference: Option<ReferenceCorner>,
}

/// Imports and builds every file, then places tiles and resolves adjacency
///
/// A failing file is recorded in `failures` and does not affect the others.
pub fn build_terrain_batch<P>(paths: &[P], options: &BatchOptions) -> BatchReport
where
    P: AsRef<Path> + Sync,
{
    let progress = if options.show_progress {
        ProgressTracker::new(paths.len() as u64, "Building terrain tiles")
    } else {
        ProgressTracker::hidden()
    };

    let results: Vec<(PathBuf, TerrainResult<TerrainTile>)> = paths
        .par_iter()
        .map(|path| {
            let path = path.as_ref();
            let result = import_heightmap(path, &options.import)
                .and_then(|imported| build_terrain(&imported, &options.request, &options.sizing, (0.0, 0.0)));
            progress.increment(1);
            (path.to_path_buf(), result)
        })
        .collect();
    progress.finish();

    let mut report = BatchReport::default();
    for (path, result) in results {
        match result {
            Ok(tile) => report.tiles.push(tile),
            Err(error) => {
                warn!("Skipping {}: {}", path.display(), error);
                report.failures.push(BatchFailure { path, error });
            }
        }
    }

    report.reference = ReferenceCorner::from_first(report.tiles.iter().map(|tile| &tile.geo));
    let Some(reference) = report.reference else {
        warn!("No tile carries georeferencing; tiles stay at the origin without neighbours");
        report.neighbors = vec![Neighbors::default(); report.tiles.len()];
        return report;
    };

    for tile in &mut report.tiles {
        if tile.geo.georeferenced {
            tile.offset = reference.offset_of(&tile.geo);
        } else {
            warn!("{} has no georeferencing; placing it at the origin", tile.name);
        }
    }

    let bounds: Vec<TileBounds<usize>> = report
        .tiles
        .iter()
        .enumerate()
        .map(|(i, tile)| tile.bounds(i))
        .collect();
    report.neighbors = resolve_neighbors(&bounds);

    info!("Batch finished: {} tiles, {} failures", report.tiles.len(), report.failures.len());
    report
}
