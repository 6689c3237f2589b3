//! Tile adjacency
//!
//! Tiles are placed in a shared plane relative to a reference corner, then
//! every pair is compared: two tiles are horizontal neighbours when their Z
//! extents overlap and the facing X edges are within `EDGE_TOLERANCE`, and
//! vertical neighbours by the same rule with the axes swapped.

use log::{debug, info};

use crate::geo::georeference::GeoReference;

/// Largest gap between facing edges that still counts as touching
pub const EDGE_TOLERANCE: f64 = 0.1;

/// Planar extent of one placed tile
#[derive(Debug, Clone, PartialEq)]
pub struct TileBounds<H> {
    pub min_x: f64,
    pub max_x: f64,
    pub min_z: f64,
    pub max_z: f64,
    /// Caller's handle for the tile
    pub handle: H,
}

impl<H> TileBounds<H> {
    /// Bounds of a tile placed at `offset` with planar `size` (x, z)
    pub fn from_placement(offset: (f64, f64), size: (f64, f64), handle: H) -> Self {
        TileBounds {
            min_x: offset.0,
            max_x: offset.0 + size.0,
            min_z: offset.1,
            max_z: offset.1 + size.1,
            handle,
        }
    }
}

/// Neighbour handles of one tile; `None` means no neighbour on that side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neighbors<H> {
    pub left: Option<H>,
    pub right: Option<H>,
    pub top: Option<H>,
    pub bottom: Option<H>,
}

impl<H> Default for Neighbors<H> {
    fn default() -> Self {
        Neighbors { left: None, right: None, top: None, bottom: None }
    }
}

impl<H> Neighbors<H> {
    pub fn count(&self) -> usize {
        [&self.left, &self.right, &self.top, &self.bottom]
            .iter()
            .filter(|side| side.is_some())
            .count()
    }
}

fn ranges_overlap(a_min: f64, a_max: f64, b_min: f64, b_max: f64) -> bool {
    a_min < b_max && b_min < a_max
}

/// Assigns neighbours to every tile, in input order
///
/// All pairs are scanned; if several tiles qualify for one side the last
/// one in input order is kept.
pub fn resolve_neighbors<H: Clone>(tiles: &[TileBounds<H>]) -> Vec<Neighbors<H>> {
    let mut result = Vec::with_capacity(tiles.len());

    for (i, a) in tiles.iter().enumerate() {
        let mut neighbors = Neighbors::default();

        for (j, b) in tiles.iter().enumerate() {
            if i == j {
                continue;
            }

            if ranges_overlap(a.min_z, a.max_z, b.min_z, b.max_z) {
                if (b.min_x - a.max_x).abs() < EDGE_TOLERANCE {
                    neighbors.right = Some(b.handle.clone());
                }
                if (a.min_x - b.max_x).abs() < EDGE_TOLERANCE {
                    neighbors.left = Some(b.handle.clone());
                }
            }

            if ranges_overlap(a.min_x, a.max_x, b.min_x, b.max_x) {
                if (b.min_z - a.max_z).abs() < EDGE_TOLERANCE {
                    neighbors.top = Some(b.handle.clone());
                }
                if (a.min_z - b.max_z).abs() < EDGE_TOLERANCE {
                    neighbors.bottom = Some(b.handle.clone());
                }
            }
        }

        debug!("Tile {} has {} neighbour(s)", i, neighbors.count());
        result.push(neighbors);
    }

    info!("Resolved neighbours for {} tiles", tiles.len());
    result
}

/// Shared origin of a batch: the minimum corner of its reference tile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceCorner {
    pub min_x: f64,
    pub min_y: f64,
}

impl ReferenceCorner {
    /// Corner of the first georeferenced entry, in iteration order
    pub fn from_first<'a, I>(geos: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a GeoReference>,
    {
        geos.into_iter()
            .find(|geo| geo.georeferenced)
            .map(|geo| ReferenceCorner { min_x: geo.min_x, min_y: geo.min_y })
    }

    /// Placement offset (x, z) of a tile relative to this corner
    pub fn offset_of(&self, geo: &GeoReference) -> (f64, f64) {
        (geo.min_x - self.min_x, geo.min_y - self.min_y)
    }
}
