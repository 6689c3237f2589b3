//! Output resolution selection
//!
//! Grid surfaces use power-of-two-plus-one sizes snapped from a fixed
//! table; meshes derive their size from a tier of the source dimensions.

use std::fmt;
use std::str::FromStr;

use crate::errors::{TerrainError, TerrainResult};

/// Default grid sizes, ascending
pub const SUPPORTED_RESOLUTIONS: [u32; 8] = [33, 65, 129, 257, 513, 1025, 2049, 4097];

/// Nearest entry of the default table to `source`
pub fn closest_supported_resolution(source: u32) -> u32 {
    closest_in(&SUPPORTED_RESOLUTIONS, source)
}

/// Nearest entry of `table` by absolute difference; the earliest entry
/// wins a tie. `table` must not be empty.
fn closest_in(table: &[u32], source: u32) -> u32 {
    let mut best = table[0];
    let mut best_diff = best.abs_diff(source);
    for &candidate in &table[1..] {
        let diff = candidate.abs_diff(source);
        if diff < best_diff {
            best = candidate;
            best_diff = diff;
        }
    }
    best
}

/// An ascending, non-empty table of allowed grid sizes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionTable {
    sizes: Vec<u32>,
}

impl Default for ResolutionTable {
    fn default() -> Self {
        ResolutionTable { sizes: SUPPORTED_RESOLUTIONS.to_vec() }
    }
}

impl ResolutionTable {
    /// Validates a custom table: non-empty, strictly ascending, all >= 2
    pub fn new(sizes: Vec<u32>) -> TerrainResult<Self> {
        if sizes.is_empty() {
            return Err(TerrainError::Config("resolution table is empty".to_string()));
        }
        if sizes.iter().any(|&s| s < 2) {
            return Err(TerrainError::Config("grid resolutions must be at least 2".to_string()));
        }
        if sizes.windows(2).any(|w| w[0] >= w[1]) {
            return Err(TerrainError::Config(format!(
                "grid resolutions must be strictly ascending: {:?}",
                sizes
            )));
        }
        Ok(ResolutionTable { sizes })
    }

    pub fn sizes(&self) -> &[u32] {
        &self.sizes
    }

    /// Snaps the smaller source dimension onto the table
    pub fn snap(&self, source_width: u32, source_height: u32) -> u32 {
        closest_in(&self.sizes, source_width.min(source_height))
    }
}

/// Mesh resolution relative to the source raster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeshTier {
    #[default]
    Full,
    Half,
    Quarter,
    Eighth,
}

impl MeshTier {
    pub fn divisor(&self) -> u32 {
        match self {
            MeshTier::Full => 1,
            MeshTier::Half => 2,
            MeshTier::Quarter => 4,
            MeshTier::Eighth => 8,
        }
    }

    /// Vertex counts along X and Z, each at least 2
    pub fn target_dims(&self, source_width: u32, source_height: u32) -> (u32, u32) {
        let divisor = self.divisor();
        ((source_width / divisor).max(2), (source_height / divisor).max(2))
    }

    pub fn name(&self) -> &'static str {
        match self {
            MeshTier::Full => "full",
            MeshTier::Half => "half",
            MeshTier::Quarter => "quarter",
            MeshTier::Eighth => "eighth",
        }
    }
}

impl fmt::Display for MeshTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MeshTier {
    type Err = TerrainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(MeshTier::Full),
            "half" => Ok(MeshTier::Half),
            "quarter" => Ok(MeshTier::Quarter),
            "eighth" => Ok(MeshTier::Eighth),
            other => Err(TerrainError::Config(format!(
                "unknown mesh tier '{}', expected full, half, quarter or eighth",
                other
            ))),
        }
    }
}
