//! Elevation range detection and 16-bit normalization
//!
//! Elevations are mapped linearly onto `0..=65535`, with the range floored
//! to `RANGE_EPSILON` so flat rasters do not divide by zero.

use log::{debug, info, warn};

use crate::errors::{TerrainError, TerrainResult};
use crate::raster::elevation::ElevationGrid;

/// Smallest range used for the mapping, in elevation units
pub const RANGE_EPSILON: f64 = 1e-4;

/// Largest fixed-point sample
pub const SAMPLE_MAX: u16 = u16::MAX;

/// Default manual range used when none is configured
pub const DEFAULT_MANUAL_MIN: f64 = 0.0;
pub const DEFAULT_MANUAL_MAX: f64 = 500.0;

/// How the elevation range is chosen
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RangePolicy {
    /// Scan the grid for the finite minimum and maximum
    #[default]
    Auto,
    /// Use a fixed range; samples outside it are clamped
    Manual { min: f64, max: f64 },
}

/// Elevation range used for the mapping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationRange {
    pub min: f64,
    pub max: f64,
}

impl ElevationRange {
    /// `max - min`, floored to `RANGE_EPSILON`
    pub fn span(&self) -> f64 {
        (self.max - self.min).max(RANGE_EPSILON)
    }
}

/// Finite min/max of the grid
///
/// NaN and infinite samples are skipped; if none remain the range is
/// undefined and `EmptyValidRange` is returned.
pub fn detect_range(grid: &ElevationGrid) -> TerrainResult<ElevationRange> {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    let mut finite = 0usize;

    for &v in grid.as_slice() {
        if !v.is_finite() {
            continue;
        }
        min = min.min(v);
        max = max.max(v);
        finite += 1;
    }

    if finite == 0 {
        return Err(TerrainError::EmptyValidRange);
    }

    let skipped = grid.as_slice().len() - finite;
    if skipped > 0 {
        debug!("Skipped {} non-finite samples during range detection", skipped);
    }

    Ok(ElevationRange { min: min as f64, max: max as f64 })
}

/// Resolves a policy into a concrete range
pub fn resolve_range(grid: &ElevationGrid, policy: RangePolicy) -> TerrainResult<ElevationRange> {
    match policy {
        RangePolicy::Auto => detect_range(grid),
        RangePolicy::Manual { min, max } => {
            if min > max {
                warn!("Manual range min {} exceeds max {}; all samples will clamp", min, max);
            }
            Ok(ElevationRange { min, max })
        }
    }
}

/// Maps one elevation to a fixed-point sample
///
/// NaN maps to 0; infinities clamp to the ends of the scale.
pub fn quantize(value: f64, range: &ElevationRange) -> u16 {
    if value.is_nan() {
        return 0;
    }
    let t = ((value - range.min) / range.span()).clamp(0.0, 1.0);
    (t * SAMPLE_MAX as f64).round() as u16
}

/// Heightmap stored as 16-bit fixed-point samples
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedHeightmap {
    width: usize,
    height: usize,
    samples: Vec<u16>,
    min_elevation: f64,
    max_elevation: f64,
}

impl NormalizedHeightmap {
    /// Wraps existing samples; returns None if the length does not match
    pub fn new(width: usize, height: usize, samples: Vec<u16>, min_elevation: f64, max_elevation: f64) -> Option<Self> {
        (samples.len() == width * height).then_some(NormalizedHeightmap {
            width,
            height,
            samples,
            min_elevation,
            max_elevation,
        })
    }

    /// Rebuilds a heightmap from its little-endian byte form
    pub fn from_le_bytes(
        width: usize,
        height: usize,
        bytes: &[u8],
        min_elevation: f64,
        max_elevation: f64,
    ) -> TerrainResult<Self> {
        let expected = width * height * 2;
        if bytes.len() < expected {
            return Err(TerrainError::TruncatedHeightmap { expected, actual: bytes.len() });
        }

        let samples = bytes[..expected]
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        Ok(NormalizedHeightmap {
            width,
            height,
            samples,
            min_elevation,
            max_elevation,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn samples(&self) -> &[u16] {
        &self.samples
    }

    pub fn min_elevation(&self) -> f64 {
        self.min_elevation
    }

    pub fn max_elevation(&self) -> f64 {
        self.max_elevation
    }

    pub fn range(&self) -> ElevationRange {
        ElevationRange { min: self.min_elevation, max: self.max_elevation }
    }

    /// Little-endian, two bytes per sample, row-major
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    pub fn sample(&self, x: usize, y: usize) -> Option<u16> {
        if x < self.width && y < self.height {
            Some(self.samples[y * self.width + x])
        } else {
            None
        }
    }

    /// Sample scaled to `[0, 1]`
    pub fn height01(&self, x: usize, y: usize) -> Option<f32> {
        self.sample(x, y).map(|s| s as f32 / SAMPLE_MAX as f32)
    }

    /// Reconstructed elevation of a sample
    pub fn elevation_at(&self, x: usize, y: usize) -> Option<f64> {
        self.sample(x, y).map(|s| {
            self.min_elevation + (s as f64 / SAMPLE_MAX as f64) * (self.max_elevation - self.min_elevation)
        })
    }

    /// Elevation difference between adjacent fixed-point steps
    pub fn quantization_step(&self) -> f64 {
        (self.max_elevation - self.min_elevation) / SAMPLE_MAX as f64
    }
}

/// Normalizes a decoded grid, consuming it
pub fn normalize(grid: ElevationGrid, policy: RangePolicy) -> TerrainResult<NormalizedHeightmap> {
    let range = resolve_range(&grid, policy)?;
    info!("Elevation min={} max={}", range.min, range.max);

    let values = grid.as_slice();
    if !values.is_empty() {
        let mid = values.len() / 2;
        debug!("Elevation first={} mid={} last={}", values[0], values[mid], values[values.len() - 1]);
    }

    let samples = values.iter().map(|&v| quantize(v as f64, &range)).collect();

    Ok(NormalizedHeightmap {
        width: grid.width(),
        height: grid.height(),
        samples,
        min_elevation: range.min,
        max_elevation: range.max,
    })
}
