//! Crate-level error types
//!
//! Container parsing failures are wrapped into `SourceOpenFailure` together
//! with the path that failed, so a batch report can name the bad input.

use std::path::PathBuf;
use thiserror::Error;

use crate::tiff::errors::TiffError;

/// Errors raised by the heightmap import and terrain pipeline
#[derive(Debug, Error)]
pub enum TerrainError {
    /// The input cannot be opened or parsed as a TIFF container
    #[error("Failed to open raster source {}: {source}", path.display())]
    SourceOpenFailure {
        path: PathBuf,
        #[source]
        source: TiffError,
    },

    /// Sample layout the decoder does not handle
    #[error("Unsupported raster format: {0}")]
    UnsupportedRasterFormat(String),

    /// Automatic range detection found no finite sample
    #[error("No finite elevation samples to derive a range from")]
    EmptyValidRange,

    /// A raw heightmap buffer is smaller than its declared size
    #[error("Heightmap data too short: expected {expected} bytes, got {actual}")]
    TruncatedHeightmap { expected: usize, actual: usize },

    /// Mesh lattice with more vertices than 32-bit indices can address
    #[error("Mesh of {resolution_x}x{resolution_z} vertices exceeds 32-bit vertex indices")]
    MeshTooLarge { resolution_x: usize, resolution_z: usize },

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl TerrainError {
    /// Wraps a container error with the path of the failing source
    pub fn open_failure(path: impl Into<PathBuf>, source: TiffError) -> Self {
        TerrainError::SourceOpenFailure { path: path.into(), source }
    }
}

/// Result type for pipeline operations
pub type TerrainResult<T> = Result<T, TerrainError>;
