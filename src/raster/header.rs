//! Raster header
//!
//! The subset of the image directory the decoder needs: dimensions, sample
//! layout and chunk organization. Built once per source from its tags and
//! never modified afterwards.

use std::fmt;
use log::{info, warn};

use crate::errors::{TerrainError, TerrainResult};
use crate::tiff::constants::{compression, sample_format, tags};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::tag_value::TagValue;

/// Interpretation of sample bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    Unsigned,
    Signed,
    Float,
    /// Any other SampleFormat code (void, complex types)
    Unknown(u16),
}

impl SampleFormat {
    pub fn from_code(code: u16) -> Self {
        match code {
            sample_format::UNSIGNED => SampleFormat::Unsigned,
            sample_format::SIGNED => SampleFormat::Signed,
            sample_format::IEEEFP => SampleFormat::Float,
            other => SampleFormat::Unknown(other),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SampleFormat::Unsigned => "unsigned integer",
            SampleFormat::Signed => "signed integer",
            SampleFormat::Float => "IEEE float",
            SampleFormat::Unknown(_) => "unknown",
        }
    }
}

/// Tile geometry of a tiled raster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileLayout {
    pub tile_width: u32,
    pub tile_height: u32,
}

/// Concrete sample decoding chosen from bit depth and sample format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    U16,
    I16,
    F32,
}

impl SampleKind {
    pub fn bytes(&self) -> usize {
        match self {
            SampleKind::U16 | SampleKind::I16 => 2,
            SampleKind::F32 => 4,
        }
    }
}

/// Largest raster, in samples, the decoder will allocate a grid for
pub const MAX_RASTER_SAMPLES: u64 = 1 << 30;

/// Header of a single-band elevation raster
#[derive(Debug, Clone, PartialEq)]
pub struct RasterHeader {
    pub width: u32,
    pub height: u32,
    pub bits_per_sample: u16,
    pub sample_format: SampleFormat,
    pub samples_per_pixel: u16,
    pub compression: u16,
    pub rows_per_strip: u32,
    pub tiling: Option<TileLayout>,
}

fn first_or(value: &TagValue, default: u64) -> u64 {
    value.first_u64().unwrap_or(default)
}

impl RasterHeader {
    /// Builds a header from a tag lookup
    ///
    /// Width and height are the only mandatory tags. The tiled layout is
    /// selected when both tile dimensions are present.
    pub fn from_tags<F>(lookup: F) -> TiffResult<Self>
    where
        F: Fn(u16) -> TagValue,
    {
        let width = lookup(tags::IMAGE_WIDTH).first_u64().unwrap_or(0) as u32;
        let height = lookup(tags::IMAGE_LENGTH).first_u64().unwrap_or(0) as u32;
        if width == 0 || height == 0 {
            return Err(TiffError::MissingDimensions);
        }

        let tile_width = lookup(tags::TILE_WIDTH).first_u64();
        let tile_height = lookup(tags::TILE_LENGTH).first_u64();
        let tiling = match (tile_width, tile_height) {
            (Some(tw), Some(th)) => Some(TileLayout {
                tile_width: tw as u32,
                tile_height: th as u32,
            }),
            _ => None,
        };

        let rows_per_strip = match first_or(&lookup(tags::ROWS_PER_STRIP), height as u64) {
            0 => height,
            rows => rows.min(height as u64) as u32,
        };

        Ok(RasterHeader {
            width,
            height,
            bits_per_sample: first_or(&lookup(tags::BITS_PER_SAMPLE), 1) as u16,
            sample_format: SampleFormat::from_code(
                first_or(&lookup(tags::SAMPLE_FORMAT), sample_format::UNSIGNED as u64) as u16,
            ),
            samples_per_pixel: first_or(&lookup(tags::SAMPLES_PER_PIXEL), 1) as u16,
            compression: first_or(&lookup(tags::COMPRESSION), compression::NONE as u64) as u16,
            rows_per_strip,
            tiling,
        })
    }

    pub fn is_tiled(&self) -> bool {
        self.tiling.is_some()
    }

    /// Checks that the decoder can handle this layout
    pub fn validate(&self) -> TerrainResult<()> {
        if self.samples_per_pixel != 1 {
            return Err(TerrainError::UnsupportedRasterFormat(format!(
                "{} samples per pixel, only single-band rasters are supported",
                self.samples_per_pixel
            )));
        }
        if self.bits_per_sample != 16 && self.bits_per_sample != 32 {
            return Err(TerrainError::UnsupportedRasterFormat(format!(
                "{} bits per sample, expected 16 or 32",
                self.bits_per_sample
            )));
        }
        if self.compression != compression::NONE {
            return Err(TerrainError::UnsupportedRasterFormat(format!(
                "compression scheme {} is not supported",
                self.compression
            )));
        }
        if self.width as u64 * self.height as u64 > MAX_RASTER_SAMPLES {
            return Err(TerrainError::UnsupportedRasterFormat(format!(
                "raster of {}x{} samples exceeds the {} sample limit",
                self.width, self.height, MAX_RASTER_SAMPLES
            )));
        }
        if let Some(layout) = self.tiling {
            let tile_samples = layout.tile_width as u64 * layout.tile_height as u64;
            if tile_samples == 0 || tile_samples > MAX_RASTER_SAMPLES {
                return Err(TerrainError::UnsupportedRasterFormat(format!(
                    "invalid tile size {}x{}",
                    layout.tile_width, layout.tile_height
                )));
            }
        }
        Ok(())
    }

    /// Sample decoding for this header; call after `validate`
    ///
    /// 32-bit samples are always read as IEEE floats and 16-bit samples as
    /// integers, signed only when the sample format says so.
    pub fn sample_kind(&self) -> SampleKind {
        match self.bits_per_sample {
            32 => {
                if self.sample_format != SampleFormat::Float {
                    warn!("32-bit samples tagged as {}, reading them as IEEE floats",
                          self.sample_format.name());
                }
                SampleKind::F32
            }
            _ => match self.sample_format {
                SampleFormat::Signed => SampleKind::I16,
                SampleFormat::Unsigned => SampleKind::U16,
                other => {
                    warn!("16-bit samples tagged as {}, reading them as unsigned integers",
                          other.name());
                    SampleKind::U16
                }
            },
        }
    }

    pub fn bytes_per_sample(&self) -> usize {
        (self.bits_per_sample as usize).div_ceil(8)
    }

    /// Bytes in one full raster row
    pub fn row_bytes(&self) -> usize {
        (self.width as usize).saturating_mul(self.bytes_per_sample())
    }

    /// Tiles per row of tiles, or 0 for striped rasters
    pub fn tiles_across(&self) -> u32 {
        self.tiling
            .map(|t| self.width.div_ceil(t.tile_width.max(1)))
            .unwrap_or(0)
    }

    /// Tiles per column of tiles, or 0 for striped rasters
    pub fn tiles_down(&self) -> u32 {
        self.tiling
            .map(|t| self.height.div_ceil(t.tile_height.max(1)))
            .unwrap_or(0)
    }

    /// Decompressed size of one full tile in bytes; meaningful after `validate`
    pub fn tile_bytes(&self) -> usize {
        self.tiling
            .map(|t| {
                (t.tile_width as usize)
                    .saturating_mul(t.tile_height as usize)
                    .saturating_mul(self.bytes_per_sample())
            })
            .unwrap_or(0)
    }

    /// Number of strips for a striped raster
    pub fn strip_count(&self) -> u32 {
        self.height.div_ceil(self.rows_per_strip.max(1))
    }

    pub fn log_summary(&self) {
        info!("Raster {}x{}, {} bits, {} sample(s), {}, {}",
              self.width, self.height, self.bits_per_sample, self.samples_per_pixel,
              self.sample_format.name(),
              match self.tiling {
                  Some(t) => format!("tiled {}x{}", t.tile_width, t.tile_height),
                  None => format!("striped, {} rows per strip", self.rows_per_strip),
              });
    }
}

impl fmt::Display for RasterHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Size: {} x {}", self.width, self.height)?;
        writeln!(f, "Bits per sample: {}", self.bits_per_sample)?;
        writeln!(f, "Sample format: {}", self.sample_format.name())?;
        writeln!(f, "Samples per pixel: {}", self.samples_per_pixel)?;
        writeln!(f, "Compression: {}", self.compression)?;
        match self.tiling {
            Some(t) => writeln!(f, "Layout: tiled {} x {}", t.tile_width, t.tile_height),
            None => writeln!(f, "Layout: striped, {} rows per strip", self.rows_per_strip),
        }
    }
}
