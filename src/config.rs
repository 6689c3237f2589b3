//! Pipeline configuration
//!
//! Read from an optional TOML file as a `toml::Value` tree. Every key is
//! optional; missing keys keep their defaults and keys of the wrong type are
//! reported as `Config` errors. CLI flags are applied on top afterwards.
//!
//! ```toml
//! [import]
//! auto_range = false
//! manual_min = 0.0
//! manual_max = 500.0
//!
//! [terrain]
//! use_metadata_size = true
//! use_metadata_height = true
//! width = 6000.0
//! length = 6000.0
//! height = 100.0
//!
//! [mesh]
//! tier = "half"
//!
//! [grid]
//! resolutions = [33, 65, 129, 257, 513, 1025, 2049, 4097]
//! ```

use log::{debug, info};
use std::fs;
use std::path::Path;

use crate::errors::{TerrainError, TerrainResult};
use crate::heightmap::normalizer::{RangePolicy, DEFAULT_MANUAL_MAX, DEFAULT_MANUAL_MIN};
use crate::pipeline::{ImportSettings, TerrainRequest};
use crate::terrain::resolution::{MeshTier, ResolutionTable};
use crate::terrain::sizing::TerrainSizing;

/// All settings of an import/terrain run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PipelineConfig {
    pub import: ImportSettings,
    pub sizing: TerrainSizing,
    pub mesh_tier: MeshTier,
    pub resolutions: ResolutionTable,
}

fn section<'a>(root: &'a toml::Value, name: &str) -> TerrainResult<Option<&'a toml::value::Table>> {
    match root.get(name) {
        None => Ok(None),
        Some(value) => value
            .as_table()
            .map(Some)
            .ok_or_else(|| TerrainError::Config(format!("[{}] must be a table", name))),
    }
}

fn read_bool(table: &toml::value::Table, section: &str, key: &str) -> TerrainResult<Option<bool>> {
    match table.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_bool()
            .map(Some)
            .ok_or_else(|| TerrainError::Config(format!("{}.{} must be a boolean", section, key))),
    }
}

/// Reads a number, accepting both TOML floats and integers
fn read_f64(table: &toml::value::Table, section: &str, key: &str) -> TerrainResult<Option<f64>> {
    match table.get(key) {
        None => Ok(None),
        Some(toml::Value::Float(v)) => Ok(Some(*v)),
        Some(toml::Value::Integer(v)) => Ok(Some(*v as f64)),
        Some(_) => Err(TerrainError::Config(format!("{}.{} must be a number", section, key))),
    }
}

fn read_str<'a>(table: &'a toml::value::Table, section: &str, key: &str) -> TerrainResult<Option<&'a str>> {
    match table.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(Some)
            .ok_or_else(|| TerrainError::Config(format!("{}.{} must be a string", section, key))),
    }
}

fn read_sizes(table: &toml::value::Table, section: &str, key: &str) -> TerrainResult<Option<Vec<u32>>> {
    let Some(value) = table.get(key) else {
        return Ok(None);
    };
    let array = value
        .as_array()
        .ok_or_else(|| TerrainError::Config(format!("{}.{} must be an array", section, key)))?;

    array
        .iter()
        .map(|item| {
            item.as_integer()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| {
                    TerrainError::Config(format!("{}.{} must contain positive integers, got {}", section, key, item))
                })
        })
        .collect::<TerrainResult<Vec<u32>>>()
        .map(Some)
}

impl PipelineConfig {
    /// Parses a configuration document
    pub fn from_toml_str(content: &str) -> TerrainResult<Self> {
        let root: toml::Value = content
            .parse()
            .map_err(|e: toml::de::Error| TerrainError::Config(format!("invalid TOML: {}", e)))?;

        let mut config = PipelineConfig::default();

        if let Some(import) = section(&root, "import")? {
            let auto = read_bool(import, "import", "auto_range")?.unwrap_or(true);
            let min = read_f64(import, "import", "manual_min")?;
            let max = read_f64(import, "import", "manual_max")?;
            if !auto {
                config.import.range = RangePolicy::Manual {
                    min: min.unwrap_or(DEFAULT_MANUAL_MIN),
                    max: max.unwrap_or(DEFAULT_MANUAL_MAX),
                };
            } else if min.is_some() || max.is_some() {
                debug!("Manual range values ignored while auto_range is on");
            }
        }

        if let Some(terrain) = section(&root, "terrain")? {
            let sizing = &mut config.sizing;
            if let Some(v) = read_bool(terrain, "terrain", "use_metadata_size")? {
                sizing.use_metadata_size = v;
            }
            if let Some(v) = read_bool(terrain, "terrain", "use_metadata_height")? {
                sizing.use_metadata_height = v;
            }
            if let Some(v) = read_f64(terrain, "terrain", "width")? {
                sizing.width = v;
            }
            if let Some(v) = read_f64(terrain, "terrain", "length")? {
                sizing.length = v;
            }
            if let Some(v) = read_f64(terrain, "terrain", "height")? {
                sizing.height = v;
            }
        }

        if let Some(mesh) = section(&root, "mesh")? {
            if let Some(tier) = read_str(mesh, "mesh", "tier")? {
                config.mesh_tier = tier.parse()?;
            }
        }

        if let Some(grid) = section(&root, "grid")? {
            if let Some(sizes) = read_sizes(grid, "grid", "resolutions")? {
                config.resolutions = ResolutionTable::new(sizes)?;
            }
        }

        Ok(config)
    }

    /// Loads a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> TerrainResult<Self> {
        let path = path.as_ref();
        info!("Loading configuration from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Loads `path` when given, otherwise returns the defaults
    pub fn load_optional(path: Option<&Path>) -> TerrainResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Switches to a manual range when either bound is given on the command line
    ///
    /// A missing bound is taken from the configured manual range, or from
    /// the defaults if the configuration used automatic detection.
    pub fn override_range(&mut self, min: Option<f64>, max: Option<f64>) {
        if min.is_none() && max.is_none() {
            return;
        }
        let (base_min, base_max) = match self.import.range {
            RangePolicy::Manual { min, max } => (min, max),
            RangePolicy::Auto => (DEFAULT_MANUAL_MIN, DEFAULT_MANUAL_MAX),
        };
        self.import.range = RangePolicy::Manual {
            min: min.unwrap_or(base_min),
            max: max.unwrap_or(base_max),
        };
    }

    /// Terrain request for either a snapped grid or a mesh
    pub fn request(&self, mesh: bool) -> TerrainRequest {
        if mesh {
            TerrainRequest::Mesh(self.mesh_tier)
        } else {
            TerrainRequest::Grid(self.resolutions.clone())
        }
    }
}
