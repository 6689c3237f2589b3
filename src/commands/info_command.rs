//! Raster inspection command
//!
//! Prints the container format, the raster header and the geo-reference of
//! a GeoTIFF, plus every tag of the main image directory when verbose.

use clap::ArgMatches;
use log::debug;
use std::path::PathBuf;

use crate::commands::command_traits::Command;
use crate::commands::required_path;
use crate::errors::{TerrainError, TerrainResult};
use crate::geo::tag_reader::read_geo_reference;
use crate::raster::source::RasterSource;
use crate::tiff::TiffSource;

/// Command for showing what a raster contains
pub struct InfoCommand {
    /// Path to the input file
    input: PathBuf,
    /// Whether to list all tags
    verbose: bool,
}

impl InfoCommand {
    pub fn new(args: &ArgMatches) -> TerrainResult<Self> {
        Ok(InfoCommand {
            input: required_path(args, "input")?,
            verbose: args.get_flag("verbose"),
        })
    }

    /// Builds the report text
    pub fn report(&self) -> TerrainResult<String> {
        let source = TiffSource::open(&self.input).map_err(|e| TerrainError::open_failure(&self.input, e))?;
        let header = source.header();
        let geo = read_geo_reference(&source, header.width, header.height);

        let mut out = String::new();
        out.push_str(&format!("File: {}\n", self.input.display()));
        out.push_str(&format!(
            "Format: {} ({}), {} image director{}\n",
            if source.is_big_tiff() { "BigTIFF" } else { "TIFF" },
            source.byte_order().name(),
            source.ifd_count(),
            if source.ifd_count() == 1 { "y" } else { "ies" }
        ));
        out.push_str(&header.to_string());
        match header.validate() {
            Ok(()) => out.push_str(&format!("Decodable: yes, as {:?} samples\n", header.sample_kind())),
            Err(e) => out.push_str(&format!("Decodable: no, {}\n", e)),
        }
        out.push_str(&geo.to_string());

        if self.verbose {
            out.push_str("Tags:\n");
            for (tag, value) in source.tags() {
                out.push_str(&format!("  {:>5}: {}\n", tag, value));
            }
        }
        Ok(out)
    }
}

impl Command for InfoCommand {
    fn execute(&self) -> TerrainResult<()> {
        debug!("Inspecting {}", self.input.display());
        print!("{}", self.report()?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::build_cli;
    use crate::tiff::TiffBuilder;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_report() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dem.tif");
        let bytes = TiffBuilder::new(4, 2)
            .f32_samples(vec![1.0; 8])
            .pixel_scale(10.0, 10.0)
            .tiepoint(0.0, 20.0)
            .epsg(3857)
            .build()
            .unwrap();
        fs::write(&path, bytes).unwrap();

        let matches = build_cli()
            .try_get_matches_from(["terrainkit", "info", path.to_str().unwrap(), "-v"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        let report = InfoCommand::new(sub).unwrap().report().unwrap();

        assert!(report.contains("Size: 4 x 2"));
        assert!(report.contains("Decodable: yes"));
        assert!(report.contains("EPSG: 3857"));
        assert!(report.contains("Tags:"));
        assert!(report.contains("  33550: 10, 10, 0"));
    }

    #[test]
    fn test_missing_file_is_open_failure() {
        let command = InfoCommand { input: PathBuf::from("/nonexistent/dem.tif"), verbose: false };
        assert!(matches!(command.report(), Err(TerrainError::SourceOpenFailure { .. })));
    }
}
