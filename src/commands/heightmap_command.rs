//! Heightmap export command

use clap::ArgMatches;
use std::path::PathBuf;

use crate::commands::command_traits::Command;
use crate::commands::{output_dir, pipeline_config, required_path};
use crate::config::PipelineConfig;
use crate::errors::TerrainResult;
use crate::export::{write_heightmap_files, HeightmapFiles};
use crate::pipeline::import_heightmap;

/// Imports one GeoTIFF and writes its PNG, `.r16` and metadata files
pub struct HeightmapCommand {
    input: PathBuf,
    output: PathBuf,
    config: PipelineConfig,
}

impl HeightmapCommand {
    pub fn new(args: &ArgMatches) -> TerrainResult<Self> {
        Ok(HeightmapCommand {
            input: required_path(args, "input")?,
            output: output_dir(args),
            config: pipeline_config(args)?,
        })
    }

    pub fn run(&self) -> TerrainResult<HeightmapFiles> {
        let imported = import_heightmap(&self.input, &self.config.import)?;
        write_heightmap_files(&imported, &self.output)
    }
}

impl Command for HeightmapCommand {
    fn execute(&self) -> TerrainResult<()> {
        let files = self.run()?;
        println!("{}", files.png.display());
        println!("{}", files.raw.display());
        println!("{}", files.meta.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::build_cli;
    use crate::heightmap::normalizer::NormalizedHeightmap;
    use crate::tiff::TiffBuilder;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_manual_range_from_flags() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("hill.tif");
        fs::write(&input, TiffBuilder::new(2, 1).i16_samples(vec![-50, 150]).build().unwrap()).unwrap();
        let out = dir.path().join("out");

        let matches = build_cli()
            .try_get_matches_from([
                "terrainkit", "heightmap", input.to_str().unwrap(),
                "-o", out.to_str().unwrap(), "--min", "0", "--max", "100",
            ])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        let files = HeightmapCommand::new(sub).unwrap().run().unwrap();

        assert_eq!(files.raw, out.join("hill.r16"));
        let raw = fs::read(&files.raw).unwrap();
        let map = NormalizedHeightmap::from_le_bytes(2, 1, &raw, 0.0, 100.0).unwrap();
        assert_eq!(map.samples(), &[0, u16::MAX]);
        assert!(files.png.exists());
        assert!(files.meta.exists());
    }
}
