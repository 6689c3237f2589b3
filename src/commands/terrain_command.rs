//! Terrain build command
//!
//! Runs the batch pipeline over one or more tiles, writes a grid PNG or an
//! OBJ mesh per tile plus a `layout.toml`, and prints the neighbour
//! assignments.

use clap::ArgMatches;
use log::{error, info};
use std::fs;
use std::path::PathBuf;

use crate::commands::command_traits::Command;
use crate::commands::{output_dir, pipeline_config};
use crate::config::PipelineConfig;
use crate::errors::{TerrainError, TerrainResult};
use crate::export::{write_grid_png, write_layout, write_obj};
use crate::pipeline::{build_terrain_batch, BatchOptions, BatchReport, TerrainSurface};
use crate::terrain::resolution::MeshTier;

/// Command for building terrain tiles
pub struct TerrainCommand {
    inputs: Vec<PathBuf>,
    output: PathBuf,
    config: PipelineConfig,
    mesh: bool,
    show_progress: bool,
}

impl TerrainCommand {
    pub fn new(args: &ArgMatches) -> TerrainResult<Self> {
        let inputs: Vec<PathBuf> = args
            .get_many::<String>("inputs")
            .map(|values| values.map(PathBuf::from).collect())
            .unwrap_or_default();
        if inputs.is_empty() {
            return Err(TerrainError::Config("no input files given".to_string()));
        }

        let mut config = pipeline_config(args)?;
        if let Some(tier) = args.get_one::<String>("tier") {
            config.mesh_tier = tier.parse::<MeshTier>()?;
        }

        Ok(TerrainCommand {
            inputs,
            output: output_dir(args),
            config,
            mesh: args.get_flag("mesh"),
            show_progress: !args.get_flag("no-progress"),
        })
    }

    /// Builds and writes every tile, returning the batch report
    pub fn run(&self) -> TerrainResult<BatchReport> {
        let options = BatchOptions {
            import: self.config.import,
            request: self.config.request(self.mesh),
            sizing: self.config.sizing,
            show_progress: self.show_progress,
        };
        let report = build_terrain_batch(&self.inputs, &options);

        fs::create_dir_all(&self.output)?;
        for tile in &report.tiles {
            match &tile.surface {
                TerrainSurface::Grid(grid) => {
                    write_grid_png(grid, self.output.join(format!("{}.grid.png", tile.name)))?
                }
                TerrainSurface::Mesh(mesh) => {
                    write_obj(mesh, &tile.name, self.output.join(format!("{}.obj", tile.name)))?
                }
            }
        }
        write_layout(&report, self.output.join("layout.toml"))?;
        info!("Wrote {} tile(s) to {}", report.tiles.len(), self.output.display());
        Ok(report)
    }
}

fn side_name(report: &BatchReport, handle: Option<usize>) -> &str {
    handle
        .and_then(|i| report.tiles.get(i))
        .map(|tile| tile.name.as_str())
        .unwrap_or("-")
}

impl Command for TerrainCommand {
    fn execute(&self) -> TerrainResult<()> {
        let mut report = self.run()?;

        for (tile, neighbors) in report.tiles.iter().zip(&report.neighbors) {
            println!(
                "{}: offset ({}, {}) left={} right={} top={} bottom={}",
                tile.name,
                tile.offset.0,
                tile.offset.1,
                side_name(&report, neighbors.left),
                side_name(&report, neighbors.right),
                side_name(&report, neighbors.top),
                side_name(&report, neighbors.bottom),
            );
        }
        for failure in &report.failures {
            error!("{}: {}", failure.path.display(), failure.error);
        }

        if report.tiles.is_empty() && !report.failures.is_empty() {
            return Err(report.failures.remove(0).error);
        }
        Ok(())
    }
}
