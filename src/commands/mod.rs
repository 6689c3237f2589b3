//! CLI command implementations
//!
//! This module contains implementations of various commands
//! supported by the CLI application using the Command pattern.

pub mod command_traits;
pub mod info_command;
pub mod heightmap_command;
pub mod terrain_command;

pub use command_traits::{Command, CommandFactory};
pub use info_command::InfoCommand;
pub use heightmap_command::HeightmapCommand;
pub use terrain_command::TerrainCommand;

use clap::ArgMatches;
use std::path::PathBuf;

use crate::config::PipelineConfig;
use crate::errors::{TerrainError, TerrainResult};

/// Factory for creating command instances based on CLI arguments
///
/// Picks the command from the subcommand name; the global flags are read
/// from the subcommand's own matches.
pub struct TerrainkitCommandFactory;

impl TerrainkitCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        TerrainkitCommandFactory
    }
}

impl Default for TerrainkitCommandFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandFactory for TerrainkitCommandFactory {
    fn create_command(&self, args: &ArgMatches) -> TerrainResult<Box<dyn Command>> {
        match args.subcommand() {
            Some(("info", sub)) => Ok(Box::new(InfoCommand::new(sub)?)),
            Some(("heightmap", sub)) => Ok(Box::new(HeightmapCommand::new(sub)?)),
            Some(("terrain", sub)) => Ok(Box::new(TerrainCommand::new(sub)?)),
            Some((other, _)) => Err(TerrainError::Config(format!("unknown command '{}'", other))),
            None => Err(TerrainError::Config("no command given, see --help".to_string())),
        }
    }
}

/// Required positional path argument
pub(crate) fn required_path(args: &ArgMatches, id: &str) -> TerrainResult<PathBuf> {
    args.get_one::<String>(id)
        .map(PathBuf::from)
        .ok_or_else(|| TerrainError::Config(format!("missing argument <{}>", id)))
}

/// Output directory, defaulting to the working directory
pub(crate) fn output_dir(args: &ArgMatches) -> PathBuf {
    args.get_one::<String>("output")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Configuration file plus the `--min`/`--max` overrides
pub(crate) fn pipeline_config(args: &ArgMatches) -> TerrainResult<PipelineConfig> {
    let path = args.get_one::<String>("config").map(PathBuf::from);
    let mut config = PipelineConfig::load_optional(path.as_deref())?;
    config.override_range(args.get_one::<f64>("min").copied(), args.get_one::<f64>("max").copied());
    Ok(config)
}

/// Builds the clap command tree
pub fn build_cli() -> clap::Command {
    use clap::{value_parser, Arg, ArgAction, Command as ClapCommand};

    let output = Arg::new("output")
        .short('o')
        .long("output")
        .help("Output directory")
        .value_name("DIR")
        .default_value(".");

    ClapCommand::new("terrainkit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Import GeoTIFF elevation rasters as heightmaps and terrain tiles")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Pipeline configuration file (TOML)")
                .value_name("FILE")
                .global(true),
        )
        .arg(
            Arg::new("min")
                .long("min")
                .help("Manual minimum elevation")
                .value_name("ELEVATION")
                .value_parser(value_parser!(f64))
                .allow_negative_numbers(true)
                .global(true),
        )
        .arg(
            Arg::new("max")
                .long("max")
                .help("Manual maximum elevation")
                .value_name("ELEVATION")
                .value_parser(value_parser!(f64))
                .allow_negative_numbers(true)
                .global(true),
        )
        .arg(
            Arg::new("no-progress")
                .long("no-progress")
                .help("Hide the batch progress bar")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            ClapCommand::new("info")
                .about("Show raster header and geo-reference of a GeoTIFF")
                .arg(Arg::new("input").help("Input GeoTIFF file").required(true).index(1)),
        )
        .subcommand(
            ClapCommand::new("heightmap")
                .about("Write a 16-bit PNG, raw .r16 and metadata for a GeoTIFF")
                .arg(Arg::new("input").help("Input GeoTIFF file").required(true).index(1))
                .arg(output.clone()),
        )
        .subcommand(
            ClapCommand::new("terrain")
                .about("Build terrain grids or meshes for one or more GeoTIFF tiles")
                .arg(
                    Arg::new("inputs")
                        .help("Input GeoTIFF files")
                        .required(true)
                        .num_args(1..)
                        .index(1),
                )
                .arg(output)
                .arg(
                    Arg::new("mesh")
                        .long("mesh")
                        .help("Write OBJ meshes instead of grid PNGs")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("tier")
                        .long("tier")
                        .help("Mesh resolution tier (full, half, quarter, eighth)")
                        .value_name("TIER"),
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heightmap::normalizer::RangePolicy;

    #[test]
    fn test_cli_definition() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_global_flags_reach_subcommands() {
        let matches = build_cli()
            .try_get_matches_from(["terrainkit", "heightmap", "dem.tif", "--min", "-10", "--max", "250", "-v"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "heightmap");
        assert!(sub.get_flag("verbose"));
        assert_eq!(required_path(sub, "input").unwrap(), PathBuf::from("dem.tif"));
        assert_eq!(output_dir(sub), PathBuf::from("."));

        let config = pipeline_config(sub).unwrap();
        assert_eq!(config.import.range, RangePolicy::Manual { min: -10.0, max: 250.0 });
    }

    #[test]
    fn test_factory_rejects_missing_subcommand() {
        let matches = clap::Command::new("empty").get_matches_from(["empty"]);
        assert!(TerrainkitCommandFactory::new().create_command(&matches).is_err());
    }
}
