//! Command pattern interfaces
//!
//! Each CLI subcommand is a `Command`; a `CommandFactory` turns parsed
//! arguments into the matching command.

use crate::errors::TerrainResult;

/// Represents an executable command in the application
///
/// Command objects encapsulate the logic for a specific CLI operation,
/// allowing for separation of concerns and better testability.
pub trait Command {
    /// Execute the command
    fn execute(&self) -> TerrainResult<()>;
}

/// Factory for creating commands from CLI arguments
pub trait CommandFactory {
    /// Create a new Command instance based on CLI arguments
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    fn create_command(&self, args: &clap::ArgMatches) -> TerrainResult<Box<dyn Command>>;
}
