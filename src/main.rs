use log::error;
use std::process;

use terrainkit::commands::{build_cli, CommandFactory, TerrainkitCommandFactory};

fn main() {
    let matches = build_cli().get_matches();

    // RUST_LOG takes precedence over --verbose
    let verbose = matches
        .subcommand()
        .map(|(_, sub)| sub.get_flag("verbose"))
        .unwrap_or(false);
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let factory = TerrainkitCommandFactory::new();

    let command_result = factory.create_command(&matches);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
