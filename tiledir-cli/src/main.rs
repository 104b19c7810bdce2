//! tiledir CLI - Command-line interface
//!
//! Writes static vector tile pyramids from GeoJSON files and manages the
//! `tiledir.ini` configuration file.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};
use commands::config::ConfigCommands;
use commands::generate::GenerateArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "tiledir")]
#[command(version)]
#[command(about = "Write vector tile pyramids to a z/x/y directory", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Slice GeoJSON layers into a tile pyramid
    Generate(GenerateArgs),

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result: Result<(), CliError> = match cli.command {
        Commands::Generate(args) => commands::generate::run(args),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
