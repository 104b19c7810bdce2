//! Configuration file commands.

use clap::Subcommand;
use std::path::PathBuf;
use tiledir::config::ConfigFile;

use crate::error::CliError;
use crate::runner::resolve_config_path;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Write a commented configuration file with default values
    Init {
        /// File to write (default: ./tiledir.ini)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show {
        /// File to read (default: ./tiledir.ini)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init { path, force } => run_init(path, force),
        ConfigCommands::Show { path } => run_show(path),
    }
}

fn run_init(path: Option<PathBuf>, force: bool) -> Result<(), CliError> {
    let path = resolve_config_path(path.as_deref());
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "'{}' already exists; use --force to overwrite it",
            path.display()
        )));
    }

    ConfigFile::default().save_to(&path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

fn run_show(path: Option<PathBuf>) -> Result<(), CliError> {
    let path = resolve_config_path(path.as_deref());
    let config = ConfigFile::load_from(&path)?;

    if path.exists() {
        println!("# Loaded from {}", path.display());
    } else {
        println!("# {} not found, showing defaults", path.display());
    }
    print!("{}", config.to_config_string());
    Ok(())
}
