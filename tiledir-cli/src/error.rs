//! CLI error handling with user-friendly messages.
//!
//! Every command returns `Result<(), CliError>`; `main` turns the error into
//! a message on stderr and an exit code.

use std::fmt;
use std::path::PathBuf;
use std::process;
use tiledir::config::ConfigFileError;
use tiledir::pyramid::PyramidError;

/// Exit code for a run that wrote part of the pyramid before failing.
pub const EXIT_PARTIAL: i32 = 2;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Invalid arguments or settings
    Config(String),
    /// Configuration file could not be read or written
    ConfigFile(ConfigFileError),
    /// A layer file could not be read or parsed
    Input { path: PathBuf, message: String },
    /// Failed to start the async runtime
    Runtime(std::io::Error),
    /// The pyramid run failed
    Pyramid(PyramidError),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Pyramid(e) if e.is_partial() => EXIT_PARTIAL,
            _ => 1,
        }
    }

    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Pyramid(e) => {
                for failure in e.failures() {
                    eprintln!("  {}", failure);
                }
                if e.is_partial() {
                    eprintln!();
                    eprintln!("Some tiles were written; the output directory is incomplete.");
                }
            }
            CliError::Input { .. } => {
                eprintln!();
                eprintln!("Layers are given as NAME=FILE where FILE holds GeoJSON.");
            }
            _ => {}
        }

        process::exit(self.exit_code())
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "Configuration file error: {}", e),
            CliError::Input { path, message } => {
                write!(f, "Failed to read layer '{}': {}", path.display(), message)
            }
            CliError::Runtime(e) => write!(f, "Failed to start runtime: {}", e),
            CliError::Pyramid(e) => write!(f, "Pyramid generation failed: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            CliError::Pyramid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<PyramidError> for CliError {
    fn from(e: PyramidError) -> Self {
        match e {
            PyramidError::InvalidConfig(msg) => CliError::Config(msg),
            other => CliError::Pyramid(other),
        }
    }
}
