//! CLI runner for common setup.
//!
//! Loads the configuration file and installs logging once, so command
//! handlers only deal with their own arguments.

use crate::error::CliError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tiledir::config::{ConfigFile, DEFAULT_CONFIG_FILE};
use tiledir::log::TracingLogger;
use tiledir::logging::{init_logging, LoggingGuard, LoggingOptions};
use tiledir::pyramid::RunConfig;
use tracing::info;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps the log file writer alive while the runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    config: ConfigFile,
    config_path: PathBuf,
}

impl CliRunner {
    /// Loads `config_path` (or `./tiledir.ini`) and initializes logging.
    ///
    /// A missing file means defaults. `debug_mode` lowers the default log
    /// filter to `debug` unless `RUST_LOG` says otherwise.
    pub fn new(config_path: Option<&Path>, debug_mode: bool) -> Result<Self, CliError> {
        let config_path = resolve_config_path(config_path);
        let config = ConfigFile::load_from(&config_path)?;

        let mut options = LoggingOptions::default().with_debug(debug_mode);
        if let Some(file) = &config.logging.file {
            options = options.with_file(file.clone());
        }
        let logging_guard =
            init_logging(options).map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
            config_path,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("tiledir v{}", tiledir::VERSION);
        info!(config = %self.config_path.display(), "tiledir CLI: {} command", command);
    }

    /// Builds a run configuration from the file settings, writing to `out`
    /// or the file's `[output] directory`.
    pub fn run_config(&self, out: Option<PathBuf>) -> Result<RunConfig, CliError> {
        let destination = out
            .or_else(|| self.config.output.directory.clone())
            .ok_or_else(|| {
                CliError::Config(
                    "no output directory; pass --out or set [output] directory".to_string(),
                )
            })?;
        let run = self
            .config
            .apply_to(RunConfig::new(destination))
            .with_logger(Arc::new(TracingLogger));
        Ok(run)
    }
}

/// The explicit path, or `tiledir.ini` in the working directory.
pub fn resolve_config_path(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}
