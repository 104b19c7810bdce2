//! Process-wide `tracing` setup for the `tiledir` binary.
//!
//! Library code logs through [`crate::log::Logger`]; this module installs the
//! subscriber those events end up in:
//! - compact console output on stderr, so stdout stays free for summaries
//! - an optional plain-text log file, truncated at start
//! - filtering via `RUST_LOG`, falling back to `info` (or `debug` on request)

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Default log file name used when a log directory is configured.
pub const DEFAULT_LOG_FILE: &str = "tiledir.log";

/// What to set up.
#[derive(Debug, Clone, Default)]
pub struct LoggingOptions {
    /// Lower the default filter from `info` to `debug`.
    pub debug: bool,
    /// Also write to this file.
    pub file: Option<PathBuf>,
}

impl LoggingOptions {
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    fn default_directive(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}

/// Keeps the file writer alive. Dropping it flushes the log file.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns an error if the log file's directory cannot be created or the file
/// cannot be truncated.
pub fn init_logging(options: LoggingOptions) -> Result<LoggingGuard, io::Error> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(options.default_directive()));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .compact();

    let (file_layer, file_guard) = match options.file.as_deref() {
        Some(path) => {
            let (dir, name) = prepare_log_file(path)?;
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Creates the parent directory and truncates the file.
///
/// Returns the directory and file name the appender should use.
fn prepare_log_file(path: &Path) -> Result<(PathBuf, PathBuf), io::Error> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let name = path
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
    fs::create_dir_all(&dir)?;
    fs::write(dir.join(&name), "")?;
    Ok((dir, name))
}
