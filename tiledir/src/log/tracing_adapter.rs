//! Bridge from [`Logger`] to the `tracing` macros.

use super::{LogLevel, Logger};
use std::fmt::Arguments;

/// Logger that forwards to whatever `tracing` subscriber is installed.
///
/// Events are emitted under the `tiledir` target so they can be filtered
/// with `RUST_LOG=tiledir=debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        match level {
            LogLevel::Trace => tracing::trace!(target: "tiledir", "{}", args),
            LogLevel::Debug => tracing::debug!(target: "tiledir", "{}", args),
            LogLevel::Info => tracing::info!(target: "tiledir", "{}", args),
            LogLevel::Warn => tracing::warn!(target: "tiledir", "{}", args),
            LogLevel::Error => tracing::error!(target: "tiledir", "{}", args),
        }
    }

    fn enabled(&self, level: LogLevel) -> bool {
        match level {
            LogLevel::Trace => tracing::enabled!(target: "tiledir", tracing::Level::TRACE),
            LogLevel::Debug => tracing::enabled!(target: "tiledir", tracing::Level::DEBUG),
            LogLevel::Info => tracing::enabled!(target: "tiledir", tracing::Level::INFO),
            LogLevel::Warn => tracing::enabled!(target: "tiledir", tracing::Level::WARN),
            LogLevel::Error => tracing::enabled!(target: "tiledir", tracing::Level::ERROR),
        }
    }
}
