//! Logger that drops every message.

use super::{LogLevel, Logger};
use std::fmt::Arguments;

/// A logger that discards all messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLogger;

impl Logger for NoOpLogger {
    #[inline]
    fn log(&self, _level: LogLevel, _args: Arguments<'_>) {}
}
