//! The [`Logger`] trait and its macros.

use std::fmt::Arguments;

/// Severity of a message, least severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Destination for diagnostics raised during a run.
///
/// Shared between traversal branches on different worker threads.
pub trait Logger: Send + Sync {
    /// Records one message.
    fn log(&self, level: LogLevel, args: Arguments<'_>);

    /// Whether messages at `level` are kept. The macros skip formatting when
    /// this is false.
    fn enabled(&self, _level: LogLevel) -> bool {
        true
    }

    fn trace(&self, args: Arguments<'_>) {
        self.log(LogLevel::Trace, args);
    }

    fn debug(&self, args: Arguments<'_>) {
        self.log(LogLevel::Debug, args);
    }

    fn info(&self, args: Arguments<'_>) {
        self.log(LogLevel::Info, args);
    }

    fn warn(&self, args: Arguments<'_>) {
        self.log(LogLevel::Warn, args);
    }

    fn error(&self, args: Arguments<'_>) {
        self.log(LogLevel::Error, args);
    }
}

/// Logs at an explicit [`LogLevel`] through any `Logger` handle.
///
/// ```
/// use tiledir::log::{LogLevel, NoOpLogger};
/// let logger = &NoOpLogger;
/// tiledir::log_at!(logger, LogLevel::Info, "{} tiles", 3);
/// ```
#[macro_export]
macro_rules! log_at {
    ($logger:expr, $level:expr, $($arg:tt)*) => {{
        let level = $level;
        if $crate::log::Logger::enabled(&*$logger, level) {
            $crate::log::Logger::log(&*$logger, level, format_args!($($arg)*));
        }
    }};
}

#[macro_export]
macro_rules! log_trace {
    ($logger:expr, $($arg:tt)*) => { $crate::log_at!($logger, $crate::log::LogLevel::Trace, $($arg)*) };
}

#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => { $crate::log_at!($logger, $crate::log::LogLevel::Debug, $($arg)*) };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => { $crate::log_at!($logger, $crate::log::LogLevel::Info, $($arg)*) };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)*) => { $crate::log_at!($logger, $crate::log::LogLevel::Warn, $($arg)*) };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)*) => { $crate::log_at!($logger, $crate::log::LogLevel::Error, $($arg)*) };
}
