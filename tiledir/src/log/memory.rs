//! Logger that keeps what it is told.

use super::{LogLevel, Logger};
use std::fmt::Arguments;
use std::sync::Mutex;

/// Collects formatted messages in memory.
///
/// Meant for tests that assert on what a run reported.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    records: Mutex<Vec<(LogLevel, String)>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every message logged so far.
    pub fn records(&self) -> Vec<(LogLevel, String)> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// Messages logged at exactly `level`.
    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message)
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.records()
            .iter()
            .any(|(_, message)| message.contains(needle))
    }
}

impl Logger for MemoryLogger {
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        if let Ok(mut records) = self.records.lock() {
            records.push((level, args.to_string()));
        }
    }
}
