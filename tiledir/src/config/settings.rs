//! Settings structs, one per `[section]` of the INI file.

use std::path::PathBuf;

/// Complete configuration loaded from `tiledir.ini`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub output: OutputSettings,
    pub index: IndexSettings,
    pub cluster: ClusterSettings,
    pub traversal: TraversalSettings,
    pub logging: LoggingSettings,
}

/// `[output]`: where and how tiles are written.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    /// Destination root; the CLI's `--out` takes precedence
    pub directory: Option<PathBuf>,
    /// Tile file extension without the dot
    pub extension: String,
    /// Deepest zoom visited, at most 24
    pub max_zoom: u8,
}

/// `[index]`: slicing of raw GeoJSON layers.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSettings {
    pub extent: u32,
    pub buffer: u32,
    pub generate_id: bool,
}

/// `[cluster]`: point clustering for `--cluster` layers.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSettings {
    pub radius: f64,
    pub extent: u32,
    pub max_zoom: u8,
    pub min_points: usize,
}

/// `[traversal]`
#[derive(Debug, Clone, PartialEq)]
pub struct TraversalSettings {
    /// Upper bound on simultaneous tile writes
    pub max_concurrent_writes: usize,
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Optional log file, truncated at start
    pub file: Option<PathBuf>,
}
