//! The `tiledir.ini` configuration file.
//!
//! Settings structs live in [`settings`], defaults in [`defaults`], INI
//! parsing in `parser` and serialization in `writer`.
//!
//! ```
//! use tiledir::config::ConfigFile;
//!
//! let config = ConfigFile::default();
//! assert_eq!(config.output.extension, "pbf");
//! assert_eq!(config.output.max_zoom, 24);
//! ```

pub mod defaults;
mod file;
mod parser;
pub mod settings;
mod writer;

pub use defaults::*;
pub use file::{ConfigFileError, DEFAULT_CONFIG_FILE};
pub use settings::{
    ClusterSettings, ConfigFile, IndexSettings, LoggingSettings, OutputSettings,
    TraversalSettings,
};
