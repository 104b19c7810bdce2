//! Run configuration.

use super::PyramidError;
use crate::coord::MAX_PYRAMID_ZOOM;
use crate::encode::{MvtEncoder, TileEncoder};
use crate::hooks::{NoOpHooks, TraversalHooks};
use crate::index::IndexOptions;
use crate::log::{Logger, TracingLogger};
use crate::sink::{DirectorySink, TileSink, WritePool, DEFAULT_MAX_CONCURRENT_WRITES};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default file extension for written tiles.
pub const DEFAULT_EXTENSION: &str = "pbf";

/// Settings for one pyramid run.
///
/// ```
/// use tiledir::pyramid::RunConfig;
///
/// let config = RunConfig::new("tiles").with_max_zoom(30).with_extension("mvt");
/// assert_eq!(config.max_zoom(), 24);
/// assert_eq!(config.extension(), "mvt");
/// ```
#[derive(Clone)]
pub struct RunConfig {
    destination: PathBuf,
    extension: String,
    max_zoom: u8,
    hooks: Arc<dyn TraversalHooks>,
    sink: Option<Arc<dyn TileSink>>,
    encoder: Option<Arc<dyn TileEncoder>>,
    index_options: IndexOptions,
    max_concurrent_writes: usize,
    logger: Arc<dyn Logger>,
}

impl RunConfig {
    /// Configuration writing below `destination` with every default.
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            extension: DEFAULT_EXTENSION.to_string(),
            max_zoom: MAX_PYRAMID_ZOOM,
            hooks: Arc::new(NoOpHooks),
            sink: None,
            encoder: None,
            index_options: IndexOptions::default(),
            max_concurrent_writes: DEFAULT_MAX_CONCURRENT_WRITES,
            logger: Arc::new(TracingLogger),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Deepest zoom to visit, clamped to 24.
    pub fn with_max_zoom(mut self, max_zoom: u8) -> Self {
        self.max_zoom = max_zoom.min(MAX_PYRAMID_ZOOM);
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn TraversalHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Replaces the directory sink. The destination and extension are then
    /// ignored by the walk.
    pub fn with_sink(mut self, sink: Arc<dyn TileSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_encoder(mut self, encoder: Arc<dyn TileEncoder>) -> Self {
        self.encoder = Some(encoder);
        self
    }

    pub fn with_index_options(mut self, options: IndexOptions) -> Self {
        self.index_options = options;
        self
    }

    pub fn with_max_concurrent_writes(mut self, limit: usize) -> Self {
        self.max_concurrent_writes = limit.max(1);
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn max_zoom(&self) -> u8 {
        self.max_zoom
    }

    pub fn hooks(&self) -> &Arc<dyn TraversalHooks> {
        &self.hooks
    }

    pub fn index_options(&self) -> &IndexOptions {
        &self.index_options
    }

    pub fn max_concurrent_writes(&self) -> usize {
        self.max_concurrent_writes
    }

    pub fn logger(&self) -> &Arc<dyn Logger> {
        &self.logger
    }

    /// Checks the settings that cannot be fixed up silently.
    pub fn validate(&self) -> Result<(), PyramidError> {
        if self.sink.is_some() {
            return Ok(());
        }
        let ext = &self.extension;
        if ext.is_empty() {
            return Err(PyramidError::InvalidConfig("extension must not be empty".into()));
        }
        if ext.starts_with('.') {
            return Err(PyramidError::InvalidConfig(format!(
                "extension '{}' must not start with a dot",
                ext
            )));
        }
        if ext.contains(['/', '\\']) {
            return Err(PyramidError::InvalidConfig(format!(
                "extension '{}' must not contain path separators",
                ext
            )));
        }
        if self.destination.as_os_str().is_empty() {
            return Err(PyramidError::InvalidConfig("destination must not be empty".into()));
        }
        Ok(())
    }

    /// The configured sink, or a [`DirectorySink`] on the destination.
    pub(crate) fn resolve_sink(&self) -> Arc<dyn TileSink> {
        match &self.sink {
            Some(sink) => Arc::clone(sink),
            None => Arc::new(DirectorySink::with_pool(
                self.destination.clone(),
                self.extension.clone(),
                WritePool::new(self.max_concurrent_writes),
            )),
        }
    }

    /// The configured encoder, or an [`MvtEncoder`] at the index extent.
    pub(crate) fn resolve_encoder(&self) -> Arc<dyn TileEncoder> {
        match &self.encoder {
            Some(encoder) => Arc::clone(encoder),
            None => Arc::new(MvtEncoder::new(self.index_options.extent)),
        }
    }
}

impl std::fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunConfig")
            .field("destination", &self.destination)
            .field("extension", &self.extension)
            .field("max_zoom", &self.max_zoom)
            .field("custom_sink", &self.sink.is_some())
            .field("custom_encoder", &self.encoder.is_some())
            .field("index_options", &self.index_options)
            .field("max_concurrent_writes", &self.max_concurrent_writes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;

    #[test]
    fn test_defaults() {
        let config = RunConfig::new("out");
        assert_eq!(config.extension(), "pbf");
        assert_eq!(config.max_zoom(), 24);
        assert_eq!(config.max_concurrent_writes(), 64);
        assert_eq!(config.index_options(), &IndexOptions::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_max_zoom_is_clamped() {
        assert_eq!(RunConfig::new("out").with_max_zoom(30).max_zoom(), 24);
        assert_eq!(RunConfig::new("out").with_max_zoom(0).max_zoom(), 0);
    }

    #[test]
    fn test_bad_extensions_are_rejected() {
        for ext in ["", ".pbf", "a/b", "a\\b"] {
            let config = RunConfig::new("out").with_extension(ext);
            assert!(
                matches!(config.validate(), Err(PyramidError::InvalidConfig(_))),
                "extension {:?} accepted",
                ext
            );
        }
    }

    #[test]
    fn test_custom_sink_skips_path_checks() {
        let config = RunConfig::new("")
            .with_extension("")
            .with_sink(Arc::new(MemorySink::new()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_concurrency_floor() {
        assert_eq!(RunConfig::new("out").with_max_concurrent_writes(0).max_concurrent_writes(), 1);
    }
}
