//! Default values for every configuration setting.

use super::settings::*;
use crate::coord::MAX_PYRAMID_ZOOM;
use crate::feature::DEFAULT_EXTENT;
use crate::index::{ClusterOptions, IndexOptions};
use crate::pyramid::{RunConfig, DEFAULT_EXTENSION};
use crate::sink::DEFAULT_MAX_CONCURRENT_WRITES;

pub const DEFAULT_MAX_ZOOM: u8 = MAX_PYRAMID_ZOOM;
pub const DEFAULT_INDEX_EXTENT: u32 = DEFAULT_EXTENT;
pub const DEFAULT_INDEX_BUFFER: u32 = 64;
pub const DEFAULT_CLUSTER_RADIUS: f64 = 40.0;
pub const DEFAULT_CLUSTER_EXTENT: u32 = 512;
pub const DEFAULT_CLUSTER_MAX_ZOOM: u8 = 16;
pub const DEFAULT_CLUSTER_MIN_POINTS: usize = 2;
pub const DEFAULT_CONCURRENT_WRITES: usize = DEFAULT_MAX_CONCURRENT_WRITES;

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            output: OutputSettings {
                directory: None,
                extension: DEFAULT_EXTENSION.to_string(),
                max_zoom: DEFAULT_MAX_ZOOM,
            },
            index: IndexSettings {
                extent: DEFAULT_INDEX_EXTENT,
                buffer: DEFAULT_INDEX_BUFFER,
                generate_id: false,
            },
            cluster: ClusterSettings {
                radius: DEFAULT_CLUSTER_RADIUS,
                extent: DEFAULT_CLUSTER_EXTENT,
                max_zoom: DEFAULT_CLUSTER_MAX_ZOOM,
                min_points: DEFAULT_CLUSTER_MIN_POINTS,
            },
            traversal: TraversalSettings {
                max_concurrent_writes: DEFAULT_CONCURRENT_WRITES,
            },
            logging: LoggingSettings { file: None },
        }
    }
}

impl ConfigFile {
    pub fn index_options(&self) -> IndexOptions {
        IndexOptions::default()
            .with_extent(self.index.extent)
            .with_buffer(self.index.buffer)
            .with_generate_id(self.index.generate_id)
    }

    pub fn cluster_options(&self) -> ClusterOptions {
        ClusterOptions::default()
            .with_radius(self.cluster.radius)
            .with_extent(self.cluster.extent)
            .with_max_zoom(self.cluster.max_zoom)
            .with_min_points(self.cluster.min_points)
    }

    /// Applies every file setting that has a [`RunConfig`] counterpart.
    pub fn apply_to(&self, config: RunConfig) -> RunConfig {
        config
            .with_extension(self.output.extension.clone())
            .with_max_zoom(self.output.max_zoom)
            .with_index_options(self.index_options())
            .with_max_concurrent_writes(self.traversal.max_concurrent_writes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_library() {
        let config = ConfigFile::default();
        assert_eq!(config.index_options(), IndexOptions::default());
        assert_eq!(config.cluster_options(), ClusterOptions::default());
    }

    #[test]
    fn test_apply_to_run_config() {
        let mut file = ConfigFile::default();
        file.output.extension = "mvt".into();
        file.output.max_zoom = 9;
        file.traversal.max_concurrent_writes = 3;

        let run = file.apply_to(RunConfig::new("out"));
        assert_eq!(run.extension(), "mvt");
        assert_eq!(run.max_zoom(), 9);
        assert_eq!(run.max_concurrent_writes(), 3);
    }
}
