//! Index construction options.

use crate::feature::DEFAULT_EXTENT;

/// Options for building a [`VectorIndex`](super::VectorIndex) from raw input.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexOptions {
    /// Tile coordinate space size (default: 4096)
    pub extent: u32,
    /// Extra margin around each tile in extent units (default: 64)
    pub buffer: u32,
    /// Assign sequential ids to features lacking a numeric id (default: false)
    pub generate_id: bool,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            extent: DEFAULT_EXTENT,
            buffer: 64,
            generate_id: false,
        }
    }
}

impl IndexOptions {
    pub fn with_extent(mut self, extent: u32) -> Self {
        self.extent = extent.max(1);
        self
    }

    pub fn with_buffer(mut self, buffer: u32) -> Self {
        self.buffer = buffer;
        self
    }

    pub fn with_generate_id(mut self, generate_id: bool) -> Self {
        self.generate_id = generate_id;
        self
    }
}

/// Options for a [`ClusterIndex`](super::ClusterIndex).
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterOptions {
    /// Cluster radius in extent units (default: 40)
    pub radius: f64,
    /// Tile coordinate space size used for clustering (default: 512)
    pub extent: u32,
    /// Deepest zoom at which points are clustered (default: 16)
    pub max_zoom: u8,
    /// Minimum points that form a cluster (default: 2)
    pub min_points: usize,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            radius: 40.0,
            extent: 512,
            max_zoom: 16,
            min_points: 2,
        }
    }
}

impl ClusterOptions {
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_extent(mut self, extent: u32) -> Self {
        self.extent = extent.max(1);
        self
    }

    pub fn with_max_zoom(mut self, max_zoom: u8) -> Self {
        self.max_zoom = max_zoom;
        self
    }

    pub fn with_min_points(mut self, min_points: usize) -> Self {
        self.min_points = min_points.max(2);
        self
    }
}
