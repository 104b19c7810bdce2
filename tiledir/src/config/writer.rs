//! INI serialization: [`ConfigFile`] to the commented text written to disk.

use std::path::Path;

use super::settings::ConfigFile;

pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let directory = config
        .output
        .directory
        .as_deref()
        .map(path_to_string)
        .unwrap_or_default();
    let log_file = config
        .logging
        .file
        .as_deref()
        .map(path_to_string)
        .unwrap_or_default();

    format!(
        r#"[output]
; Root directory for the zoom/column/row.extension tree.
; The --out command line option takes precedence.
directory = {}
; Tile file suffix (default: pbf)
extension = {}
; Deepest zoom level to generate, 0-24 (default: 24)
max_zoom = {}

[index]
; Tile coordinate space per axis for raw GeoJSON layers (default: 4096)
extent = {}
; Margin around each tile in extent units (default: 64)
buffer = {}
; Number features that have no numeric id (default: false)
generate_id = {}

[cluster]
; Cluster radius in extent units (default: 40)
radius = {}
; Tile coordinate space for clustered layers (default: 512)
extent = {}
; Deepest zoom at which points are merged (default: 16)
max_zoom = {}
; Minimum points per cluster (default: 2)
min_points = {}

[traversal]
; Tile writes allowed in flight at once (default: 64)
max_concurrent_writes = {}

[logging]
; Optional log file, truncated at the start of each run
file = {}
"#,
        directory,
        config.output.extension,
        config.output.max_zoom,
        config.index.extent,
        config.index.buffer,
        config.index.generate_id,
        config.cluster.radius,
        config.cluster.extent,
        config.cluster.max_zoom,
        config.cluster.min_points,
        config.traversal.max_concurrent_writes,
        log_file,
    )
}

fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_has_every_section() {
        let text = to_config_string(&ConfigFile::default());
        for section in ["[output]", "[index]", "[cluster]", "[traversal]", "[logging]"] {
            assert!(text.contains(section), "missing {}", section);
        }
        assert!(text.contains("extension = pbf"));
        assert!(text.contains("max_zoom = 24"));
    }

    #[test]
    fn test_reparses_to_same_config() {
        let mut config = ConfigFile::default();
        config.cluster.min_points = 7;
        config.index.generate_id = true;
        let parsed = ConfigFile::from_ini_str(&to_config_string(&config)).unwrap();
        assert_eq!(parsed, config);
    }
}
