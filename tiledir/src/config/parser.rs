//! INI parsing: `Ini` to [`ConfigFile`].
//!
//! The single place where INI key names are mapped to struct fields.

use ini::{Ini, Properties};
use std::path::PathBuf;
use std::str::FromStr;

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::coord::MAX_PYRAMID_ZOOM;

/// Starts from `ConfigFile::default()` and overlays the values found in `ini`.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [output] section
    if let Some(section) = ini.section(Some("output")) {
        if let Some(v) = non_empty(section, "directory") {
            config.output.directory = Some(PathBuf::from(v));
        }
        if let Some(v) = non_empty(section, "extension") {
            let v = v.trim_start_matches('.');
            if v.is_empty() || v.contains(['/', '\\']) {
                return Err(invalid(
                    "output",
                    "extension",
                    v,
                    "must be a file suffix such as 'pbf' or 'mvt'",
                ));
            }
            config.output.extension = v.to_string();
        }
        if let Some(v) = section.get("max_zoom") {
            let zoom: u8 = parse_number("output", "max_zoom", v, "must be an integer 0-24")?;
            config.output.max_zoom = zoom.min(MAX_PYRAMID_ZOOM);
        }
    }

    // [index] section
    if let Some(section) = ini.section(Some("index")) {
        if let Some(v) = section.get("extent") {
            config.index.extent = positive("index", "extent", v)?;
        }
        if let Some(v) = section.get("buffer") {
            config.index.buffer =
                parse_number("index", "buffer", v, "must be a non-negative integer")?;
        }
        if let Some(v) = section.get("generate_id") {
            config.index.generate_id = parse_bool(v);
        }
    }

    // [cluster] section
    if let Some(section) = ini.section(Some("cluster")) {
        if let Some(v) = section.get("radius") {
            let radius: f64 = parse_number("cluster", "radius", v, "must be a number")?;
            if !(radius > 0.0 && radius.is_finite()) {
                return Err(invalid("cluster", "radius", v, "must be greater than zero"));
            }
            config.cluster.radius = radius;
        }
        if let Some(v) = section.get("extent") {
            config.cluster.extent = positive("cluster", "extent", v)?;
        }
        if let Some(v) = section.get("max_zoom") {
            config.cluster.max_zoom =
                parse_number("cluster", "max_zoom", v, "must be an integer 0-24")?;
        }
        if let Some(v) = section.get("min_points") {
            let min: usize = parse_number("cluster", "min_points", v, "must be an integer >= 2")?;
            if min < 2 {
                return Err(invalid("cluster", "min_points", v, "must be an integer >= 2"));
            }
            config.cluster.min_points = min;
        }
    }

    // [traversal] section
    if let Some(section) = ini.section(Some("traversal")) {
        if let Some(v) = section.get("max_concurrent_writes") {
            config.traversal.max_concurrent_writes = positive("traversal", "max_concurrent_writes", v)?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = non_empty(section, "file") {
            config.logging.file = Some(PathBuf::from(v));
        }
    }

    Ok(config)
}

fn non_empty<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section.get(key).map(str::trim).filter(|v| !v.is_empty())
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_number<T: FromStr>(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, reason))
}

fn positive<T: FromStr + PartialOrd + Default>(
    section: &str,
    key: &str,
    value: &str,
) -> Result<T, ConfigFileError> {
    let n: T = parse_number(section, key, value, "must be a positive integer")?;
    if n <= T::default() {
        return Err(invalid(section, key, value, "must be a positive integer"));
    }
    Ok(n)
}

pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}
