//! Runs the built `tiledir` binary end to end.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn tiledir(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tiledir"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run tiledir binary")
}

fn write_points(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("points.geojson");
    let doc = serde_json::json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"name": "a"},
                "geometry": {"type": "Point", "coordinates": [22.5, 55.8]}
            },
            {
                "type": "Feature",
                "properties": {"name": "b"},
                "geometry": {"type": "Point", "coordinates": [-67.5, 21.9]}
            }
        ]
    });
    fs::write(&path, doc.to_string()).unwrap();
    path
}

fn count_tiles(dir: &Path) -> usize {
    let mut count = 0;
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            count += count_tiles(&path);
        } else if path.extension().is_some_and(|e| e == "pbf") {
            count += 1;
        }
    }
    count
}

#[test]
fn test_generate_writes_pyramid() {
    let temp = TempDir::new().unwrap();
    let input = write_points(temp.path());
    let out = temp.path().join("tiles");
    let layer = format!("points={}", input.display());

    let output = tiledir(
        &["generate", "--out", out.to_str().unwrap(), "--max-zoom", "3", &layer],
        temp.path(),
    );

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(out.join("0").join("0").join("0.pbf").is_file());
    // Two points well inside their tiles: a shared root, then one tile each.
    assert_eq!(count_tiles(&out), 7);
}

#[test]
fn test_generate_json_summary() {
    let temp = TempDir::new().unwrap();
    let input = write_points(temp.path());
    let out = temp.path().join("tiles");
    let layer = format!("points={}", input.display());

    let output = tiledir(
        &["generate", "--out", out.to_str().unwrap(), "--max-zoom", "2", "--json", &layer],
        temp.path(),
    );

    assert!(output.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["written"], 5);
    assert_eq!(summary["failed"], 0);
}

#[test]
fn test_generate_cluster_layer() {
    let temp = TempDir::new().unwrap();
    let input = write_points(temp.path());
    let out = temp.path().join("tiles");
    let layer = format!("stops={}", input.display());

    let output = tiledir(
        &["generate", "--out", out.to_str().unwrap(), "--max-zoom", "2", "--cluster", &layer],
        temp.path(),
    );

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(out.join("0").join("0").join("0.pbf").is_file());
}

#[test]
fn test_generate_rejects_unsupported_input() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("list.json");
    fs::write(&input, "[1, 2, 3]").unwrap();
    let out = temp.path().join("tiles");
    let layer = format!("bad={}", input.display());

    let output = tiledir(&["generate", "--out", out.to_str().unwrap(), &layer], temp.path());

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("bad"));
    assert!(!out.exists());
}

#[test]
fn test_generate_requires_output_directory() {
    let temp = TempDir::new().unwrap();
    let input = write_points(temp.path());
    let layer = format!("points={}", input.display());

    let output = tiledir(&["generate", &layer], temp.path());

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("--out"));
}

#[test]
fn test_config_init_then_show() {
    let temp = TempDir::new().unwrap();

    let init = tiledir(&["config", "init"], temp.path());
    assert!(init.status.success());
    assert!(temp.path().join("tiledir.ini").is_file());

    let again = tiledir(&["config", "init"], temp.path());
    assert_eq!(again.status.code(), Some(1));

    let show = tiledir(&["config", "show"], temp.path());
    assert!(show.status.success());
    let text = String::from_utf8_lossy(&show.stdout);
    assert!(text.contains("[output]"));
    assert!(text.contains("[cluster]"));
}

#[test]
fn test_config_file_sets_output() {
    let temp = TempDir::new().unwrap();
    let input = write_points(temp.path());
    fs::write(
        temp.path().join("custom.ini"),
        "[output]\ndirectory = from-config\nextension = mvt\nmax_zoom = 1\n",
    )
    .unwrap();
    let layer = format!("points={}", input.display());

    let output = tiledir(&["generate", "--config", "custom.ini", &layer], temp.path());

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(temp.path().join("from-config/0/0/0.mvt").is_file());
    assert!(!temp.path().join("from-config/2").exists());
}
