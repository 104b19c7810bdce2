//! `tiledir generate`: write a tile pyramid from GeoJSON layer files.

use clap::Args;
use geojson::GeoJson;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tiledir::adapter::LayerInput;
use tiledir::index::ClusterIndex;
use tiledir::pyramid::{generate_pyramid, PyramidError, PyramidSummary};
use tracing::info;

use crate::error::CliError;
use crate::runner::CliRunner;

/// A `NAME=FILE` layer argument.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerArg {
    pub name: String,
    pub path: PathBuf,
}

/// Parses `NAME=FILE`, rejecting an empty name or path.
pub fn parse_layer_arg(value: &str) -> Result<LayerArg, String> {
    let (name, path) = value
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=FILE, got '{}'", value))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("layer name missing in '{}'", value));
    }
    if path.is_empty() {
        return Err(format!("file missing for layer '{}'", name));
    }
    Ok(LayerArg {
        name: name.to_string(),
        path: PathBuf::from(path),
    })
}

/// Arguments for the generate command.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Output directory (default: [output] directory from the config file)
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Deepest zoom level to write (at most 24)
    #[arg(long)]
    pub max_zoom: Option<u8>,

    /// Tile file extension without the dot
    #[arg(long)]
    pub ext: Option<String>,

    /// Configuration file (default: ./tiledir.ini)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Point layer to cluster, as NAME=FILE (repeatable)
    #[arg(long = "cluster", value_name = "NAME=FILE", value_parser = parse_layer_arg)]
    pub clusters: Vec<LayerArg>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Layers to slice, as NAME=FILE
    #[arg(value_name = "NAME=FILE", value_parser = parse_layer_arg)]
    pub layers: Vec<LayerArg>,
}

/// Run the generate command.
pub fn run(args: GenerateArgs) -> Result<(), CliError> {
    if args.layers.is_empty() && args.clusters.is_empty() {
        return Err(CliError::Config(
            "no layers given; pass at least one NAME=FILE".to_string(),
        ));
    }

    let runner = CliRunner::new(args.config.as_deref(), args.debug)?;
    runner.log_startup("generate");

    let mut run_config = runner.run_config(args.out.clone())?;
    if let Some(ext) = &args.ext {
        run_config = run_config.with_extension(ext.clone());
    }
    if let Some(max_zoom) = args.max_zoom {
        run_config = run_config.with_max_zoom(max_zoom);
    }
    let destination = run_config.destination().to_path_buf();

    let inputs = load_layers(&args, runner.config())?;
    info!(
        layers = inputs.len(),
        max_zoom = run_config.max_zoom(),
        "Generating pyramid into {}",
        destination.display()
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;

    match runtime.block_on(generate_pyramid(inputs, run_config)) {
        Ok(summary) => {
            print_summary(&summary, &destination, args.json);
            Ok(())
        }
        Err(e) => {
            if let PyramidError::BranchesFailed { summary, .. } = &e {
                print_summary(summary, &destination, args.json);
            }
            Err(e.into())
        }
    }
}

/// Reads every layer file into a [`LayerInput`], keyed by layer name.
fn load_layers(
    args: &GenerateArgs,
    config: &tiledir::config::ConfigFile,
) -> Result<BTreeMap<String, LayerInput>, CliError> {
    let mut inputs = BTreeMap::new();

    for layer in &args.layers {
        let value = read_json(&layer.path)?;
        insert_unique(&mut inputs, &layer.name, LayerInput::Raw(value))?;
    }

    for layer in &args.clusters {
        let value = read_json(&layer.path)?;
        let geojson = GeoJson::from_json_value(value).map_err(|e| CliError::Input {
            path: layer.path.clone(),
            message: e.to_string(),
        })?;
        let index = ClusterIndex::from_geojson(&geojson, config.cluster_options());
        info!(layer = %layer.name, points = index.len(), "Clustering point layer");
        insert_unique(&mut inputs, &layer.name, LayerInput::index(index))?;
    }

    Ok(inputs)
}

fn insert_unique(
    inputs: &mut BTreeMap<String, LayerInput>,
    name: &str,
    input: LayerInput,
) -> Result<(), CliError> {
    if inputs.insert(name.to_string(), input).is_some() {
        return Err(CliError::Config(format!("layer '{}' given more than once", name)));
    }
    Ok(())
}

fn read_json(path: &Path) -> Result<Value, CliError> {
    let text = std::fs::read_to_string(path).map_err(|e| CliError::Input {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&text).map_err(|e| CliError::Input {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn print_summary(summary: &PyramidSummary, destination: &Path, json: bool) {
    if json {
        match serde_json::to_string_pretty(summary) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("Failed to serialize summary: {}", e),
        }
        return;
    }

    println!("Pyramid written to {}", destination.display());
    println!("  Frontier: {}", summary.frontier);
    println!("  Visited:  {}", summary.visited);
    println!("  Written:  {}", summary.written);
    println!("  Empty:    {}", summary.empty);
    if summary.failed > 0 {
        println!("  Failed:   {}", summary.failed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_layer_arg() {
        let arg = parse_layer_arg("roads=data/roads.geojson").unwrap();
        assert_eq!(arg.name, "roads");
        assert_eq!(arg.path, PathBuf::from("data/roads.geojson"));
    }

    #[test]
    fn test_parse_layer_arg_keeps_equals_in_path() {
        let arg = parse_layer_arg("a=dir/x=y.json").unwrap();
        assert_eq!(arg.name, "a");
        assert_eq!(arg.path, PathBuf::from("dir/x=y.json"));
    }

    #[test]
    fn test_parse_layer_arg_rejects_malformed() {
        assert!(parse_layer_arg("roads.geojson").is_err());
        assert!(parse_layer_arg("=roads.geojson").is_err());
        assert!(parse_layer_arg("roads=").is_err());
    }

    #[test]
    fn test_duplicate_layer_names_rejected() {
        let mut inputs = BTreeMap::new();
        insert_unique(&mut inputs, "a", LayerInput::Raw(Value::Null)).unwrap();
        let err = insert_unique(&mut inputs, "a", LayerInput::Raw(Value::Null)).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }
}
