//! CLI command implementations.
//!
//! - [`generate`] - Write a tile pyramid from GeoJSON layer files
//! - [`config`] - Create or inspect `tiledir.ini`

pub mod config;
pub mod generate;
