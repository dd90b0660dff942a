//! CLI command implementations

pub mod config;
pub mod lyrics;
pub mod pixels;
pub mod render;
pub mod simulate;

use anyhow::{Context, Result};
use haze_particles::SimulatorConfig;

/// Load the config file if one was given, else the defaults
pub fn load_config(path: Option<&str>) -> Result<SimulatorConfig> {
    match path {
        Some(path) => SimulatorConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path)),
        None => Ok(SimulatorConfig::default()),
    }
}
