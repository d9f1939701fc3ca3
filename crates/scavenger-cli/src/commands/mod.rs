//! Subcommands.

pub mod batch;
pub mod config;
pub mod extract;

use std::path::{Path, PathBuf};

use scavenger_core::{DocumentProfile, ScavengerConfig};
use tracing::debug;

/// Profile used when none is named.
pub const DEFAULT_PROFILE: &str = "client";

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scavenger")
        .join("config.json")
}

/// Load the explicit config file, else the user config if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<ScavengerConfig> {
    if let Some(path) = config_path {
        return Ok(ScavengerConfig::from_file(Path::new(path))?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading configuration from {}", path.display());
        Ok(ScavengerConfig::from_file(&path)?)
    } else {
        Ok(ScavengerConfig::default())
    }
}

pub fn find_profile(config: &ScavengerConfig, name: &str) -> anyhow::Result<DocumentProfile> {
    config.profile(name).cloned().ok_or_else(|| {
        let known: Vec<&str> = config.profiles.iter().map(|p| p.name.as_str()).collect();
        anyhow::anyhow!("Unknown profile '{}' (known: {})", name, known.join(", "))
    })
}
