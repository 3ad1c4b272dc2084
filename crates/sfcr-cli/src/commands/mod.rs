//! CLI subcommands.

pub mod ask;
pub mod batch;
pub mod config;
pub mod parse;
pub mod process;

use std::path::{Path, PathBuf};

use tracing::debug;

use sfcr_core::SfcrConfig;

pub(crate) fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sfcr")
        .join("config.json")
}

/// Load the configuration from `--config`, else from the default location
/// when it exists, else the defaults.
pub(crate) fn load_config(config_path: Option<&str>) -> anyhow::Result<SfcrConfig> {
    if let Some(path) = config_path {
        return Ok(SfcrConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading configuration from {}", default_path.display());
        return Ok(SfcrConfig::from_file(&default_path)?);
    }

    Ok(SfcrConfig::default())
}
