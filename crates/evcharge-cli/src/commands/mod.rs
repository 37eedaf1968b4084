pub mod config;
pub mod plugins;
pub mod process;
pub mod scaffold;
pub mod sources;

use std::path::{Path, PathBuf};

use tracing::debug;

use evcharge_core::EvChargeConfig;

/// `<config dir>/evcharge/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("evcharge")
        .join("config.json")
}

/// Explicit `--config` file, else the default file if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<EvChargeConfig> {
    if let Some(path) = config_path {
        return Ok(EvChargeConfig::from_file(Path::new(path))?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading configuration from {}", path.display());
        Ok(EvChargeConfig::from_file(&path)?)
    } else {
        Ok(EvChargeConfig::default())
    }
}
