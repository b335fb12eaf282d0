//! CLI command implementations.

pub mod batch;
pub mod config;
pub mod process;

use std::path::Path;

use vehidoc_core::models::config::VehidocConfig;

/// Configuration from `--config`, else the user config file, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<VehidocConfig> {
    if let Some(path) = config_path {
        return Ok(VehidocConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        Ok(VehidocConfig::from_file(&default_path)?)
    } else {
        Ok(VehidocConfig::default())
    }
}
