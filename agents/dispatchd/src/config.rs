//! Daemon-level configuration loading: read YAML if present, fall back to
//! defaults otherwise.

use anyhow::Result;
use std::path::Path;
use taskq_core::DispatchConfig;
use tracing::info;

pub fn load_config(path: &Path) -> Result<DispatchConfig> {
    if path.exists() {
        let contents = std::fs::read_to_string(path)?;
        let config: DispatchConfig = serde_yaml::from_str(&contents)?;
        config.validate()?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    } else {
        info!("No configuration file found, using defaults");
        Ok(DispatchConfig::default())
    }
}
