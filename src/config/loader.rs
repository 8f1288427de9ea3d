//! Configuration file loading and parsing.

use crate::errors::Error;
use serde::Deserialize;
use std::path::PathBuf;

/// Configuration loaded from TOML file. Every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    #[serde(default)]
    pub default_project: Option<String>,

    #[serde(default)]
    pub max_results: Option<i64>,

    #[serde(default)]
    pub embedding_model: Option<String>,
}

/// Location of the optional config file.
fn config_file_path() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let config_dir = dirs::config_dir().unwrap_or_else(|| home.join(".config"));
    config_dir.join("mcp-memory/config.toml")
}

/// Load configuration from TOML file, if present.
pub fn load_from_file() -> Result<Option<ConfigFile>, Error> {
    let config_path = config_file_path();
    if !config_path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&config_path).map_err(|e| {
        Error::Config(format!(
            "Failed to read config file {}: {e}",
            config_path.display()
        ))
    })?;

    let config: ConfigFile = toml::from_str(&content).map_err(|e| {
        Error::Config(format!(
            "Failed to parse config file {}: {e}",
            config_path.display()
        ))
    })?;

    tracing::debug!(path = %config_path.display(), "loaded config file");
    Ok(Some(config))
}
