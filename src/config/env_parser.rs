//! Environment variable parsing utilities for configuration.

use crate::errors::Error;
use std::path::PathBuf;

use super::{paths, validation};

pub const DATA_DIR_VAR: &str = "MCP_MEMORY_DATA_DIR";
pub const DEFAULT_PROJECT_VAR: &str = "MCP_MEMORY_DEFAULT_PROJECT";
pub const MAX_RESULTS_VAR: &str = "MCP_MEMORY_MAX_RESULTS";
pub const EMBEDDING_MODEL_VAR: &str = "MCP_MEMORY_EMBEDDING_MODEL";

/// Parse environment variable value or return error if empty/whitespace.
fn parse_env_string(name: &str, value: &str) -> Result<String, Error> {
    if value.trim().is_empty() {
        return Err(Error::Config(format!("{name} cannot be empty")));
    }
    Ok(value.trim().to_string())
}

/// Parse environment variable as a path, expanding tilde.
fn parse_env_path(name: &str, value: &str) -> Result<PathBuf, Error> {
    let value = parse_env_string(name, value)?;
    Ok(paths::expand_tilde_path(&PathBuf::from(value)))
}

/// Parse environment variable as an integer that must be at least 1.
fn parse_env_count(name: &str, value: &str) -> Result<usize, Error> {
    let value = parse_env_string(name, value)?;
    let parsed: i64 = value
        .parse()
        .map_err(|e| Error::Config(format!("Invalid {name} value: {e}")))?;
    validation::positive_count(name, parsed)
}

/// Apply MCP_MEMORY_DATA_DIR environment variable override.
pub fn apply_data_dir_override(data_dir: &mut PathBuf) -> Result<(), Error> {
    if let Ok(val) = std::env::var(DATA_DIR_VAR) {
        *data_dir = parse_env_path(DATA_DIR_VAR, &val)?;
    }
    Ok(())
}

/// Apply MCP_MEMORY_DEFAULT_PROJECT environment variable override.
pub fn apply_default_project_override(default_project: &mut String) -> Result<(), Error> {
    if let Ok(val) = std::env::var(DEFAULT_PROJECT_VAR) {
        *default_project = parse_env_string(DEFAULT_PROJECT_VAR, &val)?;
    }
    Ok(())
}

/// Apply MCP_MEMORY_MAX_RESULTS environment variable override.
pub fn apply_max_results_override(max_results: &mut usize) -> Result<(), Error> {
    if let Ok(val) = std::env::var(MAX_RESULTS_VAR) {
        *max_results = parse_env_count(MAX_RESULTS_VAR, &val)?;
    }
    Ok(())
}

/// Apply MCP_MEMORY_EMBEDDING_MODEL environment variable override.
pub fn apply_embedding_model_override(embedding_model: &mut String) -> Result<(), Error> {
    if let Ok(val) = std::env::var(EMBEDDING_MODEL_VAR) {
        *embedding_model = parse_env_string(EMBEDDING_MODEL_VAR, &val)?;
    }
    Ok(())
}
