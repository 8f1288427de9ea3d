//! Environment variable overrides for configuration.

use crate::errors::Error;

use super::Config;
use super::env_parser;

/// Apply every `MCP_MEMORY_*` environment override to `config`.
pub fn apply_env_overrides(config: &mut Config) -> Result<(), Error> {
    env_parser::apply_data_dir_override(&mut config.data_dir)?;
    env_parser::apply_default_project_override(&mut config.default_project)?;
    env_parser::apply_max_results_override(&mut config.max_results)?;
    env_parser::apply_embedding_model_override(&mut config.embedding_model)?;
    Ok(())
}
