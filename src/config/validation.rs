//! Configuration validation logic.

use crate::errors::Error;
use crate::memory::store::MAX_SEARCH_LIMIT;
use std::path::PathBuf;

/// Check that a configured count is at least 1.
pub fn positive_count(name: &str, value: i64) -> Result<usize, Error> {
    if value < 1 {
        return Err(Error::Config(format!("{name} must be >= 1, got {value}")));
    }
    usize::try_from(value).map_err(|e| Error::Config(format!("Invalid {name} value: {e}")))
}

/// Validates configuration values.
pub struct ConfigValidator {
    pub data_dir: PathBuf,
    pub default_project: String,
    pub max_results: usize,
    pub embedding_model: String,
}

impl ConfigValidator {
    /// Validate all configuration values.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the data directory, default project or
    /// embedding model is empty, or the result cap is 0 or above
    /// `MAX_SEARCH_LIMIT`.
    pub fn validate(&self) -> Result<(), Error> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(Error::Config("Data directory cannot be empty".to_string()));
        }
        if self.default_project.trim().is_empty() {
            return Err(Error::Config("Default project cannot be empty".to_string()));
        }
        if self.max_results == 0 {
            return Err(Error::Config("max_results must be >= 1, got 0".to_string()));
        }
        if self.max_results > MAX_SEARCH_LIMIT {
            return Err(Error::Config(format!(
                "max_results must be <= {MAX_SEARCH_LIMIT}, got {}",
                self.max_results
            )));
        }
        if self.embedding_model.trim().is_empty() {
            return Err(Error::Config("Embedding model cannot be empty".to_string()));
        }
        Ok(())
    }
}
