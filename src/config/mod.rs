//! Configuration system for mcp-memory.

mod env_parser;
mod loader;
mod overrides;
mod paths;
mod validation;

#[cfg(test)]
mod tests_utils;
#[cfg(test)]
use tests_utils::ENV_MUTEX;

use crate::errors::Error;
use std::path::PathBuf;

pub use loader::ConfigFile;

/// File name of the SQLite database inside the data directory.
pub const DATABASE_FILE: &str = "memories.db";

/// Configuration values with priority: defaults < config file < env vars.
#[derive(Debug, Clone)]
pub struct Config {
    /// Storage root; holds the namespace database.
    pub data_dir: PathBuf,

    /// Project used when the caller names none.
    pub default_project: String,

    /// Result cap used when recall is given no `n_results`.
    pub max_results: usize,

    /// HuggingFace embedding model identifier, or `hashing`.
    pub embedding_model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: paths::expand_tilde_path(&PathBuf::from("~/.mcp-memory")),
            default_project: "global".to_string(),
            max_results: 10,
            embedding_model: "BAAI/bge-small-en-v1.5".to_string(),
        }
    }
}

impl Config {
    /// Load configuration with defaults, file values, and environment overrides.
    ///
    /// Fails when any value is invalid, including a result cap below 1 or
    /// above the largest cap `recall` accepts.
    pub fn load() -> Result<Self, Error> {
        Self::load_with(loader::load_from_file()?)
    }

    fn load_with(file_config: Option<ConfigFile>) -> Result<Self, Error> {
        let mut config = Config::default();

        if let Some(file) = file_config {
            config.merge_from_file(file)?;
        }

        overrides::apply_env_overrides(&mut config)?;
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration from a file into this config.
    fn merge_from_file(&mut self, file: ConfigFile) -> Result<(), Error> {
        if let Some(mut data_dir) = file.data_dir {
            paths::expand_tilde(&mut data_dir);
            self.data_dir = data_dir;
        }
        if let Some(project) = file.default_project {
            self.default_project = project;
        }
        if let Some(max_results) = file.max_results {
            self.max_results = validation::positive_count("max_results", max_results)?;
        }
        if let Some(model) = file.embedding_model {
            self.embedding_model = model;
        }
        Ok(())
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), Error> {
        let validator = validation::ConfigValidator {
            data_dir: self.data_dir.clone(),
            default_project: self.default_project.clone(),
            max_results: self.max_results,
            embedding_model: self.embedding_model.clone(),
        };

        validator.validate()
    }

    /// Path of the namespace database.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    /// Create the data directory if it does not exist.
    pub fn ensure_directories(&self) -> Result<(), Error> {
        std::fs::create_dir_all(&self.data_dir).map_err(|e| {
            Error::Config(format!(
                "Failed to create data directory {}: {e}",
                self.data_dir.display()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::tests_utils::cleanup_env_vars;

    const VARS: [&str; 4] = [
        "MCP_MEMORY_DATA_DIR",
        "MCP_MEMORY_DEFAULT_PROJECT",
        "MCP_MEMORY_MAX_RESULTS",
        "MCP_MEMORY_EMBEDDING_MODEL",
    ];

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.data_dir.ends_with(".mcp-memory"));
        assert_eq!(config.default_project, "global");
        assert_eq!(config.max_results, 10);
        assert_eq!(config.embedding_model, "BAAI/bge-small-en-v1.5");
        assert!(config.database_path().ends_with(".mcp-memory/memories.db"));
    }

    #[test]
    fn test_load_without_file_or_env() {
        let _guard = ENV_MUTEX.lock().unwrap();
        cleanup_env_vars(&VARS);

        let config = Config::load_with(None).unwrap();
        assert_eq!(config.default_project, "global");
        assert_eq!(config.max_results, 10);
    }

    #[test]
    fn test_env_overrides_file() {
        let _guard = ENV_MUTEX.lock().unwrap();
        cleanup_env_vars(&VARS);
        #[allow(clippy::disallowed_methods)]
        unsafe {
            std::env::set_var("MCP_MEMORY_DEFAULT_PROJECT", "myproject");
        }

        let file = ConfigFile {
            data_dir: Some(PathBuf::from("/from/file")),
            default_project: Some("fileproject".to_string()),
            max_results: Some(25),
            embedding_model: None,
        };
        let config = Config::load_with(Some(file)).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/from/file"));
        assert_eq!(config.default_project, "myproject");
        assert_eq!(config.max_results, 25);

        cleanup_env_vars(&VARS);
    }

    #[test]
    fn test_file_rejects_zero_max_results() {
        let _guard = ENV_MUTEX.lock().unwrap();
        cleanup_env_vars(&VARS);

        let file = ConfigFile {
            max_results: Some(0),
            ..ConfigFile::default()
        };
        assert!(matches!(
            Config::load_with(Some(file)),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_env_max_results_above_recall_cap_rejected() {
        let _guard = ENV_MUTEX.lock().unwrap();
        cleanup_env_vars(&VARS);
        #[allow(clippy::disallowed_methods)]
        unsafe {
            std::env::set_var("MCP_MEMORY_MAX_RESULTS", "20000");
        }

        let result = Config::load_with(None);
        cleanup_env_vars(&VARS);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_ensure_directories_creates_data_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config {
            data_dir: dir.path().join("nested").join("data"),
            ..Config::default()
        };
        config.ensure_directories().unwrap();
        assert!(config.data_dir.is_dir());
    }
}
