//! Core memory store struct combining embedding generation and namespace storage.

use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde_json::Value;

use crate::config::Config;
use crate::embedding::{Embedder, load_embedder};
use crate::errors::Error;
use crate::memory_types::{DEFAULT_IMPORTANCE, Memory};
use crate::namespace;
use crate::sqlite::{Database, Error as SqliteError, Item, search};
use crate::tags;

/// Maximum allowed input length (100,000 characters).
pub const MAX_INPUT_LENGTH: usize = 100_000;
/// Maximum allowed result cap for recall.
pub const MAX_SEARCH_LIMIT: usize = crate::sqlite::search::MAX_QUERY_LIMIT;

/// Project assumed for items stored without a `project` field.
const FALLBACK_PROJECT: &str = "global";

/// A namespace an operation touches, with the project label it reports under.
pub(crate) struct Target {
    pub label: String,
    pub collection: String,
}

/// Persistent, project-scoped semantic memory.
///
/// Construct once per process and pass by reference to every operation.
///
/// # Mutability Requirements
///
/// `store` and `recall` take `&mut self` because embedders may keep
/// mutable inference state.
pub struct MemoryStore {
    pub(crate) db: Database,
    pub(crate) embedder: Box<dyn Embedder>,
}

impl MemoryStore {
    /// Open the store described by `config`, loading its embedding model.
    ///
    /// Creates the data directory if needed.
    ///
    /// # Errors
    ///
    /// Returns error if the directory or database cannot be opened, or the
    /// embedding model cannot be loaded.
    pub fn new(config: &Config) -> Result<Self, Error> {
        config.ensure_directories()?;
        let embedder = load_embedder(&config.embedding_model)?;
        Self::with_embedder(&config.database_path(), embedder)
    }

    /// Open a store at `db_path` using the given embedder.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The path contains `..` components
    /// - The parent directory is not accessible
    /// - The database cannot be opened
    pub fn with_embedder(db_path: &Path, embedder: Box<dyn Embedder>) -> Result<Self, Error> {
        use std::path::Component;

        if db_path
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(Error::Config(
                "Invalid database path: contains '..' which may escape the intended directory"
                    .to_string(),
            ));
        }

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::canonicalize(parent).map_err(|e| {
                    Error::Config(format!(
                        "Invalid database path: parent directory not accessible: {}",
                        e
                    ))
                })?;
            }
        }

        let db = Database::open(db_path)?;
        tracing::debug!(path = %db_path.display(), "opened memory store");
        Ok(MemoryStore { db, embedder })
    }

    /// Validate text input (rejects empty, whitespace-only and oversized).
    pub(crate) fn validate_input_length(text: &str) -> Result<(), Error> {
        if text.trim().is_empty() {
            return Err(Error::EmptyInput);
        }
        if text.len() > MAX_INPUT_LENGTH {
            return Err(Error::InvalidInput(format!(
                "input is {} characters, maximum is {}",
                text.len(),
                MAX_INPUT_LENGTH
            )));
        }
        Ok(())
    }

    /// Namespaces an operation runs against.
    ///
    /// A named project maps to its single namespace whether or not it exists
    /// yet; no project means every memory namespace currently stored.
    pub(crate) fn targets(&self, project: Option<&str>) -> Result<Vec<Target>, Error> {
        if let Some(project) = project {
            return Ok(vec![Target {
                label: project.to_string(),
                collection: namespace::collection_name(project),
            }]);
        }

        let targets = self
            .db
            .list_collections()?
            .into_iter()
            .filter_map(|collection| {
                namespace::project_from_collection(&collection)
                    .map(str::to_string)
                    .map(|label| Target { label, collection })
            })
            .collect();
        Ok(targets)
    }
}

/// Validate a result cap, reported as a caller error.
pub(crate) fn validate_limit(limit: usize) -> Result<(), Error> {
    search::validate_limit(limit).map_err(|e| match e {
        SqliteError::InvalidLimit(msg) => Error::InvalidLimit(msg),
        other => Error::Storage(other),
    })
}

/// Current time as RFC 3339 UTC with fixed precision, so string order
/// matches chronological order.
pub(crate) fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Rebuild a memory from a stored item, defaulting absent fields.
pub(crate) fn memory_from_item(item: Item) -> Result<Memory, Error> {
    let meta = &item.metadata;
    let text = |key: &str| meta.get(key).and_then(Value::as_str).map(str::to_string);

    let importance = match meta.get("importance") {
        None | Some(Value::Null) => DEFAULT_IMPORTANCE,
        Some(value) => value.as_i64().ok_or_else(|| Error::CorruptMetadata {
            id: item.id.clone(),
            reason: format!("importance is not an integer: {value}"),
        })?,
    };

    Ok(Memory {
        project: text("project").unwrap_or_else(|| FALLBACK_PROJECT.to_string()),
        tags: tags::metadata_to_tags(meta),
        source: text("source").unwrap_or_default(),
        importance,
        timestamp: text("timestamp").unwrap_or_default(),
        id: item.id,
        content: item.document,
    })
}
