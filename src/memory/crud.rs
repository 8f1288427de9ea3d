//! Store and forget operations.

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::errors::Error;
use crate::memory_types::{ForgetRequest, ForgetResult, Memory, NewMemory};
use crate::namespace;
use crate::tags;

use super::store::{MemoryStore, memory_from_item, now_timestamp};

impl MemoryStore {
    #[must_use = "handle the error or results may be lost"]
    /// Store a new memory in its project's namespace.
    ///
    /// Generates the id and timestamp, encodes the tags, and creates the
    /// namespace on first use.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Content is empty or exceeds 100,000 characters
    /// - Project is empty
    /// - Importance is outside 1-5
    /// - A tag is blank or contains a comma
    /// - Embedding generation or the database write fails
    pub fn store(&mut self, new: NewMemory) -> Result<Memory, Error> {
        Self::validate_input_length(&new.content)?;
        if new.project.trim().is_empty() {
            return Err(Error::InvalidInput("project cannot be empty".to_string()));
        }
        if !(1..=5).contains(&new.importance) {
            return Err(Error::InvalidImportance(new.importance));
        }
        tags::validate_tags(&new.tags)?;

        let memory = Memory {
            id: Uuid::new_v4().to_string(),
            tags: tags::canonical_tags(&new.tags),
            timestamp: now_timestamp(),
            content: new.content,
            project: new.project,
            source: new.source,
            importance: new.importance,
        };

        let mut metadata = Map::new();
        metadata.insert("project".to_string(), Value::from(memory.project.as_str()));
        metadata.insert("source".to_string(), Value::from(memory.source.as_str()));
        metadata.insert("importance".to_string(), Value::from(memory.importance));
        metadata.insert("timestamp".to_string(), Value::from(memory.timestamp.as_str()));
        metadata.extend(tags::tags_to_metadata(&memory.tags));

        let embedding = self.embedder.embed(&memory.content)?;
        let collection = namespace::collection_name(&memory.project);
        self.db.get_or_create_collection(&collection)?;
        self.db
            .add(&collection, &memory.id, &memory.content, &embedding, &metadata)?;

        tracing::debug!(id = %memory.id, collection = %collection, "stored memory");
        Ok(memory)
    }

    /// Fetch one memory by id from whichever namespace holds it.
    ///
    /// # Errors
    ///
    /// Returns error if a namespace read fails or the stored metadata is corrupt.
    pub fn get(&self, id: &str) -> Result<Option<Memory>, Error> {
        let wanted = [id.to_string()];
        for target in self.targets(None)? {
            let item = self
                .db
                .get(&target.collection, Some(&wanted[..]), None)?
                .into_iter()
                .next();
            if let Some(item) = item {
                return memory_from_item(item).map(Some);
            }
        }
        Ok(None)
    }

    #[must_use = "handle the error or results may be lost"]
    /// Delete memories selected by `request`.
    ///
    /// - `ById` looks in every namespace, since an id's namespace is unknown.
    /// - `ByProject` drops the whole namespace; a missing one deletes nothing.
    /// - `ByTags` deletes memories carrying every tag, in one or all namespaces.
    ///
    /// A concurrent `store` into a project whose namespace is being dropped
    /// is not guarded against.
    ///
    /// # Errors
    ///
    /// Returns error if any namespace operation fails; the call stops at the
    /// first failure.
    pub fn forget(&self, request: &ForgetRequest) -> Result<ForgetResult, Error> {
        let deleted = match request {
            ForgetRequest::ById(ids) => {
                let mut deleted = Vec::new();
                for target in self.targets(None)? {
                    let found: Vec<String> = self
                        .db
                        .get(&target.collection, Some(ids.as_slice()), None)?
                        .into_iter()
                        .map(|item| item.id)
                        .collect();
                    if !found.is_empty() {
                        self.db.delete(&target.collection, &found)?;
                        deleted.extend(found);
                    }
                }
                deleted
            }
            ForgetRequest::ByProject(project) => {
                let collection = namespace::collection_name(project);
                let removed = self.db.delete_collection(&collection)?.unwrap_or_default();
                tracing::info!(
                    collection = %collection,
                    count = removed.len(),
                    "dropped project namespace"
                );
                removed
            }
            ForgetRequest::ByTags { project, tags } => {
                let Some(filter) = tags::build_tag_filter(tags) else {
                    return Err(Error::MissingForgetCriteria);
                };
                let mut deleted = Vec::new();
                for target in self.targets(project.as_deref())? {
                    let found: Vec<String> = self
                        .db
                        .get(&target.collection, None, Some(&filter))?
                        .into_iter()
                        .map(|item| item.id)
                        .collect();
                    if !found.is_empty() {
                        self.db.delete(&target.collection, &found)?;
                        deleted.extend(found);
                    }
                }
                deleted
            }
        };

        tracing::debug!(count = deleted.len(), "forgot memories");
        Ok(ForgetResult::from_ids(deleted))
    }
}
