//! Memory store data types.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::errors::Error;

/// Importance assigned when the caller gives none.
pub const DEFAULT_IMPORTANCE: i64 = 3;

/// A stored unit of recall. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Memory {
    /// Unique across every namespace.
    pub id: String,
    pub content: String,
    /// Project as the caller spelled it; determines the namespace.
    pub project: String,
    /// Sorted, deduplicated.
    pub tags: Vec<String>,
    pub source: String,
    /// Priority from 1 to 5.
    pub importance: i64,
    /// Creation time, RFC 3339 UTC with fixed microsecond precision.
    pub timestamp: String,
}

/// A memory matched by `recall`, with its score.
///
/// `relevance_score` is `1 - distance / 2`, so higher is better.
#[derive(Debug, Clone, Serialize)]
pub struct RecallResult {
    pub memory: Memory,
    pub relevance_score: f64,
    pub distance: f64,
}

/// Input for `MemoryStore::store`.
#[derive(Debug, Clone)]
pub struct NewMemory {
    pub content: String,
    pub project: String,
    pub tags: Vec<String>,
    pub source: String,
    pub importance: i64,
}

impl NewMemory {
    /// Memory with default tags, source and importance.
    pub fn new(content: impl Into<String>, project: impl Into<String>) -> Self {
        NewMemory {
            content: content.into(),
            project: project.into(),
            tags: Vec::new(),
            source: String::new(),
            importance: DEFAULT_IMPORTANCE,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_importance(mut self, importance: i64) -> Self {
        self.importance = importance;
        self
    }
}

/// Which memories `forget` removes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForgetRequest {
    /// Specific ids, searched for in every namespace.
    ById(Vec<String>),
    /// Every memory in a project; drops the whole namespace.
    ByProject(String),
    /// Memories carrying all `tags`, in one project or everywhere.
    ByTags {
        project: Option<String>,
        tags: Vec<String>,
    },
}

impl ForgetRequest {
    /// Select the deletion mode from optional filters.
    ///
    /// Precedence: ids win over everything (a project given alongside ids is
    /// ignored), a project without tags drops the namespace, anything else
    /// deletes by tag. Empty lists count as absent.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingForgetCriteria` if no filter is given.
    pub fn from_filters(
        ids: Option<Vec<String>>,
        project: Option<String>,
        tags: Option<Vec<String>>,
    ) -> Result<Self, Error> {
        let ids = ids.filter(|v| !v.is_empty());
        let project = project.filter(|p| !p.is_empty());
        let tags = tags.filter(|v| !v.is_empty());

        match (ids, project, tags) {
            (Some(ids), _, _) => Ok(ForgetRequest::ById(ids)),
            (None, Some(project), None) => Ok(ForgetRequest::ByProject(project)),
            (None, project, Some(tags)) => Ok(ForgetRequest::ByTags { project, tags }),
            (None, None, None) => Err(Error::MissingForgetCriteria),
        }
    }
}

/// Outcome of `forget`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ForgetResult {
    pub deleted_count: usize,
    pub deleted_ids: Vec<String>,
}

impl ForgetResult {
    pub(crate) fn from_ids(deleted_ids: Vec<String>) -> Self {
        ForgetResult {
            deleted_count: deleted_ids.len(),
            deleted_ids,
        }
    }
}

/// One page of `list_memories`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MemoryPage {
    /// Newest first.
    pub memories: Vec<Memory>,
    /// Size of the merged set before pagination.
    pub total: usize,
    /// Memories fetched per project namespace.
    pub project_counts: BTreeMap<String, usize>,
}
