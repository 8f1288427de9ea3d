//! Mapping between project names and storage namespace identifiers.
//!
//! Normalization is lossy: `My Project`, `my-project` and `my_project` all
//! share one namespace. The original spelling is kept in each memory's
//! `project` metadata field, never recovered from the namespace id.

/// Prefix carried by every namespace that holds memories.
pub const NAMESPACE_PREFIX: &str = "memories_";

/// Resolve the namespace identifier for a project name.
pub fn collection_name(project: &str) -> String {
    let safe = project.replace(['-', ' '], "_").to_lowercase();
    format!("{NAMESPACE_PREFIX}{safe}")
}

/// Strip the namespace prefix, returning the normalized project name.
///
/// Returns `None` for identifiers outside the memory namespace family.
pub fn project_from_collection(name: &str) -> Option<&str> {
    name.strip_prefix(NAMESPACE_PREFIX)
}

/// True if the identifier belongs to the memory namespace family.
pub fn is_memory_namespace(name: &str) -> bool {
    name.starts_with(NAMESPACE_PREFIX)
}
