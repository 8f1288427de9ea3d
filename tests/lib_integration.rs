//! Integration tests exercising the mcp-memory library API from an external crate.

use std::path::PathBuf;

use tempfile::TempDir;

use mcp_memory::errors::Error;
use mcp_memory::{
    Config, ForgetRequest, HashingEmbedder, MAX_INPUT_LENGTH, MAX_SEARCH_LIMIT, MemoryStore,
    NewMemory,
};

fn open_store(dir: &TempDir) -> MemoryStore {
    let path = dir.path().join("memories.db");
    MemoryStore::with_embedder(&path, Box::new(HashingEmbedder::new()))
        .expect("Failed to create store")
}

fn seed(store: &mut MemoryStore) {
    let entries: [(&str, &str, &[&str]); 5] = [
        ("Python is great for scripting", "dev", &["python", "lang"]),
        ("Rust is fast and safe", "dev", &["rust", "lang"]),
        ("Use PostgreSQL for relational data", "infra", &["database"]),
        ("ChromaDB is good for embeddings", "ai", &["database", "ml"]),
        ("Always write tests before shipping", "dev", &["testing"]),
    ];
    for (content, project, tags) in entries {
        store
            .store(NewMemory::new(content, project).with_tags(tags.iter().copied()))
            .expect("Failed to store memory");
    }
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Stored memories are visible to list with per-project counts.
#[test]
fn test_list_after_seeding_reports_every_project() {
    let dir = TempDir::new().unwrap();
    let mut store = open_store(&dir);
    seed(&mut store);

    let page = store.list_memories(None, &[], 1, 20).unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.memories.len(), 5);
    assert_eq!(page.project_counts.get("dev"), Some(&3));
    assert_eq!(page.project_counts.get("infra"), Some(&1));
    assert_eq!(page.project_counts.get("ai"), Some(&1));

    let lang = store.list_memories(None, &tags(&["lang"]), 1, 20).unwrap();
    assert_eq!(lang.total, 2);
    assert!(lang.memories.iter().all(|m| m.project == "dev"));
}

/// Data written by one store instance is read back by another.
#[test]
fn test_memories_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let id = {
        let mut store = open_store(&dir);
        store
            .store(NewMemory::new("Deploys happen on Fridays", "ops").with_importance(5))
            .unwrap()
            .id
    };

    let mut store = open_store(&dir);
    let results = store
        .recall("Deploys happen on Fridays", Some("ops"), &[], 5, None)
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].memory.id, id);
    assert_eq!(results[0].memory.importance, 5);
    assert!((results[0].relevance_score - 1.0).abs() < 1e-4);
}

/// Recall on a store with no namespaces returns nothing.
#[test]
fn test_recall_empty_store_returns_empty() {
    let dir = TempDir::new().unwrap();
    let mut store = open_store(&dir);

    let results = store.recall("anything", None, &[], 10, None).unwrap();
    assert!(results.is_empty());
}

/// Recall across namespaces is ranked by relevance and capped.
#[test]
fn test_recall_ranks_and_caps_across_projects() {
    let dir = TempDir::new().unwrap();
    let mut store = open_store(&dir);
    seed(&mut store);

    let results = store.recall("Rust", None, &[], 3, None).unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].memory.content, "Rust is fast and safe");
    for pair in results.windows(2) {
        assert!(pair[0].relevance_score >= pair[1].relevance_score);
    }
    for r in &results {
        assert!((0.0..=1.0).contains(&r.relevance_score));
    }
}

/// Forgetting by ids removes exactly those memories.
#[test]
fn test_forget_by_ids_removes_only_listed() {
    let dir = TempDir::new().unwrap();
    let mut store = open_store(&dir);
    seed(&mut store);

    let page = store.list_memories(None, &[], 1, 20).unwrap();
    let victims: Vec<String> = page.memories.iter().take(2).map(|m| m.id.clone()).collect();

    let result = store
        .forget(&ForgetRequest::ById(victims.clone()))
        .unwrap();
    assert_eq!(result.deleted_count, 2);

    let remaining = store.list_memories(None, &[], 1, 20).unwrap();
    assert_eq!(remaining.total, 3);
    assert!(remaining.memories.iter().all(|m| !victims.contains(&m.id)));
}

/// Forgetting a project leaves the others untouched.
#[test]
fn test_forget_project_drops_namespace() {
    let dir = TempDir::new().unwrap();
    let mut store = open_store(&dir);
    seed(&mut store);

    let request = ForgetRequest::from_filters(None, Some("dev".to_string()), None).unwrap();
    let result = store.forget(&request).unwrap();
    assert_eq!(result.deleted_count, 3);

    let page = store.list_memories(None, &[], 1, 20).unwrap();
    assert_eq!(page.total, 2);
    assert!(!page.project_counts.contains_key("dev"));
}

/// Forgetting by tag deletes across every namespace.
#[test]
fn test_forget_by_tag_across_projects() {
    let dir = TempDir::new().unwrap();
    let mut store = open_store(&dir);
    seed(&mut store);

    let request = ForgetRequest::from_filters(None, None, Some(tags(&["database"]))).unwrap();
    let result = store.forget(&request).unwrap();
    assert_eq!(result.deleted_count, 2);

    let left = store
        .list_memories(None, &tags(&["database"]), 1, 20)
        .unwrap();
    assert_eq!(left.total, 0);
}

/// Forget with no criteria is a caller error.
#[test]
fn test_forget_without_criteria_returns_error() {
    let result = ForgetRequest::from_filters(None, None, None);
    assert!(matches!(result, Err(Error::MissingForgetCriteria)));
}

/// Pages partition the newest-first listing.
#[test]
fn test_list_pagination() {
    let dir = TempDir::new().unwrap();
    let mut store = open_store(&dir);
    seed(&mut store);

    let sizes: Vec<usize> = (1..=4)
        .map(|p| store.list_memories(None, &[], p, 2).unwrap().memories.len())
        .collect();
    assert_eq!(sizes, vec![2, 2, 1, 0]);

    let first = store.list_memories(None, &[], 1, 5).unwrap();
    assert_eq!(first.memories[0].content, "Always write tests before shipping");
}

/// Path traversal in the database path is rejected.
#[test]
fn test_store_with_path_traversal_returns_error() {
    let traversal_path = PathBuf::from("../../../etc/passwd");
    let result = MemoryStore::with_embedder(&traversal_path, Box::new(HashingEmbedder::new()));
    assert!(matches!(result, Err(Error::Config(_))));
}

/// Empty and oversized input is rejected before anything is written.
#[test]
fn test_store_rejects_bad_content() {
    let dir = TempDir::new().unwrap();
    let mut store = open_store(&dir);

    let empty = store.store(NewMemory::new("   ", "dev"));
    assert!(matches!(empty, Err(Error::EmptyInput)));

    let oversized = "x".repeat(MAX_INPUT_LENGTH + 1);
    let result = store.store(NewMemory::new(oversized, "dev"));
    assert!(matches!(result, Err(Error::InvalidInput(_))));

    assert_eq!(store.list_memories(None, &[], 1, 20).unwrap().total, 0);
}

/// Result caps beyond the maximum are rejected.
#[test]
fn test_recall_limit_above_max_returns_error() {
    let dir = TempDir::new().unwrap();
    let mut store = open_store(&dir);

    let result = store.recall("query", None, &[], MAX_SEARCH_LIMIT + 1, None);
    assert!(matches!(result, Err(Error::InvalidLimit(_))));
}

/// Defaults need no environment.
#[test]
fn test_config_default_values() {
    let config = Config::default();
    assert_eq!(config.default_project, "global");
    assert_eq!(config.max_results, 10);
    assert!(config.database_path().ends_with("memories.db"));
}
