//! mcp-memory - persistent, project-scoped semantic memory.
//!
//! Memories are short texts with a project, tags, a source note and an
//! importance. Each project lives in its own durable namespace; recall
//! ranks memories by semantic similarity to a query, across one project
//! or all of them. All operations are synchronous.
//!
//! # Example
//!
//! ```no_run
//! use mcp_memory::{Config, ForgetRequest, MemoryStore, NewMemory};
//!
//! let config = Config::load().expect("Failed to load config");
//! let mut store = MemoryStore::new(&config).expect("Failed to initialize store");
//!
//! let memory = store
//!     .store(NewMemory::new("Use PostgreSQL for relational data", "infra").with_tags(["database"]))
//!     .expect("Failed to store");
//!
//! for result in store.recall("which database?", None, &[], 5, Some(0.5)).unwrap() {
//!     println!("{:.2}: {}", result.relevance_score, result.memory.content);
//! }
//!
//! let page = store.list_memories(None, &[], 1, 20).unwrap();
//! println!("{} memories, {:?}", page.total, page.project_counts);
//!
//! store
//!     .forget(&ForgetRequest::ById(vec![memory.id]))
//!     .expect("Failed to forget");
//! ```
//!
//! # Mutability Requirements
//!
//! `store` and `recall` require `&mut self` because the embedding engine
//! mutates state for ONNX tensor allocations.

pub mod config;
pub mod embedding;
pub mod errors;
pub mod memory;
pub mod memory_types;
pub mod namespace;
pub mod sqlite;
pub mod tags;

// Re-export public API
pub use config::Config;
pub use embedding::{EMBEDDING_DIMS, Embedder, EmbeddingEngine, HashingEmbedder};
pub use errors::Error;
pub use memory::store::{MAX_INPUT_LENGTH, MAX_SEARCH_LIMIT};
pub use memory::{MemoryStore, relevance_score};
pub use memory_types::{ForgetRequest, ForgetResult, Memory, MemoryPage, NewMemory, RecallResult};
