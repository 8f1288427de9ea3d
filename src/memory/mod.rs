//! Project-partitioned memory store.
//!
//! Each project lives in its own namespace (see `crate::namespace`).
//! Operations without a project fan out over every known namespace and
//! merge the results deterministically.

mod crud;
mod list;
mod search;

// pub(crate): module internals hidden; public items re-exported explicitly via lib.rs
pub(crate) mod store;

pub use search::relevance_score;
pub use store::MemoryStore;
