//! SQLite backend holding one durable namespace (collection) per project.
//!
//! This module provides:
//! - `Database`: connection, schema and per-collection item operations
//! - `Item`: a stored (id, document, metadata) triple with optional distance
//! - `embedding`: BLOB conversion and cosine distance
//! - `filter`: metadata equality predicates
//! - `search`: similarity queries

pub mod embedding;
pub mod filter;
pub mod search;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::{Map, Value};
use std::path::Path;

pub use self::embedding::vec_to_blob;
pub use self::filter::MetadataFilter;

/// A stored item as returned by get and query operations.
#[derive(Debug, Clone)]
pub struct Item {
    pub id: String,
    pub document: String,
    pub metadata: Map<String, Value>,

    /// Cosine distance to the query (0.0 = identical, 2.0 = opposite).
    /// Only set by similarity queries.
    pub distance: Option<f64>,
}

/// Error types for SQLite operations.
#[derive(Debug)]
pub enum Error {
    Sqlite(String),
    InvalidBlobSize { expected: usize, actual: usize },
    MismatchedDimensions { expected: usize, actual: usize },
    EmptyVector,
    InvalidEmbedding(String),
    InvalidLimit(String),
    CorruptMetadata { id: String, reason: String },
    UnknownCollection(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Sqlite(msg) => write!(f, "Database error: {}", msg),
            Error::InvalidBlobSize { expected, actual } => write!(
                f,
                "Invalid BLOB size: expected {} bytes, got {} bytes",
                expected, actual
            ),
            Error::MismatchedDimensions { expected, actual } => write!(
                f,
                "Mismatched dimensions: expected {} dimensions, got {} dimensions",
                expected, actual
            ),
            Error::EmptyVector => write!(f, "Cannot compute distance with empty vector"),
            Error::InvalidEmbedding(msg) => write!(f, "Invalid embedding: {}", msg),
            Error::InvalidLimit(msg) => write!(f, "Invalid limit: {}", msg),
            Error::CorruptMetadata { id, reason } => {
                write!(f, "Corrupt metadata for item {}: {}", id, reason)
            }
            Error::UnknownCollection(name) => write!(f, "Collection does not exist: {}", name),
        }
    }
}

impl std::error::Error for Error {}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Sqlite(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// SQLite database holding every memory namespace.
pub struct Database {
    conn: Connection,
}

fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS collections (
            name TEXT PRIMARY KEY,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS items (
            id TEXT PRIMARY KEY,
            collection TEXT NOT NULL,
            document TEXT NOT NULL,
            embedding BLOB NOT NULL,
            metadata TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_items_collection ON items(collection);
        "#,
    )?;
    Ok(())
}

/// Parse the JSON metadata column of an item.
pub(crate) fn parse_metadata(id: &str, raw: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(Error::CorruptMetadata {
            id: id.to_string(),
            reason: "metadata is not a JSON object".to_string(),
        }),
        Err(e) => Err(Error::CorruptMetadata {
            id: id.to_string(),
            reason: e.to_string(),
        }),
    }
}

impl Database {
    /// Open or create a SQLite database at the given path.
    ///
    /// # Errors
    ///
    /// Returns error if the database cannot be opened or schema initialization fails.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        create_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Create the collection if it does not exist yet.
    pub fn get_or_create_collection(&self, name: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO collections (name, created_at) VALUES (?1, ?2)",
            params![name, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// True if the collection exists.
    pub fn collection_exists(&self, name: &str) -> Result<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM collections WHERE name = ?1",
                [name],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Names of every existing collection, sorted.
    pub fn list_collections(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM collections ORDER BY name")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names)
    }

    /// Number of items in a collection (0 if it does not exist).
    pub fn count(&self, name: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM items WHERE collection = ?1",
            [name],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Add an item to an existing collection.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownCollection` if the collection was never created,
    /// or an error if the embedding has the wrong dimensions.
    pub fn add(
        &self,
        name: &str,
        id: &str,
        document: &str,
        embedding: &[f32],
        metadata: &Map<String, Value>,
    ) -> Result<()> {
        if !self.collection_exists(name)? {
            return Err(Error::UnknownCollection(name.to_string()));
        }
        let blob = vec_to_blob(embedding)?;
        let metadata = Value::Object(metadata.clone()).to_string();

        self.conn.execute(
            r#"
            INSERT INTO items (id, collection, document, embedding, metadata)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![id, name, document, &blob, &metadata],
        )?;
        Ok(())
    }

    /// Fetch items from a collection in insertion order.
    ///
    /// `ids` restricts the result to those identifiers (missing ones are
    /// skipped); `filter` restricts it to matching metadata.
    pub fn get(
        &self,
        name: &str,
        ids: Option<&[String]>,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<Item>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, document, metadata
            FROM items
            WHERE collection = ?1
            ORDER BY rowid
            "#,
        )?;
        let rows = stmt.query_map([name], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut items = Vec::new();
        for row in rows {
            let (id, document, raw) = row?;
            if let Some(ids) = ids {
                if !ids.contains(&id) {
                    continue;
                }
            }
            let metadata = parse_metadata(&id, &raw)?;
            if !filter::passes(filter, &metadata) {
                continue;
            }
            items.push(Item {
                id,
                document,
                metadata,
                distance: None,
            });
        }
        Ok(items)
    }

    /// Delete the given ids from a collection, returning how many existed.
    pub fn delete(&self, name: &str, ids: &[String]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let mut deleted = 0;
        {
            let mut stmt =
                tx.prepare("DELETE FROM items WHERE collection = ?1 AND id = ?2")?;
            for id in ids {
                deleted += stmt.execute(params![name, id])?;
            }
        }
        tx.commit()?;
        Ok(deleted)
    }

    /// Drop a collection and everything in it as one transaction.
    ///
    /// Returns the ids that were removed, or `None` if the collection did
    /// not exist.
    pub fn delete_collection(&self, name: &str) -> Result<Option<Vec<String>>> {
        let tx = self.conn.unchecked_transaction()?;
        let exists = tx
            .query_row(
                "SELECT 1 FROM collections WHERE name = ?1",
                [name],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if !exists {
            return Ok(None);
        }

        let ids = {
            let mut stmt =
                tx.prepare("SELECT id FROM items WHERE collection = ?1 ORDER BY rowid")?;
            stmt.query_map([name], |row| row.get::<_, String>(0))?
                .collect::<rusqlite::Result<Vec<_>>>()?
        };
        tx.execute("DELETE FROM items WHERE collection = ?1", [name])?;
        tx.execute("DELETE FROM collections WHERE name = ?1", [name])?;
        tx.commit()?;
        Ok(Some(ids))
    }

    /// Get internal connection (for internal use, e.g., tests).
    #[cfg(test)]
    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_db() -> Database {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::open(&path).unwrap();
        std::mem::forget(dir);
        db
    }

    fn meta(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_collection_lifecycle() {
        let db = create_test_db();
        assert!(!db.collection_exists("memories_a").unwrap());
        db.get_or_create_collection("memories_a").unwrap();
        db.get_or_create_collection("memories_a").unwrap();
        assert!(db.collection_exists("memories_a").unwrap());
        assert_eq!(db.list_collections().unwrap(), ids(&["memories_a"]));
    }

    #[test]
    fn test_add_requires_collection() {
        let db = create_test_db();
        let result = db.add("missing", "1", "doc", &[0.1; 384], &Map::new());
        assert!(matches!(result, Err(Error::UnknownCollection(_))));
    }

    #[test]
    fn test_add_rejects_wrong_dimensions() {
        let db = create_test_db();
        db.get_or_create_collection("c").unwrap();
        let result = db.add("c", "1", "doc", &[0.1; 10], &Map::new());
        assert!(matches!(result, Err(Error::MismatchedDimensions { .. })));
    }

    #[test]
    fn test_add_get_and_count() {
        let db = create_test_db();
        db.get_or_create_collection("c").unwrap();
        db.add("c", "1", "first", &[0.1; 384], &meta(json!({"k": 1})))
            .unwrap();
        db.add("c", "2", "second", &[0.1; 384], &meta(json!({"k": 2})))
            .unwrap();

        assert_eq!(db.count("c").unwrap(), 2);
        assert_eq!(db.count("other").unwrap(), 0);

        let all = db.get("c", None, None).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].document, "first");
        assert_eq!(all[1].metadata.get("k"), Some(&json!(2)));
        assert!(all[0].distance.is_none());
    }

    #[test]
    fn test_get_by_ids_skips_missing() {
        let db = create_test_db();
        db.get_or_create_collection("c").unwrap();
        db.add("c", "1", "one", &[0.1; 384], &Map::new()).unwrap();

        let found = db.get("c", Some(&ids(&["1", "nope"])), None).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "1");
    }

    #[test]
    fn test_get_with_filter() {
        let db = create_test_db();
        db.get_or_create_collection("c").unwrap();
        db.add("c", "1", "a", &[0.1; 384], &meta(json!({"tag_x": true})))
            .unwrap();
        db.add("c", "2", "b", &[0.1; 384], &Map::new()).unwrap();

        let filter = MetadataFilter::eq("tag_x", true);
        let found = db.get("c", None, Some(&filter)).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "1");
    }

    #[test]
    fn test_collections_are_isolated() {
        let db = create_test_db();
        db.get_or_create_collection("a").unwrap();
        db.get_or_create_collection("b").unwrap();
        db.add("a", "1", "in a", &[0.1; 384], &Map::new()).unwrap();

        assert!(db.get("b", None, None).unwrap().is_empty());
        assert_eq!(db.delete("b", &ids(&["1"])).unwrap(), 0);
        assert_eq!(db.count("a").unwrap(), 1);
    }

    #[test]
    fn test_delete_ids() {
        let db = create_test_db();
        db.get_or_create_collection("c").unwrap();
        db.add("c", "1", "one", &[0.1; 384], &Map::new()).unwrap();
        db.add("c", "2", "two", &[0.1; 384], &Map::new()).unwrap();

        assert_eq!(db.delete("c", &ids(&["1", "3"])).unwrap(), 1);
        assert_eq!(db.count("c").unwrap(), 1);
    }

    #[test]
    fn test_delete_collection_returns_ids() {
        let db = create_test_db();
        db.get_or_create_collection("c").unwrap();
        db.add("c", "1", "one", &[0.1; 384], &Map::new()).unwrap();
        db.add("c", "2", "two", &[0.1; 384], &Map::new()).unwrap();

        let removed = db.delete_collection("c").unwrap();
        assert_eq!(removed, Some(ids(&["1", "2"])));
        assert!(!db.collection_exists("c").unwrap());
        assert_eq!(db.count("c").unwrap(), 0);
    }

    #[test]
    fn test_delete_missing_collection() {
        let db = create_test_db();
        assert_eq!(db.delete_collection("nope").unwrap(), None);
    }

    #[test]
    fn test_corrupt_metadata_is_reported() {
        let db = create_test_db();
        db.get_or_create_collection("c").unwrap();
        db.add("c", "1", "one", &[0.1; 384], &Map::new()).unwrap();
        db.conn()
            .execute("UPDATE items SET metadata = 'not json' WHERE id = '1'", [])
            .unwrap();

        let result = db.get("c", None, None);
        assert!(matches!(result, Err(Error::CorruptMetadata { .. })));
    }

    #[test]
    fn test_database_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.db");
        {
            let db = Database::open(&path).unwrap();
            db.get_or_create_collection("c").unwrap();
            db.add("c", "1", "persistent", &[0.1; 384], &Map::new())
                .unwrap();
        }
        let db = Database::open(&path).unwrap();
        let items = db.get("c", None, None).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].document, "persistent");
    }
}
