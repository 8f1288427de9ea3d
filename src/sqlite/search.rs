//! Similarity queries within a single collection.

use super::filter::{self, MetadataFilter};
use super::{Database, Error, Item, embedding, parse_metadata};

pub type Result<T> = std::result::Result<T, Error>;

/// Largest `limit` a similarity query accepts.
pub const MAX_QUERY_LIMIT: usize = 10_000;

/// Validate a query limit is within acceptable bounds.
pub fn validate_limit(limit: usize) -> Result<()> {
    if limit == 0 {
        return Err(Error::InvalidLimit(
            "Limit must be greater than 0".to_string(),
        ));
    }
    if limit > MAX_QUERY_LIMIT {
        return Err(Error::InvalidLimit(format!(
            "Limit {} exceeds maximum allowed ({})",
            limit, MAX_QUERY_LIMIT
        )));
    }
    Ok(())
}

impl Database {
    /// Find the items nearest to `query_embedding` in one collection.
    ///
    /// Items failing `filter` are excluded before ranking. Results are sorted
    /// by ascending cosine distance and truncated to `limit`.
    ///
    /// # Errors
    ///
    /// Returns error if the limit is invalid, an embedding has the wrong
    /// dimensions, or the query fails.
    pub fn query(
        &self,
        name: &str,
        query_embedding: &[f32],
        limit: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<Item>> {
        validate_limit(limit)?;

        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, document, metadata, embedding
            FROM items
            WHERE collection = ?1
            "#,
        )?;

        let rows = stmt.query_map([name], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Vec<u8>>(3)?,
            ))
        })?;

        let mut items = Vec::new();
        for row in rows {
            let (id, document, raw, blob) = row?;
            let metadata = parse_metadata(&id, &raw)?;
            if !filter::passes(filter, &metadata) {
                continue;
            }
            let stored = embedding::blob_to_vec(&blob)?;
            let distance = embedding::cosine_distance(query_embedding, &stored)?;
            items.push(Item {
                id,
                document,
                metadata,
                distance: Some(distance),
            });
        }

        items.sort_by(|a, b| {
            a.distance
                .unwrap_or(f64::MAX)
                .total_cmp(&b.distance.unwrap_or(f64::MAX))
        });
        items.truncate(limit);
        Ok(items)
    }
}
