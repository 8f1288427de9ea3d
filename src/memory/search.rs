//! Similarity recall across project namespaces.

use crate::errors::Error;
use crate::memory_types::RecallResult;
use crate::tags;

use super::store::{MemoryStore, memory_from_item, validate_limit};

/// Convert a cosine distance in [0, 2] into a relevance score (higher is better).
pub fn relevance_score(distance: f64) -> f64 {
    1.0 - distance / 2.0
}

impl MemoryStore {
    #[must_use = "handle the error or results may be lost"]
    /// Recall memories by semantic similarity to `query`.
    ///
    /// Searches one project's namespace, or every namespace when `project`
    /// is `None`. Each namespace contributes its own top `n_results`
    /// candidates carrying all of `tags`; candidates below `min_relevance`
    /// are dropped. The merged pool is sorted by relevance (highest first)
    /// and truncated to `n_results`.
    ///
    /// Ties in relevance have no defined order.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Query is empty or exceeds 100,000 characters
    /// - `n_results` is 0 or above `MAX_SEARCH_LIMIT`
    /// - `min_relevance` is NaN or infinite
    /// - Embedding generation or any namespace query fails
    pub fn recall(
        &mut self,
        query: &str,
        project: Option<&str>,
        tags: &[String],
        n_results: usize,
        min_relevance: Option<f64>,
    ) -> Result<Vec<RecallResult>, Error> {
        let query = query.trim();
        Self::validate_input_length(query)?;
        validate_limit(n_results)?;
        if min_relevance.is_some_and(|r| !r.is_finite()) {
            return Err(Error::InvalidInput(
                "min_relevance must be a finite number".to_string(),
            ));
        }

        let targets = self.targets(project)?;
        if targets.is_empty() {
            return Ok(Vec::new());
        }

        let filter = tags::build_tag_filter(tags);
        let embedding = self.embedder.embed(query)?;
        let mut pool = Vec::new();

        for target in targets {
            let size = self.db.count(&target.collection)?;
            if size == 0 {
                continue;
            }

            let candidates = self.db.query(
                &target.collection,
                &embedding,
                n_results.min(size),
                filter.as_ref(),
            )?;
            tracing::debug!(
                collection = %target.collection,
                candidates = candidates.len(),
                "queried namespace"
            );

            for item in candidates {
                let distance = item.distance.unwrap_or(2.0);
                let score = relevance_score(distance);
                if min_relevance.is_some_and(|min| score < min) {
                    continue;
                }
                pool.push(RecallResult {
                    memory: memory_from_item(item)?,
                    relevance_score: score,
                    distance,
                });
            }
        }

        pool.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
        pool.truncate(n_results);
        Ok(pool)
    }
}
