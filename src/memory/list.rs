//! Paginated browsing across project namespaces.

use crate::errors::Error;
use crate::memory_types::MemoryPage;
use crate::tags;

use super::store::{MemoryStore, memory_from_item};

impl MemoryStore {
    #[must_use = "handle the error or results may be lost"]
    /// List memories newest first, one page at a time.
    ///
    /// Gathers every memory of one project (or of all namespaces) carrying
    /// all of `tags`, sorts by timestamp descending and returns the 1-based
    /// `page`. `total` is the size of the merged set. `project_counts`
    /// holds how many memories each namespace contributed: its full size
    /// without a tag filter, the matching count with one.
    ///
    /// # Errors
    ///
    /// Returns error if `page` or `page_size` is 0, or a namespace read fails.
    pub fn list_memories(
        &self,
        project: Option<&str>,
        tags: &[String],
        page: usize,
        page_size: usize,
    ) -> Result<MemoryPage, Error> {
        if page == 0 {
            return Err(Error::InvalidPagination("page must be >= 1".to_string()));
        }
        if page_size == 0 {
            return Err(Error::InvalidPagination(
                "page_size must be >= 1".to_string(),
            ));
        }

        let filter = tags::build_tag_filter(tags);
        let mut result = MemoryPage::default();
        let mut all = Vec::new();

        for target in self.targets(project)? {
            let items = self.db.get(&target.collection, None, filter.as_ref())?;
            result.project_counts.insert(target.label, items.len());
            for item in items {
                all.push(memory_from_item(item)?);
            }
        }

        // Fixed-width RFC 3339 strings sort chronologically.
        all.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        result.total = all.len();
        let start = (page - 1).saturating_mul(page_size);
        result.memories = all.into_iter().skip(start).take(page_size).collect();
        Ok(result)
    }
}
