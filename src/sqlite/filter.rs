//! Equality predicates over item metadata.

use serde_json::{Map, Value};

/// A metadata predicate evaluated against each stored item.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataFilter {
    /// Metadata field `key` must exist and equal `value`.
    Eq { key: String, value: Value },
    /// Every inner predicate must hold.
    And(Vec<MetadataFilter>),
}

impl MetadataFilter {
    /// Equality predicate on a single field.
    pub fn eq(key: impl Into<String>, value: impl Into<Value>) -> Self {
        MetadataFilter::Eq {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Check whether the metadata object satisfies this predicate.
    pub fn matches(&self, metadata: &Map<String, Value>) -> bool {
        match self {
            MetadataFilter::Eq { key, value } => metadata.get(key) == Some(value),
            MetadataFilter::And(filters) => filters.iter().all(|f| f.matches(metadata)),
        }
    }
}

/// Apply an optional filter; `None` matches everything.
pub(crate) fn passes(filter: Option<&MetadataFilter>, metadata: &Map<String, Value>) -> bool {
    filter.is_none_or(|f| f.matches(metadata))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meta(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_eq_matches_present_field() {
        let m = meta(json!({"tag_rust": true, "project": "dev"}));
        assert!(MetadataFilter::eq("tag_rust", true).matches(&m));
        assert!(MetadataFilter::eq("project", "dev").matches(&m));
    }

    #[test]
    fn test_eq_rejects_missing_or_different() {
        let m = meta(json!({"tag_rust": true}));
        assert!(!MetadataFilter::eq("tag_python", true).matches(&m));
        assert!(!MetadataFilter::eq("tag_rust", false).matches(&m));
    }

    #[test]
    fn test_and_requires_all() {
        let m = meta(json!({"tag_a": true, "tag_b": true}));
        let both = MetadataFilter::And(vec![
            MetadataFilter::eq("tag_a", true),
            MetadataFilter::eq("tag_b", true),
        ]);
        let with_c = MetadataFilter::And(vec![
            MetadataFilter::eq("tag_a", true),
            MetadataFilter::eq("tag_c", true),
        ]);
        assert!(both.matches(&m));
        assert!(!with_c.matches(&m));
    }

    #[test]
    fn test_passes_without_filter() {
        assert!(passes(None, &Map::new()));
    }
}
