//! Tag encoding into item metadata.
//!
//! Each memory stores its tags twice: a sorted, comma-joined `tags` string
//! used to rebuild the list, and one `tag_<name>: true` flag per tag so the
//! namespace can filter on membership with plain equality predicates.
//! Tags containing commas cannot round-trip and are rejected.

use serde_json::{Map, Value};

use crate::errors::Error;
use crate::sqlite::MetadataFilter;

/// Prefix of the per-tag membership flag keys.
pub const TAG_PREFIX: &str = "tag_";

/// Metadata key holding the comma-joined tag list.
pub const TAGS_KEY: &str = "tags";

/// Sort and deduplicate tags into their canonical display order.
pub fn canonical_tags(tags: &[String]) -> Vec<String> {
    let mut tags = tags.to_vec();
    tags.sort();
    tags.dedup();
    tags
}

/// Reject tags that cannot be encoded losslessly.
pub fn validate_tags(tags: &[String]) -> Result<(), Error> {
    for tag in tags {
        if tag.trim().is_empty() {
            return Err(Error::InvalidInput("tags cannot be empty".to_string()));
        }
        if tag.contains(',') {
            return Err(Error::InvalidInput(format!(
                "tag '{tag}' contains a comma, which is not supported"
            )));
        }
    }
    Ok(())
}

/// Encode a tag set as metadata fields.
pub fn tags_to_metadata(tags: &[String]) -> Map<String, Value> {
    let canonical = canonical_tags(tags);
    let mut meta = Map::new();
    meta.insert(TAGS_KEY.to_string(), Value::String(canonical.join(",")));
    for tag in &canonical {
        meta.insert(format!("{TAG_PREFIX}{tag}"), Value::Bool(true));
    }
    meta
}

/// Decode the tag list from metadata; absent or empty yields no tags.
pub fn metadata_to_tags(metadata: &Map<String, Value>) -> Vec<String> {
    match metadata.get(TAGS_KEY).and_then(Value::as_str) {
        Some(joined) if !joined.is_empty() => joined.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    }
}

/// Build the conjunctive membership filter for a tag list.
///
/// Returns `None` when no tags are given.
pub fn build_tag_filter(tags: &[String]) -> Option<MetadataFilter> {
    match tags {
        [] => None,
        [tag] => Some(MetadataFilter::eq(format!("{TAG_PREFIX}{tag}"), true)),
        _ => Some(MetadataFilter::And(
            tags.iter()
                .map(|t| MetadataFilter::eq(format!("{TAG_PREFIX}{t}"), true))
                .collect(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_tags_to_metadata_sorts_and_flags() {
        let meta = tags_to_metadata(&strings(&["b", "a"]));
        assert_eq!(meta.get("tags"), Some(&Value::String("a,b".to_string())));
        assert_eq!(meta.get("tag_a"), Some(&Value::Bool(true)));
        assert_eq!(meta.get("tag_b"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_round_trip_uses_canonical_order() {
        let meta = tags_to_metadata(&strings(&["rust", "lang", "rust"]));
        assert_eq!(metadata_to_tags(&meta), strings(&["lang", "rust"]));
    }

    #[test]
    fn test_empty_tags_decode_to_empty_list() {
        let meta = tags_to_metadata(&[]);
        assert_eq!(meta.get("tags"), Some(&Value::String(String::new())));
        assert!(metadata_to_tags(&meta).is_empty());
        assert!(metadata_to_tags(&Map::new()).is_empty());
    }

    #[test]
    fn test_build_tag_filter_shapes() {
        assert!(build_tag_filter(&[]).is_none());
        assert_eq!(
            build_tag_filter(&strings(&["x"])),
            Some(MetadataFilter::eq("tag_x", true))
        );
        match build_tag_filter(&strings(&["x", "y"])) {
            Some(MetadataFilter::And(parts)) => assert_eq!(parts.len(), 2),
            other => panic!("expected conjunction, got {other:?}"),
        }
    }

    #[test]
    fn test_filter_matches_encoded_metadata() {
        let meta = tags_to_metadata(&strings(&["lang", "python"]));
        let filter = build_tag_filter(&strings(&["python", "lang"])).unwrap();
        assert!(filter.matches(&meta));
        let filter = build_tag_filter(&strings(&["python", "rust"])).unwrap();
        assert!(!filter.matches(&meta));
    }

    #[test]
    fn test_validate_tags_rejects_commas_and_blanks() {
        assert!(validate_tags(&strings(&["ok", "fine"])).is_ok());
        assert!(matches!(
            validate_tags(&strings(&["a,b"])),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            validate_tags(&strings(&["  "])),
            Err(Error::InvalidInput(_))
        ));
    }
}
