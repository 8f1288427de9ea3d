//! Text rendering and JSON response types for CLI output.

use std::collections::BTreeMap;

use serde::Serialize;

use mcp_memory::{ForgetResult, Memory, MemoryPage, RecallResult};

/// Response for a stored memory.
#[derive(Serialize)]
pub struct StoreResponse<'a> {
    pub status: &'static str,
    pub memory: &'a Memory,
}

/// Response for recall results.
#[derive(Serialize)]
pub struct RecallResponse<'a> {
    pub results: &'a [RecallResult],
}

/// Response for a list page.
#[derive(Serialize)]
pub struct ListResponse<'a> {
    pub memories: &'a [Memory],
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub projects: &'a BTreeMap<String, usize>,
}

/// Response for errors.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Print a value as formatted JSON to stdout.
pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize JSON: {}", e);
            std::process::exit(1);
        }
    }
}

fn tag_line(memory: &Memory) -> String {
    if memory.tags.is_empty() {
        String::new()
    } else {
        format!("  Tags: {}\n", memory.tags.join(", "))
    }
}

fn source_line(memory: &Memory) -> String {
    if memory.source.is_empty() {
        String::new()
    } else {
        format!("  Source: {}\n", memory.source)
    }
}

/// Confirmation for a newly stored memory.
pub fn format_stored(memory: &Memory) -> String {
    let tags = if memory.tags.is_empty() {
        String::new()
    } else {
        format!(" with tags [{}]", memory.tags.join(", "))
    };
    format!(
        "Stored memory {} in project '{}'{}\nImportance: {}/5\nTimestamp: {}",
        memory.id, memory.project, tags, memory.importance, memory.timestamp
    )
}

/// Ranked recall results, or a not-found notice.
pub fn format_recall(results: &[RecallResult]) -> String {
    if results.is_empty() {
        return "No memories found matching your query.".to_string();
    }

    let mut lines = vec![format!("Found {} matching memories:\n", results.len())];
    for (i, r) in results.iter().enumerate() {
        let m = &r.memory;
        lines.push(format!(
            "--- [{}] Relevance: {:.2} ---\n  ID: {}\n  Project: {}\n  Content: {}\n{}{}  Importance: {}/5\n  Stored: {}",
            i + 1,
            r.relevance_score,
            m.id,
            m.project,
            m.content,
            tag_line(m),
            source_line(m),
            m.importance,
            m.timestamp
        ));
    }
    lines.join("\n")
}

/// Summary of a forget call.
pub fn format_forget(result: &ForgetResult) -> String {
    if result.deleted_count == 0 {
        return "No memories matched the criteria.".to_string();
    }
    format!(
        "Deleted {} memories.\nIDs: {}",
        result.deleted_count,
        result.deleted_ids.join(", ")
    )
}

/// One page of listed memories with per-project counts.
pub fn format_list(page: &MemoryPage, page_number: usize, page_size: usize, project: Option<&str>) -> String {
    if page.total == 0 {
        return "No memories stored yet.".to_string();
    }

    let start = page_number
        .saturating_sub(1)
        .saturating_mul(page_size)
        .saturating_add(1);
    let end = start
        .saturating_add(page.memories.len())
        .saturating_sub(1)
        .min(page.total);
    let mut lines = vec![format!(
        "Showing {}-{} of {} memories (page {})\n",
        start, end, page.total, page_number
    )];

    if page.project_counts.len() > 1 || (page.project_counts.len() == 1 && project.is_none()) {
        let stats: Vec<String> = page
            .project_counts
            .iter()
            .map(|(name, count)| format!("{}: {}", name, count))
            .collect();
        lines.push(format!("Projects: {}\n", stats.join(", ")));
    }

    for m in &page.memories {
        lines.push(format!(
            "- {}\n  Content: {}\n  Project: {}\n{}{}  Importance: {}/5\n  Stored: {}",
            m.id,
            m.content,
            m.project,
            tag_line(m),
            source_line(m),
            m.importance,
            m.timestamp
        ));
    }
    lines.join("\n")
}
