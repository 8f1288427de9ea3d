//! Command handlers for the mcp-memory CLI.

use std::process::ExitCode;

use mcp_memory::errors::Error;
use mcp_memory::{Config, ForgetRequest, MemoryStore, NewMemory};

use crate::output::*;

/// Commands supported by the mcp-memory CLI.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Store a memory for later recall
    Remember {
        /// The text content to remember
        content: String,

        /// Project scope (default: configured default project)
        #[arg(short, long)]
        project: Option<String>,

        /// Tag for filtering; repeat for several
        #[arg(short = 't', long = "tag")]
        tags: Vec<String>,

        /// Note about where this memory came from
        #[arg(short, long, default_value = "")]
        source: String,

        /// Priority 1-5, where 5 is most important
        #[arg(short, long, default_value = "3", allow_negative_numbers = true)]
        importance: i64,
    },
    /// Search memories by semantic similarity
    Recall {
        /// Natural language search query
        query: String,

        /// Limit search to one project (default: all projects)
        #[arg(short, long)]
        project: Option<String>,

        /// Only memories carrying every given tag
        #[arg(short = 't', long = "tag")]
        tags: Vec<String>,

        /// Maximum results (default: configured max results)
        #[arg(short = 'n', long)]
        n_results: Option<usize>,

        /// Minimum relevance score 0.0-1.0
        #[arg(long)]
        min_relevance: Option<f64>,
    },
    /// Delete memories by id, project or tags
    Forget {
        /// Memory id to delete; repeat for several
        #[arg(long = "id")]
        ids: Vec<String>,

        /// Delete every memory in this project
        #[arg(short, long)]
        project: Option<String>,

        /// Delete memories carrying every given tag
        #[arg(short = 't', long = "tag")]
        tags: Vec<String>,
    },
    /// Browse stored memories, newest first
    List {
        /// Only this project (default: all projects)
        #[arg(short, long)]
        project: Option<String>,

        /// Only memories carrying every given tag
        #[arg(short = 't', long = "tag")]
        tags: Vec<String>,

        /// Page number, starting at 1
        #[arg(long, default_value = "1")]
        page: usize,

        /// Results per page
        #[arg(long, default_value = "20")]
        page_size: usize,
    },
    Version,
}

/// Execute a CLI command.
pub fn execute(
    command: &Commands,
    store: &mut MemoryStore,
    config: &Config,
    json: bool,
) -> Result<ExitCode, Error> {
    match command {
        Commands::Remember {
            content,
            project,
            tags,
            source,
            importance,
        } => {
            let project = project
                .clone()
                .unwrap_or_else(|| config.default_project.clone());
            let new = NewMemory::new(content.clone(), project)
                .with_tags(tags.iter().cloned())
                .with_source(source.clone())
                .with_importance(*importance);
            handle_remember(store, new, json)
        }
        Commands::Recall {
            query,
            project,
            tags,
            n_results,
            min_relevance,
        } => {
            let n = n_results.unwrap_or(config.max_results);
            handle_recall(store, query, project.as_deref(), tags, n, *min_relevance, json)
        }
        Commands::Forget { ids, project, tags } => {
            let request = ForgetRequest::from_filters(
                Some(ids.clone()),
                project.clone(),
                Some(tags.clone()),
            )?;
            handle_forget(store, &request, json)
        }
        Commands::List {
            project,
            tags,
            page,
            page_size,
        } => handle_list(store, project.as_deref(), tags, *page, *page_size, json),
        Commands::Version => handle_version(json),
    }
}

fn handle_remember(store: &mut MemoryStore, new: NewMemory, json: bool) -> Result<ExitCode, Error> {
    let memory = store.store(new)?;
    if json {
        print_json(&StoreResponse {
            status: "stored",
            memory: &memory,
        });
    } else {
        println!("{}", format_stored(&memory));
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_recall(
    store: &mut MemoryStore,
    query: &str,
    project: Option<&str>,
    tags: &[String],
    n_results: usize,
    min_relevance: Option<f64>,
    json: bool,
) -> Result<ExitCode, Error> {
    let results = store.recall(query, project, tags, n_results, min_relevance)?;
    if json {
        print_json(&RecallResponse { results: &results });
    } else {
        println!("{}", format_recall(&results));
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_forget(
    store: &MemoryStore,
    request: &ForgetRequest,
    json: bool,
) -> Result<ExitCode, Error> {
    let result = store.forget(request)?;
    if json {
        print_json(&result);
    } else {
        println!("{}", format_forget(&result));
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_list(
    store: &MemoryStore,
    project: Option<&str>,
    tags: &[String],
    page: usize,
    page_size: usize,
    json: bool,
) -> Result<ExitCode, Error> {
    let result = store.list_memories(project, tags, page, page_size)?;
    if json {
        print_json(&ListResponse {
            memories: &result.memories,
            total: result.total,
            page,
            page_size,
            projects: &result.project_counts,
        });
    } else {
        println!("{}", format_list(&result, page, page_size, project));
    }
    Ok(ExitCode::SUCCESS)
}

pub fn handle_version(json: bool) -> Result<ExitCode, Error> {
    if json {
        print_json(&serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "name": env!("CARGO_PKG_NAME")
        }));
    } else {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    }
    Ok(ExitCode::SUCCESS)
}
