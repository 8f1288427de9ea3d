mod commands;
mod output;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mcp_memory::errors::Error;
use mcp_memory::{Config, MemoryStore};

use commands::Commands;
use output::{ErrorResponse, print_json};

/// mcp-memory - persistent, project-scoped semantic memory
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Log to stderr so stdout stays parseable; `RUST_LOG` overrides the level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<ExitCode, Error> {
    if let Commands::Version = cli.command {
        return commands::handle_version(cli.json);
    }

    let config = Config::load()?;
    let mut store = MemoryStore::new(&config)?;
    commands::execute(&cli.command, &mut store, &config, cli.json)
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            if !e.is_caller_error() {
                tracing::error!(error = %e, "command failed");
            }
            if cli.json {
                print_json(&ErrorResponse {
                    error: e.to_string(),
                });
            } else {
                eprintln!("Error: {}", e);
            }
            ExitCode::FAILURE
        }
    }
}
