mod ingest;
mod report;
mod workspace;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::workspace::Workspace;

#[derive(Debug, Parser)]
#[command(name = "geolens")]
#[command(about = "Brand visibility analytics for AI assistant answers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Share of voice, trend, gaps, actions and sentiment
    Dashboard {
        /// Project slug or id
        #[arg(long)]
        project: String,
    },
    /// Per-query performance across every run
    Performance {
        #[arg(long)]
        project: String,
    },
    /// Run-by-run history of a single query
    Trend {
        #[arg(long)]
        project: String,
        /// Exact query text
        #[arg(long)]
        query: String,
    },
    /// Untracked queries worth monitoring
    Suggest {
        #[arg(long)]
        project: String,
        /// JSON array of pre-generated query ideas
        #[arg(long)]
        ideas: Option<PathBuf>,
    },
    /// Record a run from a JSON array of query outcomes
    Ingest {
        #[arg(long)]
        project: String,
        #[arg(long)]
        outcomes: PathBuf,
        /// Run timestamp (RFC 3339); defaults to now
        #[arg(long, value_parser = parse_run_at)]
        run_at: Option<DateTime<Utc>>,
    },
    /// List configured projects
    Projects,
}

fn main() -> anyhow::Result<()> {
    let config = geolens_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(env = %config.env, "loaded configuration");

    let cli = Cli::parse();
    let mut workspace = Workspace::load(&config)?;

    match cli.command {
        Commands::Dashboard { project } => {
            let project = workspace.project(&project)?;
            print_json(&report::dashboard(&project, workspace.history())?)
        }
        Commands::Performance { project } => {
            let project = workspace.project(&project)?;
            print_json(&report::performance(&project, workspace.history())?)
        }
        Commands::Trend { project, query } => {
            let project = workspace.project(&project)?;
            print_json(&report::trend(&project, workspace.history(), &query)?)
        }
        Commands::Suggest { project, ideas } => {
            let project = workspace.project(&project)?;
            print_json(&report::suggest(
                &project,
                workspace.history(),
                ideas.as_deref(),
            )?)
        }
        Commands::Ingest {
            project,
            outcomes,
            run_at,
        } => {
            let project = workspace.project(&project)?;
            let outcomes = ingest::read_outcomes(&outcomes)?;
            let receipt = ingest::record(
                &project,
                workspace.history_mut(),
                outcomes,
                run_at.unwrap_or_else(Utc::now),
            )?;
            workspace.save()?;
            print_json(&receipt)
        }
        Commands::Projects => print_json(&workspace.project_list()),
    }
}

fn parse_run_at(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC 3339 timestamp '{raw}': {e}"))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests;
