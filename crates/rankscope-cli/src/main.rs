//! Rankscope CLI - compare SRPR and BPR recommendations from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Offline model comparison
//! rankscope metrics
//! rankscope metrics --json
//!
//! # One query, both model families
//! rankscope query --user 1 -k 10
//! rankscope query --user 1 --tab bpr --no-enrich
//!
//! # Point at another backend
//! rankscope --backend http://recommender:8080 query --user 1
//! ```

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rankscope_core::config::DEFAULT_K;
use rankscope_core::metrics::global_metrics;
use rankscope_core::types::ModelFamily;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Rankscope recommendation comparison CLI.
///
/// Talks to the same recommender backend and movie catalog as the Rankscope
/// dashboard. Environment variables (`RANKSCOPE_*`) are read first and the
/// flags below override them.
#[derive(Parser)]
#[command(name = "rankscope", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Recommender backend base URL
    #[arg(long, global = true)]
    backend: Option<String>,

    /// Movie catalog API key
    #[arg(long, global = true)]
    catalog_key: Option<String>,

    /// Catalog locale for titles, e.g. es-ES
    #[arg(long, global = true)]
    language: Option<String>,

    /// Output results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Show the precomputed offline metrics for every model
    Metrics,

    /// Run one recommendation query
    Query {
        /// User id to recommend for
        #[arg(short, long)]
        user: String,

        /// Number of recommendations per list
        #[arg(short, default_value_t = DEFAULT_K)]
        k: usize,

        /// Only show one model family (srpr or bpr)
        #[arg(long)]
        tab: Option<ModelFamily>,

        /// Skip catalog lookups and print bare item ids
        #[arg(long)]
        no_enrich: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so --json output stays parseable
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = config::resolve(&config::Overrides {
        backend: cli.backend.clone(),
        catalog_key: cli.catalog_key.clone(),
        language: cli.language.clone(),
    })?;
    let backend = commands::backend_client(&config)?;

    let output = match &cli.command {
        Command::Metrics => {
            let records = commands::offline_metrics(backend, &config).await?;
            if cli.json {
                output::format_metrics_json(&records)
            } else {
                output::format_metrics_human(&records)
            }
        }
        Command::Query {
            user,
            k,
            tab,
            no_enrich,
        } => {
            let families = match tab {
                Some(family) => vec![*family],
                None => ModelFamily::ALL.to_vec(),
            };
            let mut report = commands::query(backend, &config, user, *k, &families).await?;
            if !no_enrich {
                let catalog = commands::catalog_client(&config)?;
                commands::enrich(catalog.as_ref(), &mut report).await;
            }
            if cli.json {
                output::format_query_json(&report)
            } else {
                output::format_query_human(&report)
            }
        }
    };

    println!("{}", output);
    log_request_metrics();
    Ok(())
}

/// Logs latency statistics for the requests made by this run.
fn log_request_metrics() {
    let snapshot = global_metrics().snapshot();
    for (name, stats) in [
        ("offline metrics", &snapshot.offline_metrics),
        ("query", &snapshot.query),
        ("catalog", &snapshot.catalog),
    ] {
        if stats.total == 0 {
            continue;
        }
        info!(
            "{} requests: {} total, {} failed, avg {:.1} ms",
            name,
            stats.total,
            stats.failures,
            stats.avg_ms.unwrap_or(0.0)
        );
    }
}
