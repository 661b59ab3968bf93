//! CLI binary for omnisearch.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use omni_search::{CancellationToken, Pipeline};
use omnisearch::AppConfig;

/// Omnisearch: search one engine across several result pages and print
/// the ranked results as JSON.
#[derive(Parser)]
#[command(name = "omnisearch", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, env = "OMNISEARCH_CONFIG")]
    config: Option<PathBuf>,

    /// Engine id: duckduckgo, google, brave or startpage.
    #[arg(short, long)]
    engine: Option<String>,

    /// Number of result pages to read.
    #[arg(short, long)]
    pages: Option<usize>,

    /// Search terms.
    #[arg(required = true, num_args = 1..)]
    query: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    omnisearch::logging::init(&config.logging);
    tracing::debug!(path = ?cli.config, "configuration loaded");

    let mut search_config = config.search.to_search_config();
    if cli.pages.is_some() {
        search_config.pages = cli.pages;
    }
    let engine = cli.engine.unwrap_or_else(|| config.search.engine.clone());
    let pipeline = Pipeline::from_config(search_config)?;

    // Ctrl-C stops paging; whatever was gathered is still printed.
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupted, finishing with partial results");
            on_signal.cancel();
        }
    });

    let query = cli.query.join(" ");
    let response = pipeline.search_with_cancel(&query, &engine, &cancel).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(if response.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
