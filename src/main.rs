use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use docsum::{
    completion::get_completion_client,
    config::Config,
    logging,
    pipeline::{Summarizer, SummarizerOptions},
};

/// Summarize a text document through a local completion provider.
#[derive(Debug, Parser)]
#[command(name = "docsum", version, about)]
struct Cli {
    /// Path to the UTF-8 text document to summarize.
    document: PathBuf,

    /// Summarization mode. `auto` uses stuffing when the document fits in a
    /// single window and map-reduce otherwise.
    #[arg(long, value_enum, default_value = "auto")]
    mode: Mode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Auto,
    Stuff,
    MapReduce,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing();
    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    let client = get_completion_client(&config);
    let summarizer = Summarizer::new(Arc::from(client), SummarizerOptions::from_config(&config))
        .context("Invalid window configuration")?;

    let document = std::fs::read_to_string(&cli.document)
        .with_context(|| format!("Failed to read document {}", cli.document.display()))?;
    tracing::info!(
        path = %cli.document.display(),
        chars = document.chars().count(),
        "Read document"
    );

    let start = Instant::now();
    let outcome = match cli.mode {
        Mode::Stuff => summarizer.stuff(&document).await?,
        Mode::MapReduce => summarizer.map_reduce(&document).await?,
        Mode::Auto => {
            if summarizer.fits_single_window(&document) {
                summarizer.stuff(&document).await?
            } else {
                summarizer.map_reduce(&document).await?
            }
        }
    };
    let elapsed = start.elapsed();

    println!("{}", outcome.summary);
    tracing::info!(
        chunks = outcome.chunk_count,
        completion_calls = outcome.completion_calls,
        elapsed_ms = elapsed.as_millis() as u64,
        "Summarization finished"
    );

    Ok(())
}
