//! Offline counterfactual generation pipeline.
//!
//! Reads a JSON journal dataset, generates counterfactuals per entry through
//! the completion service, reconciles them back onto the originating rows,
//! and writes the updated dataset as CSV.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use counterfactual_api::batch::dataset::{read_input, write_csv};
use counterfactual_api::batch::runner::{run_batch, BatchOptions};
use counterfactual_api::config::Config;
use counterfactual_api::llm_client::{LlmClient, MODEL};

#[derive(Debug, Parser)]
#[command(name = "batch", about = "Offline counterfactual generation pipeline", version)]
struct Args {
    /// Input dataset: a JSON array of journal records
    #[arg(long)]
    input: PathBuf,

    /// Output dataset: CSV with per-phase counterfactual columns
    #[arg(long)]
    output: PathBuf,

    /// Process every Nth journal entry (token-saving knob)
    #[arg(long, default_value_t = 1)]
    stride: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // The batch pipeline writes datasets; mock output must never land there.
    let Some(api_key) = config.anthropic_api_key else {
        bail!("ANTHROPIC_API_KEY must be set for the batch pipeline");
    };
    let llm = LlmClient::new(api_key);
    info!("LLM client initialized (model: {MODEL})");

    let records = read_input(&args.input)?;
    info!(
        "loaded {} journal records from {}",
        records.len(),
        args.input.display()
    );

    let options = BatchOptions {
        stride: args.stride,
    };
    let (rows, summary) = run_batch(&llm, &records, &options).await;

    write_csv(&args.output, &rows)?;

    info!(
        "batch complete: {} entries processed, {} empty entries skipped, \
        {} records generated, {} generation failures, {} appended, {} skipped at reconciliation",
        summary.entries_processed,
        summary.entries_skipped_empty,
        summary.records_generated,
        summary.generation_failures,
        summary.report.appended,
        summary.report.skip_count()
    );
    if summary.report.skip_count() > 0 {
        warn!(
            "reconciliation skips: {} mismatches, {} unknown phases",
            summary.report.mismatches(),
            summary.report.unknown_phases()
        );
    }

    info!("updated dataset written to {}", args.output.display());
    Ok(())
}
