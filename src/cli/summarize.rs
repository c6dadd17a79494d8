//! CLI entry-point for summarising a single note.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tokio::io::AsyncReadExt;
use tracing::{info, instrument, warn};

use crate::{config::Settings, pipeline};

/// Args for the `summarize` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Template guiding the summary sections.
    #[arg(long, default_value = "default")]
    pub template: String,
    /// Note to summarise; read from stdin when omitted.
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// Print the full `{summary, ner}` document instead of the summary text.
    #[arg(long)]
    pub json: bool,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let text = match &args.file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("reading note from stdin")?;
            buf
        }
    };

    let output = pipeline::run_flow(&settings, &text, &args.template).await?;
    if let Some(reason) = &output.degraded {
        warn!(%reason, "model runtime unavailable; summary is a placeholder");
    }
    info!(
        entities = output.ner.entities.len(),
        sections = output.ner.sections.len(),
        "generated summary"
    );
    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", output.summary);
    }
    Ok(())
}
