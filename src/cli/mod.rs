//! Command-line interface wiring for medsum.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Settings;

pub mod serve;
pub mod summarize;
pub mod template;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Clinical note summarisation assistant", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Serve(args) => serve::run(args, settings).await,
            Commands::Summarize(args) => summarize::run(args, settings).await,
            Commands::Template(args) => template::run(args, settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Serve the JSON API.
    Serve(serve::Args),
    /// Summarise a note read from a file or stdin.
    Summarize(summarize::Args),
    /// Inspect or store summary templates.
    Template(template::Args),
}
