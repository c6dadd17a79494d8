//! CLI entry-points for template inspection and storage.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Subcommand};
use tracing::{info, instrument};

use crate::{config::Settings, templates::TemplateStore};

/// Args for the `template` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    #[command(subcommand)]
    pub action: Action,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Action {
    /// Print a stored template as YAML.
    Show { name: String },
    /// Validate and store a YAML or JSON template document.
    Save {
        name: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// List stored template names.
    List,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let store = TemplateStore::new(&settings.template_dir);
    match args.action {
        Action::Show { name } => {
            let doc = store.load_value(&name).await?;
            print!("{}", serde_yaml::to_string(&doc)?);
        }
        Action::Save { name, file } => {
            let raw = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            // JSON parses as YAML
            let data: serde_yaml::Value = serde_yaml::from_str(&raw)
                .with_context(|| format!("parsing {}", file.display()))?;
            let path = store.save(&name, &data).await?;
            info!(path = %path.display(), "template stored");
            println!("{}", path.display());
        }
        Action::List => {
            for name in store.list().await? {
                println!("{name}");
            }
        }
    }
    Ok(())
}
