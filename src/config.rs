//! Runtime configuration utilities for medsum.

use std::{
    env, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Model requested from the runtime when the config file names none.
pub const DEFAULT_MODEL: &str = "gemma:2b";

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Folder holding `<name>.yaml` template documents.
    pub template_dir: PathBuf,
    /// JSON file describing the model runtime endpoint.
    pub runtime_config: PathBuf,
    /// Clinical lexicon used by the entity extractor.
    pub ner_model_path: PathBuf,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let template_dir = env::var("TEMPLATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./templates"));
        let runtime_config = env::var("RUNTIME_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./config/runtime.json"));
        let ner_model_path = env::var("NER_MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./models/clinical_lexicon.json"));

        Ok(Self {
            template_dir,
            runtime_config,
            ner_model_path,
        })
    }

    /// Settings rooted at a single directory, laid out like the repository.
    pub fn rooted_at<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        Self {
            template_dir: root.join("templates"),
            runtime_config: root.join("config/runtime.json"),
            ner_model_path: root.join("models/clinical_lexicon.json"),
        }
    }
}

/// Failures while reading the runtime configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("runtime configuration missing at {}", .0.display())]
    Missing(PathBuf),
    #[error("runtime configuration at {} is invalid: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },
    #[error("reading runtime configuration: {0}")]
    Io(#[from] io::Error),
}

/// Location and model of the external inference service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RuntimeConfig {
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl RuntimeConfig {
    /// Read and validate the runtime config file.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        info!(path = %path.display(), "loading runtime configuration");
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(ConfigError::Missing(path.to_path_buf()))
            }
            Err(err) => return Err(err.into()),
        };
        let invalid = |reason: String| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason,
        };
        let value: serde_json::Value =
            serde_json::from_str(&raw).map_err(|e| invalid(e.to_string()))?;
        if !value.is_object() {
            return Err(invalid("expected a JSON object".into()));
        }
        serde_json::from_value(value).map_err(|e| invalid(e.to_string()))
    }

    /// `<endpoint>/api/generate` with any trailing slash on the endpoint removed.
    pub fn generate_url(&self) -> String {
        format!("{}/api/generate", self.endpoint.trim_end_matches('/'))
    }
}
