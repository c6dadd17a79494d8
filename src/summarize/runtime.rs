//! HTTP client for the local model runtime (`/api/generate`).

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::RuntimeConfig;

/// Text handed back in place of a summary when the runtime cannot be reached.
pub const FALLBACK_SUMMARY: &str =
    "Unable to contact local model runtime. Please verify the Ollama service is running.";

/// Upper bound on a single generate call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Outcome of one generate call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    Completed(String),
    /// The runtime was unreachable or answered with an error.
    Degraded { reason: String },
}

impl Generation {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    /// Text shown to callers; degraded calls read as [`FALLBACK_SUMMARY`].
    pub fn text(&self) -> &str {
        match self {
            Self::Completed(text) => text,
            Self::Degraded { .. } => FALLBACK_SUMMARY,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Completed(text) => text,
            Self::Degraded { .. } => FALLBACK_SUMMARY.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Non-streaming client bound to one runtime endpoint and model.
#[derive(Debug, Clone)]
pub struct RuntimeClient {
    http: Client,
    config: RuntimeConfig,
}

impl RuntimeClient {
    pub fn new(config: RuntimeConfig) -> Result<Self, reqwest::Error> {
        Self::with_timeout(config, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(config: RuntimeConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent(concat!("medsum/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Send `prompt` to the runtime once. Transport failures never surface as errors.
    pub async fn generate(&self, prompt: &str) -> Generation {
        let url = self.config.generate_url();
        debug!(%url, model = %self.config.model, chars = prompt.len(), "calling model runtime");
        match self.request(&url, prompt).await {
            Ok(body) => Generation::Completed(pick_text(&body)),
            Err(err) => {
                warn!(%url, error = %err, "runtime call failed");
                Generation::Degraded {
                    reason: err.to_string(),
                }
            }
        }
    }

    async fn request(&self, url: &str, prompt: &str) -> Result<Value, reqwest::Error> {
        let payload = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
        };
        self.http
            .post(url)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await
    }
}

/// `response` when present and non-empty, else `summary`, else empty.
fn pick_text(body: &Value) -> String {
    let field = |key: &str| body.get(key).and_then(Value::as_str).filter(|s| !s.is_empty());
    field("response")
        .or_else(|| field("summary"))
        .unwrap_or_default()
        .to_string()
}
