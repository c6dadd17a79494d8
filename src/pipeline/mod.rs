//! Three-stage summarisation flow: ner → template → summarize.
//!
//! Each stage takes the [`PipelineState`] by value and returns a new one with
//! only its own slots written. The topology lives in [`graph`] and is built
//! once per process; the [`Pipeline`] holding the NER model and runtime client
//! is likewise shared through [`Pipeline::global`].

pub mod graph;

use std::{path::PathBuf, sync::Arc};

use once_cell::sync::OnceCell;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::{
    config::{ConfigError, RuntimeConfig, Settings},
    nlp::{EntityExtractor, EntityResult, ModelError},
    summarize::{build_prompt, Generation, RuntimeClient},
    templates::{TemplateDoc, TemplateError, TemplateStore},
};

pub use graph::{FlowGraph, Stage};

/// Record threaded through the stages of one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineState {
    pub text: String,
    pub template_name: String,
    pub ner: EntityResult,
    pub template: TemplateDoc,
    pub summary: String,
    /// Why the runtime call fell back, when it did.
    pub degraded: Option<String>,
}

impl PipelineState {
    pub fn new(text: impl Into<String>, template_name: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            template_name: template_name.into(),
            ..Self::default()
        }
    }
}

/// Result handed back to callers, serialised as `{summary, ner}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowOutput {
    pub summary: String,
    pub ner: EntityResult,
    #[serde(skip)]
    pub degraded: Option<String>,
}

impl From<PipelineState> for FlowOutput {
    fn from(state: PipelineState) -> Self {
        Self {
            summary: state.summary,
            ner: state.ner,
            degraded: state.degraded,
        }
    }
}

/// Failures that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("building runtime client: {0}")]
    Client(#[from] reqwest::Error),
}

static PIPELINE: OnceCell<Arc<Pipeline>> = OnceCell::new();

/// Long-lived collaborators shared by every run.
pub struct Pipeline {
    extractor: EntityExtractor,
    templates: TemplateStore,
    runtime_config: PathBuf,
    runtime: OnceCell<RuntimeClient>,
}

impl Pipeline {
    pub fn new(settings: &Settings) -> Self {
        Self::from_parts(
            EntityExtractor::new(&settings.ner_model_path),
            TemplateStore::new(&settings.template_dir),
            settings.runtime_config.clone(),
        )
    }

    pub fn from_parts(
        extractor: EntityExtractor,
        templates: TemplateStore,
        runtime_config: impl Into<PathBuf>,
    ) -> Self {
        Self {
            extractor,
            templates,
            runtime_config: runtime_config.into(),
            runtime: OnceCell::new(),
        }
    }

    /// Process-wide pipeline, constructed from the first caller's settings.
    pub fn global(settings: &Settings) -> Arc<Pipeline> {
        let pipeline = PIPELINE.get_or_init(|| {
            info!("initialising shared pipeline");
            Arc::new(Pipeline::new(settings))
        });
        Arc::clone(pipeline)
    }

    pub fn templates(&self) -> &TemplateStore {
        &self.templates
    }

    /// Runtime client, reading the runtime config on first use.
    ///
    /// Concurrent first callers may each read the file, but only one client is
    /// ever stored. A missing or invalid config is not cached, so it is
    /// reported on every call.
    pub async fn runtime(&self) -> Result<&RuntimeClient, PipelineError> {
        if let Some(client) = self.runtime.get() {
            return Ok(client);
        }
        let config = RuntimeConfig::load(&self.runtime_config).await?;
        self.runtime.get_or_try_init(|| {
            let client = RuntimeClient::new(config)?;
            info!(
                endpoint = %client.config().endpoint,
                model = %client.config().model,
                "runtime configured"
            );
            Ok(client)
        })
    }

    /// Run every stage from the graph entry until `done`.
    #[instrument(skip(self, text), fields(chars = text.len()))]
    pub async fn run(
        &self,
        text: &str,
        template_name: &str,
    ) -> Result<FlowOutput, PipelineError> {
        info!("entering run_flow");
        let graph = FlowGraph::compiled();
        let mut state = PipelineState::new(text, template_name);
        let mut stage = graph.entry();
        while stage != Stage::Done {
            info!(%stage, "entering graph node");
            state = self.step(stage, state).await?;
            info!(%stage, "exiting graph node");
            stage = graph.next(stage);
        }
        info!("exiting run_flow");
        Ok(state.into())
    }

    async fn step(
        &self,
        stage: Stage,
        state: PipelineState,
    ) -> Result<PipelineState, PipelineError> {
        match stage {
            Stage::Ner => self.ner_stage(state),
            Stage::Template => self.template_stage(state).await,
            Stage::Summarize => self.summarize_stage(state).await,
            Stage::Done => Ok(state),
        }
    }

    /// Writes `ner`.
    pub fn ner_stage(&self, state: PipelineState) -> Result<PipelineState, PipelineError> {
        let ner = self.extractor.extract(&state.text)?;
        Ok(PipelineState { ner, ..state })
    }

    /// Writes `template`.
    pub async fn template_stage(
        &self,
        state: PipelineState,
    ) -> Result<PipelineState, PipelineError> {
        let template = self.templates.load(&state.template_name).await?;
        Ok(PipelineState { template, ..state })
    }

    /// Writes `summary` and `degraded`, re-emitting the entities from the ner stage.
    pub async fn summarize_stage(
        &self,
        state: PipelineState,
    ) -> Result<PipelineState, PipelineError> {
        let runtime = self.runtime().await?;
        let prompt = build_prompt(&state.text, &state.template);
        let generation = runtime.generate(&prompt).await;
        let degraded = match &generation {
            Generation::Degraded { reason } => {
                warn!(%reason, "summary degraded to fallback text");
                Some(reason.clone())
            }
            Generation::Completed(_) => None,
        };
        Ok(PipelineState {
            summary: generation.into_text(),
            degraded,
            ..state
        })
    }
}

/// Run the shared pipeline for `text` with the template called `template_name`.
pub async fn run_flow(
    settings: &Settings,
    text: &str,
    template_name: &str,
) -> Result<FlowOutput, PipelineError> {
    Pipeline::global(settings).run(text, template_name).await
}
