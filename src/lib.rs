//! Clinical note summarisation: entity extraction, template-guided prompts and
//! a local model runtime, tied together by a fixed three-stage pipeline.

pub mod api;
pub mod cli;
pub mod config;
pub mod logging;
pub mod nlp;
pub mod pipeline;
pub mod summarize;
pub mod templates;

pub use pipeline::{run_flow, FlowOutput, Pipeline, PipelineError};
