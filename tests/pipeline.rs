mod common;

use std::{fs, sync::Arc};

use axum::http::StatusCode;
use medsum::{
    config::{ConfigError, Settings},
    nlp::{ner::LexiconNer, EntityExtractor},
    summarize::FALLBACK_SUMMARY,
    templates::TemplateStore,
    Pipeline, PipelineError,
};
use serde_json::json;

const DEFAULT_TEMPLATE: &str = "template:
  sections:
  - name: Chief Complaint
    ai_instruction: Summarize presenting complaint
";

fn setup(endpoint: Option<&str>) -> (tempfile::TempDir, Pipeline) {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::rooted_at(dir.path());
    fs::create_dir_all(&settings.template_dir).unwrap();
    fs::write(settings.template_dir.join("default.yaml"), DEFAULT_TEMPLATE).unwrap();
    if let Some(endpoint) = endpoint {
        fs::create_dir_all(settings.runtime_config.parent().unwrap()).unwrap();
        fs::write(
            &settings.runtime_config,
            json!({ "endpoint": endpoint }).to_string(),
        )
        .unwrap();
    }
    let model = LexiconNer::from_terms(vec![("chest pain", Some("SYMPTOM"))]).unwrap();
    let pipeline = Pipeline::from_parts(
        EntityExtractor::with_model(Arc::new(model)),
        TemplateStore::new(&settings.template_dir),
        &settings.runtime_config,
    );
    (dir, pipeline)
}

#[tokio::test]
async fn end_to_end_summary_with_entities() {
    let (endpoint, seen) =
        common::spawn_runtime(StatusCode::OK, json!({"response": "Chest pain noted."})).await;
    let (_dir, pipeline) = setup(Some(&endpoint));

    let output = pipeline
        .run("Patient reports chest pain.", "default")
        .await
        .unwrap();

    assert_eq!(output.summary, "Chest pain noted.");
    assert!(output.degraded.is_none());
    assert_eq!(output.ner.sections.len(), 1);
    assert_eq!(output.ner.sections[0].id, 0);
    assert_eq!(output.ner.sections[0].content, "Patient reports chest pain.");
    assert_eq!(output.ner.entities.len(), 1);
    assert_eq!(output.ner.entities[0].label, "SYMPTOM");

    let seen = seen.lock().unwrap();
    let prompt = seen[0]["prompt"].as_str().unwrap();
    assert!(prompt.contains("Patient reports chest pain."));
    assert!(prompt.contains("### Chief Complaint\nSummarize presenting complaint"));
    assert_eq!(seen[0]["model"], "gemma:2b");
}

#[tokio::test]
async fn empty_text_yields_runtime_output_and_no_sections() {
    let (endpoint, _) = common::spawn_runtime(StatusCode::OK, json!({"response": ""})).await;
    let (_dir, pipeline) = setup(Some(&endpoint));

    let output = pipeline.run("", "default").await.unwrap();
    assert_eq!(output.summary, "");
    assert!(output.ner.sections.is_empty());
    assert!(output.ner.entities.is_empty());
}

#[tokio::test]
async fn unreachable_runtime_degrades_instead_of_failing() {
    let endpoint = common::unreachable_endpoint();
    let (_dir, pipeline) = setup(Some(&endpoint));

    let output = pipeline.run("Chest pain.", "default").await.unwrap();
    assert_eq!(output.summary, FALLBACK_SUMMARY);
    assert!(output.degraded.is_some());
    assert_eq!(output.ner.sections.len(), 1);
}

#[tokio::test]
async fn missing_runtime_config_aborts() {
    let (_dir, pipeline) = setup(None);
    let err = pipeline.run("Chest pain.", "default").await.unwrap_err();
    assert!(matches!(err, PipelineError::Config(ConfigError::Missing(_))));
}

#[tokio::test]
async fn unknown_template_aborts_before_runtime_call() {
    let (endpoint, seen) =
        common::spawn_runtime(StatusCode::OK, json!({"response": "unused"})).await;
    let (_dir, pipeline) = setup(Some(&endpoint));
    let err = pipeline.run("Chest pain.", "missing").await.unwrap_err();
    assert!(matches!(err, PipelineError::Template(_)));
    assert!(seen.lock().unwrap().is_empty());
}
