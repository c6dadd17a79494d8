mod common;

use std::time::Duration;

use axum::http::StatusCode;
use medsum::{
    config::RuntimeConfig,
    summarize::{Generation, RuntimeClient, FALLBACK_SUMMARY},
};
use serde_json::json;

fn client(endpoint: String) -> RuntimeClient {
    RuntimeClient::new(RuntimeConfig {
        endpoint,
        model: "gemma:2b".into(),
    })
    .unwrap()
}

#[tokio::test]
async fn sends_non_streaming_generate_request() {
    let (endpoint, seen) =
        common::spawn_runtime(StatusCode::OK, json!({"response": "Chest pain noted."})).await;
    let generation = client(endpoint).generate("summarise this").await;
    assert_eq!(generation, Generation::Completed("Chest pain noted.".into()));

    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        vec![json!({"model": "gemma:2b", "prompt": "summarise this", "stream": false})]
    );
}

#[tokio::test]
async fn unreachable_runtime_returns_fallback() {
    let client = RuntimeClient::with_timeout(
        RuntimeConfig {
            endpoint: common::unreachable_endpoint(),
            model: "gemma:2b".into(),
        },
        Duration::from_secs(5),
    )
    .unwrap();
    let generation = client.generate("anything").await;
    assert!(generation.is_degraded());
    assert_eq!(generation.into_text(), FALLBACK_SUMMARY);
}

#[tokio::test]
async fn error_status_is_degraded() {
    let (endpoint, _) =
        common::spawn_runtime(StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "boom"})).await;
    let generation = client(endpoint).generate("anything").await;
    assert!(generation.is_degraded());
    assert_eq!(generation.text(), FALLBACK_SUMMARY);
}

#[tokio::test]
async fn summary_field_used_when_response_absent() {
    let (endpoint, _) = common::spawn_runtime(StatusCode::OK, json!({"summary": "alt"})).await;
    let generation = client(endpoint).generate("anything").await;
    assert_eq!(generation.into_text(), "alt");
}

#[tokio::test]
async fn plain_text_success_body_is_degraded() {
    let endpoint = common::spawn_plain_runtime(StatusCode::OK, "Chest pain noted.").await;
    let generation = client(endpoint).generate("anything").await;
    assert!(generation.is_degraded());
    assert_eq!(generation.into_text(), FALLBACK_SUMMARY);
}
