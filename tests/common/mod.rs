//! Stand-in model runtime for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde_json::Value;
use tokio::net::TcpListener;

#[derive(Clone)]
struct Runtime {
    status: StatusCode,
    reply: Value,
    seen: Arc<Mutex<Vec<Value>>>,
}

/// Requests received by a stand-in runtime.
pub type Seen = Arc<Mutex<Vec<Value>>>;

async fn generate(State(rt): State<Runtime>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    rt.seen.lock().unwrap().push(body);
    (rt.status, Json(rt.reply.clone()))
}

/// Serve `reply` with `status` on `/api/generate`; returns the base URL and captured bodies.
pub async fn spawn_runtime(status: StatusCode, reply: Value) -> (String, Seen) {
    let seen: Seen = Arc::default();
    let state = Runtime {
        status,
        reply,
        seen: Arc::clone(&seen),
    };
    let app = Router::new()
        .route("/api/generate", post(generate))
        .with_state(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/"), seen)
}

/// Serve `body` as `text/plain` with `status` on `/api/generate`.
pub async fn spawn_plain_runtime(status: StatusCode, body: &'static str) -> String {
    let app = Router::new().route(
        "/api/generate",
        post(move || async move { (status, body) }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Base URL of a port nothing listens on.
pub fn unreachable_endpoint() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
