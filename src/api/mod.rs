//! HTTP layer exposing the summarisation pipeline and template store.

pub mod routes;
pub mod types;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::{config::Settings, pipeline::Pipeline};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

/// Routes with tracing and permissive CORS for the desktop front-end.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/summarize", post(routes::summarize))
        .route("/health", get(routes::health))
        .route("/templates", get(routes::list_templates))
        .route("/template/save", post(routes::save_template))
        .route("/template/:name", get(routes::get_template))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn serve(settings: Settings, host: String, port: u16) -> Result<()> {
    let state = AppState {
        pipeline: Pipeline::global(&settings),
    };
    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    info!(%addr, "serving medsum API");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router(state).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
