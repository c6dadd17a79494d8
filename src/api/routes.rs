//! HTTP route handlers for Axum.

use axum::{
    extract::{Path, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info};

use crate::{
    api::types::{ErrorDto, HealthDto, SummarizeRequest, TemplateSaveRequest, TemplateSavedDto},
    pipeline::{FlowOutput, PipelineError},
    templates::TemplateError,
};

use super::AppState;

/// Set to `true` on `/summarize` responses whose summary is the fallback text.
pub const DEGRADED_HEADER: &str = "x-medsum-degraded";

type ApiResult<T> = Result<T, ApiError>;

/// Error response rendered as `{"detail": ...}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorDto { detail: self.detail })).into_response()
    }
}

impl From<TemplateError> for ApiError {
    fn from(err: TemplateError) -> Self {
        let status = match &err {
            TemplateError::NotFound(_) => StatusCode::NOT_FOUND,
            e if e.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            detail: err.to_string(),
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Template(e) => e.into(),
            other => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                detail: other.to_string(),
            },
        }
    }
}

pub async fn summarize(
    State(state): State<AppState>,
    Json(payload): Json<SummarizeRequest>,
) -> ApiResult<Response> {
    info!(template = %payload.template_name, "summarize requested");
    let output: FlowOutput = state
        .pipeline
        .run(&payload.text, &payload.template_name)
        .await
        .map_err(|err| {
            error!(error = %err, "summarization flow failed");
            ApiError::from(err)
        })?;
    let degraded = output.degraded.is_some();
    let mut response = Json(output).into_response();
    if degraded {
        response.headers_mut().insert(
            HeaderName::from_static(DEGRADED_HEADER),
            HeaderValue::from_static("true"),
        );
    }
    Ok(response)
}

pub async fn health() -> Json<HealthDto> {
    Json(HealthDto { status: "ok" })
}

pub async fn get_template(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<serde_yaml::Value>> {
    let doc = state
        .pipeline
        .templates()
        .load_value(&name)
        .await
        .map_err(|err| {
            error!(template = %name, error = %err, "template retrieval failed");
            ApiError::from(err)
        })?;
    Ok(Json(doc))
}

pub async fn list_templates(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.pipeline.templates().list().await?))
}

pub async fn save_template(
    State(state): State<AppState>,
    Json(payload): Json<TemplateSaveRequest>,
) -> ApiResult<Json<TemplateSavedDto>> {
    let path = state
        .pipeline
        .templates()
        .save(&payload.name, &payload.data)
        .await
        .map_err(|err| {
            error!(template = %payload.name, error = %err, "template save failed");
            ApiError::from(err)
        })?;
    Ok(Json(TemplateSavedDto {
        status: "saved",
        path: path.display().to_string(),
    }))
}
