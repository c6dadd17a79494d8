//! Request and response bodies for the JSON API.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct SummarizeRequest {
    pub text: String,
    pub template_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateSaveRequest {
    pub name: String,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateSavedDto {
    pub status: &'static str,
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthDto {
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorDto {
    pub detail: String,
}
