//! YAML template storage with structural validation.

use std::{
    io,
    path::{Component, Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info};

const EXTENSION: &str = ".yaml";

/// One heading of the generated summary with its guidance for the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSection {
    pub name: String,
    pub ai_instruction: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateBody {
    pub sections: Vec<TemplateSection>,
}

/// Validated template document, `{template: {sections: [...]}}` on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDoc {
    pub template: TemplateBody,
}

impl TemplateDoc {
    pub fn sections(&self) -> &[TemplateSection] {
        &self.template.sections
    }

    /// Check an untyped document against the template shape.
    pub fn from_value(value: Value) -> Result<Self, TemplateError> {
        debug!("validating template structure");
        let template = value.get("template").filter(|t| is_present(t));
        let sections = template.and_then(|t| t.get("sections"));
        let Some(sections) = sections else {
            return Err(TemplateError::Invalid(
                "template must include a 'template' key with 'sections'".into(),
            ));
        };
        let Some(items) = sections.as_sequence() else {
            return Err(TemplateError::Invalid("'sections' must be a list".into()));
        };
        for item in items {
            if item.get("name").is_none() || item.get("ai_instruction").is_none() {
                return Err(TemplateError::Invalid(
                    "each section requires 'name' and 'ai_instruction'".into(),
                ));
            }
        }
        serde_yaml::from_value(value).map_err(|e| TemplateError::Invalid(e.to_string()))
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Mapping(map) => !map.is_empty(),
        _ => true,
    }
}

/// Template lookup and persistence failures.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template {0} not found")]
    NotFound(String),
    #[error("invalid template: {0}")]
    Invalid(String),
    #[error("invalid template name {0:?}")]
    BadName(String),
    #[error("template file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("encoding template: {0}")]
    Encode(#[from] serde_yaml::Error),
}

impl TemplateError {
    /// Caller-side mistakes, as opposed to storage failures.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Invalid(_) | Self::BadName(_))
    }
}

/// Directory of `<name>.yaml` template documents.
///
/// Documents are validated against [`TemplateDoc`] but stored and served as
/// written, so keys the typed record does not know about survive a round trip.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    dir: PathBuf,
}

impl TemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `name`, with the extension appended when absent.
    pub fn path_for(&self, name: &str) -> Result<PathBuf, TemplateError> {
        let file = if name.ends_with(EXTENSION) {
            name.to_string()
        } else {
            format!("{name}{EXTENSION}")
        };
        let mut components = Path::new(&file).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.dir.join(file)),
            _ => Err(TemplateError::BadName(name.to_string())),
        }
    }

    /// Read and validate the template called `name`.
    pub async fn load(&self, name: &str) -> Result<TemplateDoc, TemplateError> {
        TemplateDoc::from_value(self.load_value(name).await?)
    }

    /// Validated document for `name`, including keys outside the typed record.
    pub async fn load_value(&self, name: &str) -> Result<Value, TemplateError> {
        info!(template = name, "loading template");
        let path = self.path_for(name)?;
        let raw = match fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(TemplateError::NotFound(name.to_string()))
            }
            Err(source) => return Err(TemplateError::Io { path, source }),
        };
        let value: Value =
            serde_yaml::from_str(&raw).map_err(|e| TemplateError::Invalid(e.to_string()))?;
        TemplateDoc::from_value(value.clone())?;
        Ok(value)
    }

    /// Validate `data` and write it as `name`, returning the written path.
    ///
    /// Nothing is written when validation fails. Key order is kept as given.
    pub async fn save<T: Serialize>(
        &self,
        name: &str,
        data: &T,
    ) -> Result<PathBuf, TemplateError> {
        info!(template = name, "saving template");
        let path = self.path_for(name)?;
        let value = serde_yaml::to_value(data)?;
        let doc = TemplateDoc::from_value(value.clone())?;
        let body = serde_yaml::to_string(&value)?;
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| TemplateError::Io {
                path: self.dir.clone(),
                source,
            })?;
        fs::write(&path, body)
            .await
            .map_err(|source| TemplateError::Io {
                path: path.clone(),
                source,
            })?;
        info!(path = %path.display(), sections = doc.sections().len(), "template saved");
        Ok(path)
    }

    /// Names of stored templates, sorted.
    pub async fn list(&self) -> Result<Vec<String>, TemplateError> {
        let io_err = |source| TemplateError::Io {
            path: self.dir.clone(),
            source,
        };
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(io_err(source)),
        };
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            let Ok(file) = entry.file_name().into_string() else {
                continue;
            };
            if let Some(name) = file.strip_suffix(EXTENSION) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}
