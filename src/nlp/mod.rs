//! Natural language processing layer: entity recognition and sectioning.

pub mod ner;
pub mod sections;

use std::{path::PathBuf, sync::Arc};

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub use ner::{Entity, ModelError, Ner, UNKNOWN_LABEL};
pub use sections::{split_sections, Section};

/// Entities and paragraph sections extracted from one note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityResult {
    pub entities: Vec<Entity>,
    pub sections: Vec<Section>,
}

/// Entity extractor owning a lazily constructed, shared NER model.
///
/// The model is built on the first call to [`EntityExtractor::extract`] and
/// reused for every later call. Concurrent first calls block on a single
/// construction. A failed construction is not cached, so the next call retries.
pub struct EntityExtractor {
    model_path: PathBuf,
    model: OnceCell<Arc<dyn Ner>>,
}

impl EntityExtractor {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            model: OnceCell::new(),
        }
    }

    /// Use an already constructed model instead of loading one from disk.
    pub fn with_model(model: Arc<dyn Ner>) -> Self {
        Self {
            model_path: PathBuf::new(),
            model: OnceCell::with_value(model),
        }
    }

    /// The shared model, constructing it on first use.
    pub fn model(&self) -> Result<&Arc<dyn Ner>, ModelError> {
        self.model.get_or_try_init(|| ner::load_model(&self.model_path))
    }

    /// Run NER over `text` and split it into sections.
    pub fn extract(&self, text: &str) -> Result<EntityResult, ModelError> {
        info!("extracting entities");
        let model = self.model()?;
        let entities = model.entities(text);
        let sections = split_sections(text);
        debug!(
            model = model.name(),
            entities = entities.len(),
            sections = sections.len(),
            "extraction complete"
        );
        Ok(EntityResult { entities, sections })
    }
}
