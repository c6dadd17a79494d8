//! Lexicon-driven clinical NER with a blank fallback model.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Label assigned when the model recognises a span without classifying it.
pub const UNKNOWN_LABEL: &str = "UNKNOWN";

/// Recognised entity span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub label: String,
}

/// Trait for NER implementations.
pub trait Ner: Send + Sync {
    fn entities(&self, text: &str) -> Vec<Entity>;

    /// Short identifier used in logs.
    fn name(&self) -> &str;
}

/// Errors raised while constructing the NER model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("reading NER model {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed NER model {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("bad pattern for term {term:?}: {source}")]
    Pattern {
        term: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug, Deserialize)]
struct LexiconFile {
    #[serde(default)]
    entities: Vec<LexiconEntry>,
}

#[derive(Debug, Deserialize)]
struct LexiconEntry {
    term: String,
    #[serde(default)]
    label: Option<String>,
}

struct LexiconTerm {
    pattern: Regex,
    label: String,
}

/// Domain model: case-insensitive, word-bounded matching of clinical terms.
pub struct LexiconNer {
    terms: Vec<LexiconTerm>,
}

impl LexiconNer {
    /// Compile `(term, label)` pairs. A missing or empty label reads as [`UNKNOWN_LABEL`].
    pub fn from_terms<I, S>(entries: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = (S, Option<S>)>,
        S: AsRef<str>,
    {
        let mut terms = Vec::new();
        for (term, label) in entries {
            let term = term.as_ref().trim();
            if term.is_empty() {
                continue;
            }
            let pattern = RegexBuilder::new(&format!(r"\b{}\b", regex::escape(term)))
                .case_insensitive(true)
                .build()
                .map_err(|source| ModelError::Pattern {
                    term: term.to_string(),
                    source,
                })?;
            let label = label
                .as_ref()
                .map(|l| l.as_ref().trim())
                .filter(|l| !l.is_empty())
                .unwrap_or(UNKNOWN_LABEL)
                .to_string();
            terms.push(LexiconTerm { pattern, label });
        }
        Ok(Self { terms })
    }

    fn from_file(path: &Path, raw: &str) -> Result<Self, ModelError> {
        let file: LexiconFile = serde_json::from_str(raw).map_err(|source| ModelError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_terms(file.entities.into_iter().map(|e| (e.term, e.label)))
    }
}

impl Ner for LexiconNer {
    fn entities(&self, text: &str) -> Vec<Entity> {
        let mut hits: Vec<(usize, usize, &str)> = Vec::new();
        for term in &self.terms {
            for m in term.pattern.find_iter(text) {
                hits.push((m.start(), m.end(), term.label.as_str()));
            }
        }
        // earliest first, longest first on ties
        hits.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

        let mut out = Vec::new();
        let mut covered = 0;
        for (start, end, label) in hits {
            if start < covered {
                continue;
            }
            out.push(Entity {
                text: text[start..end].to_string(),
                label: label.to_string(),
            });
            covered = end;
        }
        out
    }

    fn name(&self) -> &str {
        "clinical-lexicon"
    }
}

/// Fallback model without a recogniser.
pub struct BlankNer;

impl Ner for BlankNer {
    fn entities(&self, _text: &str) -> Vec<Entity> {
        Vec::new()
    }

    fn name(&self) -> &str {
        "blank"
    }
}

/// Load the clinical lexicon at `path`, degrading to [`BlankNer`] when the file does not exist.
pub fn load_model(path: &Path) -> Result<Arc<dyn Ner>, ModelError> {
    info!(path = %path.display(), "loading clinical NER model");
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            warn!(
                path = %path.display(),
                "clinical NER model not found; falling back to blank model"
            );
            return Ok(Arc::new(BlankNer) as Arc<dyn Ner>);
        }
        Err(source) => {
            return Err(ModelError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    let model = LexiconNer::from_file(path, &raw)?;
    info!(terms = model.terms.len(), "clinical NER model ready");
    Ok(Arc::new(model) as Arc<dyn Ner>)
}
