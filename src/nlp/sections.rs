//! Paragraph segmentation of raw notes.

use serde::{Deserialize, Serialize};

/// Paragraph-delimited chunk of the input note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: usize,
    pub content: String,
}

/// Split on blank-line boundaries, dropping blocks that trim to nothing.
///
/// Ids count kept sections only, so they are always `0..n`.
pub fn split_sections(text: &str) -> Vec<Section> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .enumerate()
        .map(|(id, content)| Section {
            id,
            content: content.to_string(),
        })
        .collect()
}
