//! The in-memory prompt index.

use serde::{Deserialize, Serialize};

/// One normalized unit of the index: a prompt, its flattened response, and
/// the language tag of the document it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptRecord {
    pub prompt: String,
    pub response: String,
    pub language: Option<String>,
}

/// An ordered collection of prompt records.
///
/// Order is discovery order — document, then section/chapter/example, then
/// pair within an example — and defines tie-break precedence in matching.
/// No deduplication: duplicate prompts are legal and the earliest wins.
/// Immutable once built; a reload builds a fresh index.
#[derive(Debug, Default)]
pub struct PromptIndex {
    records: Vec<PromptRecord>,
}

impl PromptIndex {
    pub fn new(records: Vec<PromptRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[PromptRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
