//! On-disk book document model.
//!
//! A book is `title → sections → chapters → examples`. Source documents
//! express an example's prompt/response content in two shapes: a `prompts`
//! array, or a single inline `prompt`/`response` pair. Both are modeled here
//! and normalized by [`Example::pairs`]; the shape distinction never leaves
//! this crate.

use serde::{Deserialize, Serialize};

/// A named collection of sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// An ordered sequence of chapters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

/// An ordered sequence of examples with a goal description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    pub title: String,
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub examples: Vec<Example>,
}

/// A worked example: one or more prompt/response pairs.
///
/// Both content shapes may be present; an example with neither simply
/// contributes no pairs (it can still be browsed by title).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Example {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Array shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompts: Option<Vec<PromptPair>>,
    /// Inline shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseText>,
}

/// One prompt/response pair inside an example's `prompts` array.
///
/// Fields are optional so a malformed pair is skipped rather than failing
/// its whole document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptPair {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub response: Option<ResponseText>,
}

/// A response stored either as a single string or as ordered lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseText {
    Single(String),
    Lines(Vec<String>),
}

impl ResponseText {
    /// Flatten to one string. Line arrays join with a single newline,
    /// preserving order.
    pub fn flatten(&self) -> String {
        match self {
            ResponseText::Single(text) => text.clone(),
            ResponseText::Lines(lines) => lines.join("\n"),
        }
    }
}

impl Example {
    /// Normalize this example into `(prompt, flattened response)` pairs.
    ///
    /// The inline pair (when complete) comes first, then the array pairs in
    /// order. Pairs missing either side are skipped.
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();

        if let (Some(prompt), Some(response)) = (&self.prompt, &self.response) {
            out.push((prompt.clone(), response.flatten()));
        }

        if let Some(pairs) = &self.prompts {
            for pair in pairs {
                if let (Some(prompt), Some(response)) = (&pair.prompt, &pair.response) {
                    out.push((prompt.clone(), response.flatten()));
                }
            }
        }

        out
    }
}
