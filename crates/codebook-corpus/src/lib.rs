//! # Codebook Corpus
//! The example-book corpus: document model, language tagging, loading, and
//! the in-memory prompt index.
//!
//! ## How it works
//! ```text
//! book_content/*.json
//!   ↓ ContentLoader (per-document failures become diagnostics)
//! Vec<PromptRecord>  — prompt, flattened response, optional language tag
//!   ↓
//! PromptIndex — ordered, immutable, consulted per request
//! ```

pub mod book;
pub mod index;
pub mod language;
pub mod loader;

pub use book::{Book, Chapter, Example, PromptPair, ResponseText, Section};
pub use index::{PromptIndex, PromptRecord};
pub use loader::{ContentLoader, LoadDiagnostic, LoadOutcome};
