//! Corpus loading and normalization.
//!
//! Reads every `*.json` book in the corpus directory and flattens its
//! examples into [`PromptRecord`]s. Loading is total: a missing directory
//! yields an empty outcome, and a document that fails to parse is skipped
//! with a diagnostic while the rest still load.

use std::path::{Path, PathBuf};

use crate::book::Book;
use crate::index::PromptRecord;
use crate::language::detect_language;

/// Result of one corpus load: the records plus any per-document failures.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub records: Vec<PromptRecord>,
    pub diagnostics: Vec<LoadDiagnostic>,
}

/// A document that failed to load, and why.
#[derive(Debug, Clone)]
pub struct LoadDiagnostic {
    pub file: String,
    pub message: String,
}

/// Reads book documents from a directory.
pub struct ContentLoader {
    dir: PathBuf,
}

impl ContentLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load and normalize the whole corpus.
    pub fn load(&self) -> LoadOutcome {
        let mut outcome = LoadOutcome::default();

        for path in self.document_paths() {
            let file = file_name_of(&path);
            match read_book(&path) {
                Ok(book) => {
                    let language = detect_language(&file);
                    collect_records(&book, language, &mut outcome.records);
                }
                Err(message) => {
                    tracing::warn!("Skipping book '{file}': {message}");
                    outcome.diagnostics.push(LoadDiagnostic { file, message });
                }
            }
        }

        tracing::info!(
            "Loaded {} prompt(s) from corpus at {}",
            outcome.records.len(),
            self.dir.display()
        );
        outcome
    }

    /// Parse the full book trees, for browsing surfaces. Failures are
    /// skipped, same isolation as [`load`](Self::load).
    pub fn books(&self) -> Vec<Book> {
        self.document_paths()
            .into_iter()
            .filter_map(|path| read_book(&path).ok())
            .collect()
    }

    /// Candidate document paths, sorted by file name so discovery order (and
    /// with it match tie-breaking) is deterministic.
    fn document_paths(&self) -> Vec<PathBuf> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => {
                tracing::warn!("Corpus directory not found: {}", self.dir.display());
                return Vec::new();
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort_by_key(|path| file_name_of(path));
        paths
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn read_book(path: &Path) -> Result<Book, String> {
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&content).map_err(|e| e.to_string())
}

/// Flatten one book into records, walking sections → chapters → examples in
/// document order.
fn collect_records(book: &Book, language: Option<&str>, records: &mut Vec<PromptRecord>) {
    for section in &book.sections {
        for chapter in &section.chapters {
            for example in &chapter.examples {
                for (prompt, response) in example.pairs() {
                    records.push(PromptRecord {
                        prompt,
                        response,
                        language: language.map(String::from),
                    });
                }
            }
        }
    }
}
