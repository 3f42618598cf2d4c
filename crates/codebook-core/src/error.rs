//! Codebook error types.

use thiserror::Error;

/// All errors produced by the Codebook crates.
#[derive(Debug, Error)]
pub enum CodebookError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Corpus error: {0}")]
    Corpus(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result alias used across the workspace.
pub type Result<T> = std::result::Result<T, CodebookError>;
