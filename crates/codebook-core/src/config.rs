//! Codebook configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodebookConfig {
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub stream: StreamConfig,
}

impl Default for CodebookConfig {
    fn default() -> Self {
        Self {
            corpus: CorpusConfig::default(),
            stream: StreamConfig::default(),
        }
    }
}

impl CodebookConfig {
    /// Load config from the default path (~/.codebook/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::error::CodebookError::Config(format!("Failed to read config: {e}"))
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            crate::error::CodebookError::Config(format!("Failed to parse config: {e}"))
        })?;
        Ok(config)
    }

    /// Save config to the default path.
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| {
            crate::error::CodebookError::Config(format!("Failed to serialize config: {e}"))
        })?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the Codebook home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".codebook")
    }
}

/// Corpus (example books) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Directory holding the book JSON documents.
    #[serde(default = "default_corpus_dir")]
    pub dir: String,
}

fn default_corpus_dir() -> String {
    "book_content".into()
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            dir: default_corpus_dir(),
        }
    }
}

/// Chunked response delivery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Characters per emitted chunk.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Cooperative pause between chunks, in milliseconds.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

fn default_chunk_size() -> usize {
    50
}
fn default_delay_ms() -> u64 {
    10
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            delay_ms: default_delay_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CodebookConfig::default();
        assert_eq!(config.corpus.dir, "book_content");
        assert_eq!(config.stream.chunk_size, 50);
        assert_eq!(config.stream.delay_ms, 10);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: CodebookConfig = toml::from_str(
            r#"
            [corpus]
            dir = "/opt/books"
            "#,
        )
        .unwrap();
        assert_eq!(config.corpus.dir, "/opt/books");
        assert_eq!(config.stream.chunk_size, 50);
    }

    #[test]
    fn test_load_from_missing_file_errors() {
        let err = CodebookConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(err.is_err());
    }

    #[test]
    fn test_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = CodebookConfig::default();
        config.stream.chunk_size = 8;
        std::fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = CodebookConfig::load_from(&path).unwrap();
        assert_eq!(loaded.stream.chunk_size, 8);
    }
}
