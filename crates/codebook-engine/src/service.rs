//! Per-request chat orchestration.
//!
//! `ChatService` owns the corpus lifecycle and answers one request at a
//! time: load-on-first-use, extract the query from the latest user message,
//! match, then stream the hit or emit a single fallback notice. The index is
//! an immutable `Arc` snapshot behind a lock, so concurrent requests read
//! without contention and a reload is an atomic swap that never disturbs a
//! request already matching against the previous snapshot.

use std::sync::Arc;

use codebook_core::config::CodebookConfig;
use codebook_core::types::{ChatMessage, ModelDescriptor, Role};
use codebook_core::ProgressSink;
use codebook_corpus::{Book, ContentLoader, LoadDiagnostic, PromptIndex};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::matcher::MatchEngine;
use crate::streamer::ResponseStreamer;

/// Emitted when the request carries no user-authored message.
pub const NO_USER_MESSAGE_NOTICE: &str = "No user message found in the request.";

/// Emitted when the latest user message has no extractable text.
pub const NO_QUERY_NOTICE: &str = "Could not extract text from user message.";

/// Emitted when no stored example matches the query.
pub const NO_MATCH_NOTICE: &str = "// I couldn't find a matching example for your prompt. \
     Try browsing the example books with `codebook books`, or use a prompt from the book content.";

/// Summary of a corpus (re)load.
#[derive(Debug)]
pub struct LoadReport {
    pub records: usize,
    pub diagnostics: Vec<LoadDiagnostic>,
}

/// Answers chat requests from the example corpus.
pub struct ChatService {
    loader: ContentLoader,
    streamer: ResponseStreamer,
    index: RwLock<Option<Arc<PromptIndex>>>,
}

impl ChatService {
    pub fn new(config: &CodebookConfig) -> Self {
        Self {
            loader: ContentLoader::new(config.corpus.dir.clone()),
            streamer: ResponseStreamer::from_config(&config.stream),
            index: RwLock::new(None),
        }
    }

    /// Answer one request.
    ///
    /// The query is the text of the most recent user message; `scope` is the
    /// caller's active language, if any. Every path produces output on the
    /// sink: streamed chunks for a hit, exactly one notice otherwise.
    pub async fn respond(
        &self,
        messages: &[ChatMessage],
        scope: Option<&str>,
        cancel: &CancellationToken,
        sink: &dyn ProgressSink,
    ) {
        let index = self.ensure_loaded().await;

        let Some(user_message) = messages.iter().rev().find(|m| m.role == Role::User) else {
            sink.report(NO_USER_MESSAGE_NOTICE).await;
            return;
        };

        let query = user_message.extract_text();
        if query.is_empty() {
            sink.report(NO_QUERY_NOTICE).await;
            return;
        }

        match MatchEngine::new(&index).find(&query, scope) {
            Some(response) => {
                self.streamer.deliver(response, cancel, sink).await;
            }
            None => {
                tracing::debug!("No example matched query (scope: {scope:?})");
                sink.report(NO_MATCH_NOTICE).await;
            }
        }
    }

    /// Get the current index, loading the corpus on first use. Subsequent
    /// calls reuse the snapshot until [`reload`](Self::reload).
    pub async fn ensure_loaded(&self) -> Arc<PromptIndex> {
        {
            let guard = self.index.read().await;
            if let Some(index) = guard.as_ref() {
                return index.clone();
            }
        }

        let mut guard = self.index.write().await;
        // Another request may have loaded while we waited for the lock.
        if let Some(index) = guard.as_ref() {
            return index.clone();
        }

        let outcome = self.loader.load();
        let index = Arc::new(PromptIndex::new(outcome.records));
        *guard = Some(index.clone());
        index
    }

    /// Discard the current index and rebuild it from disk.
    pub async fn reload(&self) -> LoadReport {
        let outcome = self.loader.load();
        let report = LoadReport {
            records: outcome.records.len(),
            diagnostics: outcome.diagnostics,
        };
        let index = Arc::new(PromptIndex::new(outcome.records));
        *self.index.write().await = Some(index);
        report
    }

    /// The parsed book trees, for browsing surfaces.
    pub fn books(&self) -> Vec<Book> {
        self.loader.books()
    }

    /// Crude length-proxy token estimate: ceil(characters / 4). Not a real
    /// tokenizer.
    pub fn estimate_tokens(text: &str) -> usize {
        text.chars().count().div_ceil(4)
    }

    /// Token estimate for a message, extracted the same way as a query.
    pub fn estimate_message_tokens(message: &ChatMessage) -> usize {
        Self::estimate_tokens(&message.extract_text())
    }

    /// Static description of this backend for hosts that list chat models.
    pub fn model() -> ModelDescriptor {
        ModelDescriptor {
            id: "codebook-examples".into(),
            name: "Codebook Examples".into(),
            family: "Codebook".into(),
            version: "1.0.0".into(),
            max_input_tokens: 4096,
            max_output_tokens: 2048,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use codebook_core::config::{CorpusConfig, StreamConfig};
    use std::path::Path;
    use std::sync::Mutex;

    struct CollectSink {
        chunks: Mutex<Vec<String>>,
    }

    impl CollectSink {
        fn new() -> Self {
            Self {
                chunks: Mutex::new(Vec::new()),
            }
        }

        fn collected(&self) -> Vec<String> {
            self.chunks.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProgressSink for CollectSink {
        async fn report(&self, chunk: &str) {
            self.chunks.lock().unwrap().push(chunk.to_string());
        }
    }

    const PYTHON_BOOK: &str = r#"{
        "title": "Python Basics",
        "sections": [{
            "title": "Getting Started",
            "chapters": [{
                "title": "Hello",
                "goal": "Print things",
                "examples": [{
                    "title": "Hello World",
                    "description": "The classic",
                    "prompt": "print hello world",
                    "response": ["print(\"Hello, World!\")"]
                }]
            }]
        }]
    }"#;

    fn write_book(dir: &Path, name: &str, json: &str) {
        std::fs::write(dir.join(name), json).unwrap();
    }

    fn service_for(dir: &Path) -> ChatService {
        let config = CodebookConfig {
            corpus: CorpusConfig {
                dir: dir.to_string_lossy().into_owned(),
            },
            stream: StreamConfig {
                chunk_size: 50,
                delay_ms: 0,
            },
        };
        ChatService::new(&config)
    }

    #[tokio::test]
    async fn test_end_to_end_exact_match_streamed() {
        let dir = tempfile::tempdir().unwrap();
        write_book(dir.path(), "python_basics.json", PYTHON_BOOK);
        let service = service_for(dir.path());

        let sink = CollectSink::new();
        let messages = [ChatMessage::user("Print Hello World")];
        service
            .respond(&messages, None, &CancellationToken::new(), &sink)
            .await;

        let chunks = sink.collected();
        assert_eq!(chunks.concat(), "print(\"Hello, World!\")");
        // Response is 22 chars, within one 50-char chunk.
        assert_eq!(chunks.len(), 1);
    }

    #[tokio::test]
    async fn test_end_to_end_wrong_scope_gets_fallback() {
        let dir = tempfile::tempdir().unwrap();
        write_book(dir.path(), "python_basics.json", PYTHON_BOOK);
        let service = service_for(dir.path());

        let sink = CollectSink::new();
        let messages = [ChatMessage::user("print hello world")];
        service
            .respond(&messages, Some("java"), &CancellationToken::new(), &sink)
            .await;

        assert_eq!(sink.collected(), vec![NO_MATCH_NOTICE.to_string()]);
    }

    #[tokio::test]
    async fn test_no_user_message_single_notice() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_for(dir.path());

        let sink = CollectSink::new();
        let messages = [ChatMessage::system("be helpful")];
        service
            .respond(&messages, None, &CancellationToken::new(), &sink)
            .await;

        assert_eq!(sink.collected(), vec![NO_USER_MESSAGE_NOTICE.to_string()]);
    }

    #[tokio::test]
    async fn test_unextractable_text_single_notice() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_for(dir.path());

        let sink = CollectSink::new();
        // A user message whose parts carry no text at all.
        let messages = [ChatMessage {
            role: Role::User,
            content: codebook_core::types::MessageContent::Parts(vec![
                codebook_core::types::MessagePart::Unsupported,
            ]),
        }];
        service
            .respond(&messages, None, &CancellationToken::new(), &sink)
            .await;

        assert_eq!(sink.collected(), vec![NO_QUERY_NOTICE.to_string()]);
    }

    #[tokio::test]
    async fn test_whitespace_query_reaches_matcher_and_misses() {
        let dir = tempfile::tempdir().unwrap();
        write_book(dir.path(), "python_basics.json", PYTHON_BOOK);
        let service = service_for(dir.path());

        let sink = CollectSink::new();
        let messages = [ChatMessage::user("   ")];
        service
            .respond(&messages, None, &CancellationToken::new(), &sink)
            .await;

        assert_eq!(sink.collected(), vec![NO_MATCH_NOTICE.to_string()]);
    }

    #[tokio::test]
    async fn test_latest_user_message_wins() {
        let dir = tempfile::tempdir().unwrap();
        write_book(dir.path(), "python_basics.json", PYTHON_BOOK);
        let service = service_for(dir.path());

        let sink = CollectSink::new();
        let messages = [
            ChatMessage::user("something unrelated entirely"),
            ChatMessage::assistant("…"),
            ChatMessage::user("print hello world"),
        ];
        service
            .respond(&messages, None, &CancellationToken::new(), &sink)
            .await;

        assert_eq!(sink.collected().concat(), "print(\"Hello, World!\")");
    }

    #[tokio::test]
    async fn test_missing_corpus_still_serves_fallback() {
        let service = service_for(Path::new("/no/such/corpus"));

        let sink = CollectSink::new();
        let messages = [ChatMessage::user("anything")];
        service
            .respond(&messages, None, &CancellationToken::new(), &sink)
            .await;

        assert_eq!(sink.collected(), vec![NO_MATCH_NOTICE.to_string()]);
    }

    #[tokio::test]
    async fn test_index_loaded_once_until_reload() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_for(dir.path());

        let before = service.ensure_loaded().await;
        assert!(before.is_empty());

        // New book appears on disk; the loaded snapshot must not change
        // until an explicit reload.
        write_book(dir.path(), "python_basics.json", PYTHON_BOOK);
        let unchanged = service.ensure_loaded().await;
        assert!(unchanged.is_empty());

        let report = service.reload().await;
        assert_eq!(report.records, 1);
        assert!(report.diagnostics.is_empty());
        let after = service.ensure_loaded().await;
        assert_eq!(after.len(), 1);
    }

    #[test]
    fn test_token_estimation_is_ceil_of_quarter_length() {
        assert_eq!(ChatService::estimate_tokens(""), 0);
        assert_eq!(ChatService::estimate_tokens("abcd"), 1);
        assert_eq!(ChatService::estimate_tokens("abcde"), 2);
        assert_eq!(ChatService::estimate_tokens(&"x".repeat(100)), 25);
    }

    #[test]
    fn test_message_token_estimation_uses_extracted_text() {
        let msg = ChatMessage::user("abcdefgh");
        assert_eq!(ChatService::estimate_message_tokens(&msg), 2);
    }

    #[test]
    fn test_model_descriptor() {
        let model = ChatService::model();
        assert_eq!(model.id, "codebook-examples");
        assert_eq!(model.family, "Codebook");
    }
}
