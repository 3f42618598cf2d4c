//! Chunked response delivery.
//!
//! A matched response is split into fixed-size character chunks and emitted
//! one at a time with a cooperative pause in between, simulating the
//! progressive delivery of a real model. The cancellation token is checked
//! before every chunk; cancellation is a silent stop, never an error, and
//! chunks already emitted stand.

use std::time::Duration;

use async_trait::async_trait;
use codebook_core::ProgressSink;
use codebook_core::config::StreamConfig;
use futures::Stream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Splits a response into chunks and drives them into a sink.
#[derive(Debug, Clone)]
pub struct ResponseStreamer {
    chunk_size: usize,
    delay: Duration,
}

impl ResponseStreamer {
    pub fn new(chunk_size: usize, delay: Duration) -> Self {
        Self {
            // A zero size would never make progress.
            chunk_size: chunk_size.max(1),
            delay,
        }
    }

    pub fn from_config(config: &StreamConfig) -> Self {
        Self::new(config.chunk_size, Duration::from_millis(config.delay_ms))
    }

    /// Split `text` into chunks of `chunk_size` characters; the final chunk
    /// may be shorter. Concatenating the chunks reproduces `text` exactly.
    pub fn chunks(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut count = 0;

        for ch in text.chars() {
            current.push(ch);
            count += 1;
            if count == self.chunk_size {
                chunks.push(std::mem::take(&mut current));
                count = 0;
            }
        }
        if !current.is_empty() {
            chunks.push(current);
        }
        chunks
    }

    /// Emit every chunk to the sink, pausing between chunks and honoring
    /// cancellation before each one. Returns the number of chunks emitted.
    pub async fn deliver(
        &self,
        text: &str,
        cancel: &CancellationToken,
        sink: &dyn ProgressSink,
    ) -> usize {
        let mut emitted = 0;
        for chunk in self.chunks(text) {
            if cancel.is_cancelled() {
                tracing::debug!("Delivery cancelled after {emitted} chunk(s)");
                break;
            }
            sink.report(&chunk).await;
            emitted += 1;
            tokio::time::sleep(self.delay).await;
        }
        emitted
    }

    /// The same delivery, shaped as a `Stream` of chunks for callers that
    /// consume rather than get pushed to.
    pub fn stream(
        &self,
        text: &str,
        cancel: CancellationToken,
    ) -> impl Stream<Item = String> + Send {
        let chunks = self.chunks(text);
        let delay = self.delay;
        async_stream::stream! {
            for chunk in chunks {
                if cancel.is_cancelled() {
                    return;
                }
                yield chunk;
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// A [`ProgressSink`] backed by an mpsc channel. A closed receiver drops
/// chunks silently; delivery has no backpressure path by design.
pub struct ChannelSink {
    tx: mpsc::Sender<String>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<String>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl ProgressSink for ChannelSink {
    async fn report(&self, chunk: &str) {
        let _ = self.tx.send(chunk.to_string()).await;
    }
}
