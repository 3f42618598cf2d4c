//! Seam traits implemented by delivery surfaces.

use async_trait::async_trait;

/// Receives response text incrementally.
///
/// Each `report` call is a one-way, ordered notification; there is no
/// acknowledgment or backpressure path from the sink back to the producer.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn report(&self, chunk: &str);
}
