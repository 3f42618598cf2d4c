//! # Codebook Engine
//! The answering core: tiered prompt matching over the corpus index,
//! cancellable chunked delivery, and per-request orchestration.
//!
//! ## Request flow
//! ```text
//! chat request
//!   ↓ ChatService — extract query from latest user message, resolve scope
//! MatchEngine — exact → substring → fuzzy word overlap
//!   ↓ hit                          ↓ miss
//! ResponseStreamer → sink       fallback notice → sink
//! ```

pub mod matcher;
pub mod service;
pub mod streamer;

pub use matcher::MatchEngine;
pub use service::{ChatService, LoadReport};
pub use streamer::{ChannelSink, ResponseStreamer};
