//! # Codebook Core
//! Shared foundation for the Codebook workspace: configuration, errors,
//! request/response types, and the sink trait that delivery surfaces implement.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::CodebookConfig;
pub use error::{CodebookError, Result};
pub use traits::ProgressSink;
