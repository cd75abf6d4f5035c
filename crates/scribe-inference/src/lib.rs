//! # scribe-inference
//!
//! Embedding and reasoning backends for the scribe notes agent.
//!
//! This crate provides:
//! - An OpenAI-compatible backend (feature `openai`, default) that serves both
//!   the embedding service (`/embeddings`) and the reasoning service
//!   (`/chat/completions`). Two instances are typically configured: one
//!   against the embedding provider and one against the reasoning provider.
//! - Deterministic mock backends (feature `mock`) for downstream tests.
//!
//! # Example
//!
//! ```rust,no_run
//! use scribe_inference::openai::{OpenAIBackend, OpenAIConfig};
//! use scribe_core::EmbeddingBackend;
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = OpenAIBackend::new(OpenAIConfig::default()).unwrap();
//!     let vector = backend.embed_text("Quarterly planning").await.unwrap();
//!     println!("{} dims", vector.len());
//! }
//! ```

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use scribe_core::*;

#[cfg(feature = "openai")]
pub use openai::{OpenAIBackend, OpenAIConfig};
