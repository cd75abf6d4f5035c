//! OpenAI-compatible inference backend.
//!
//! Works with any endpoint that speaks the OpenAI REST dialect, including:
//!
//! - OpenAI cloud API (embeddings)
//! - ASI:1 (`https://api.asi1.ai/v1`, reasoning)
//! - Ollama in OpenAI compatibility mode
//! - vLLM, LocalAI, LM Studio
//!
//! # Example
//!
//! ```rust,no_run
//! use scribe_inference::openai::{OpenAIBackend, OpenAIConfig};
//! use scribe_core::GenerationBackend;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = OpenAIConfig {
//!         base_url: "https://api.asi1.ai/v1".to_string(),
//!         api_key: std::env::var("ASI_ONE_API_KEY").ok(),
//!         gen_model: "asi1".to_string(),
//!         ..Default::default()
//!     };
//!     let backend = OpenAIBackend::new(config).unwrap();
//!     let answer = backend
//!         .complete("Answer concisely.", "What is a to-do block?", 256)
//!         .await
//!         .unwrap();
//!     println!("{answer}");
//! }
//! ```

mod backend;
mod error;
mod types;

pub use backend::{
    OpenAIBackend, OpenAIConfig, DEFAULT_GEN_MODEL, DEFAULT_OPENAI_URL, DEFAULT_TIMEOUT_SECS,
};
pub use error::{to_scribe_error, CallKind, UpstreamErrorCode};
pub use types::*;
