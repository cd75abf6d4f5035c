//! Mock inference backends for deterministic testing.
//!
//! `MockEmbeddingBackend` returns vectors registered per input text, so tests
//! control similarity scores exactly. Unregistered text embeds to the zero
//! vector, which scores 0 against anything. `MockGenerationBackend` returns a
//! fixed response or a fixed failure.
//!
//! ## Usage
//!
//! ```rust
//! use scribe_inference::mock::MockEmbeddingBackend;
//! use scribe_core::EmbeddingBackend;
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = MockEmbeddingBackend::new(3)
//!         .with_vector("meeting notes", vec![1.0, 0.0, 0.0]);
//!
//!     let embedding = backend.embed_text("meeting notes").await.unwrap();
//!     assert_eq!(embedding, vec![1.0, 0.0, 0.0]);
//!     assert_eq!(backend.embed_call_count(), 1);
//! }
//! ```

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use scribe_core::{EmbeddingBackend, Error, GenerationBackend, Result, Vector};

/// A recorded call against a mock backend.
#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    pub operation: String,
    pub input: String,
    pub max_tokens: Option<u32>,
}

fn record(log: &Mutex<Vec<MockCall>>, call: MockCall) {
    if let Ok(mut calls) = log.lock() {
        calls.push(call);
    }
}

fn snapshot(log: &Mutex<Vec<MockCall>>) -> Vec<MockCall> {
    log.lock().map(|calls| calls.clone()).unwrap_or_default()
}

// =============================================================================
// EMBEDDINGS
// =============================================================================

/// Mock embedding backend with per-text vectors.
#[derive(Clone)]
pub struct MockEmbeddingBackend {
    dimension: usize,
    vectors: Arc<HashMap<String, Vector>>,
    failing: Arc<HashSet<String>>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

impl MockEmbeddingBackend {
    /// Create a backend producing vectors of `dimension` floats.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: Arc::new(HashMap::new()),
            failing: Arc::new(HashSet::new()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Register the vector returned for `text`.
    pub fn with_vector(mut self, text: impl Into<String>, vector: Vector) -> Self {
        Arc::make_mut(&mut self.vectors).insert(text.into(), vector);
        self
    }

    /// Make embedding `text` fail.
    pub fn with_failure_for(mut self, text: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.failing).insert(text.into());
        self
    }

    /// Get all logged calls for assertion.
    pub fn get_calls(&self) -> Vec<MockCall> {
        snapshot(&self.call_log)
    }

    /// Number of texts embedded so far.
    pub fn embed_call_count(&self) -> usize {
        self.get_calls().len()
    }

    /// Number of times `text` was embedded.
    pub fn calls_for(&self, text: &str) -> usize {
        self.get_calls().iter().filter(|c| c.input == text).count()
    }
}

#[async_trait]
impl EmbeddingBackend for MockEmbeddingBackend {
    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vector>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            record(
                &self.call_log,
                MockCall {
                    operation: "embed".to_string(),
                    input: text.clone(),
                    max_tokens: None,
                },
            );
            if self.failing.contains(text) {
                return Err(Error::Embedding(format!("simulated failure for {:?}", text)));
            }
            let vector = self
                .vectors
                .get(text)
                .cloned()
                .unwrap_or_else(|| vec![0.0; self.dimension]);
            out.push(vector);
        }
        Ok(out)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        "mock-embed"
    }
}

// =============================================================================
// GENERATION
// =============================================================================

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Fail(String),
}

/// Mock generation backend with a fixed reply.
#[derive(Clone)]
pub struct MockGenerationBackend {
    reply: Reply,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

impl MockGenerationBackend {
    /// Always answer `response`.
    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            reply: Reply::Text(response.into()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always fail with an inference error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Reply::Fail(message.into()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get all logged calls for assertion.
    pub fn get_calls(&self) -> Vec<MockCall> {
        snapshot(&self.call_log)
    }

    pub fn complete_call_count(&self) -> usize {
        self.get_calls().len()
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn complete(&self, _system: &str, prompt: &str, max_tokens: u32) -> Result<String> {
        record(
            &self.call_log,
            MockCall {
                operation: "complete".to_string(),
                input: prompt.to_string(),
                max_tokens: Some(max_tokens),
            },
        );
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Fail(message) => Err(Error::Inference(message.clone())),
        }
    }

    fn model_name(&self) -> &str {
        "mock-gen"
    }
}
