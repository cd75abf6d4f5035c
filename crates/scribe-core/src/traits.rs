//! Core traits for scribe's remote collaborators.
//!
//! These traits define the interfaces that concrete backends must satisfy,
//! enabling pluggable implementations and testability. Every implementation
//! is treated as remote and fallible; callers never retry.

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::*;

// =============================================================================
// WORKSPACE TRAITS
// =============================================================================

/// Remote document workspace (pages and their blocks).
#[async_trait]
pub trait WorkspaceClient: Send + Sync {
    /// Fetch accessible pages, already flattened into documents.
    async fn search_pages(&self, query: PageQuery) -> Result<Vec<Document>>;

    /// Fetch the child blocks of a page.
    async fn get_blocks(&self, page_id: &str) -> Result<Vec<Block>>;

    /// Create a page under `parent_id` with the given title and body.
    async fn create_page(
        &self,
        parent_id: &str,
        title: &str,
        children: Vec<Block>,
    ) -> Result<Document>;

    /// Append blocks to the end of a page.
    async fn append_blocks(&self, page_id: &str, blocks: Vec<Block>) -> Result<()>;

    /// Set the archived flag of a page.
    async fn update_page(&self, page_id: &str, archived: bool) -> Result<()>;
}

// =============================================================================
// INFERENCE TRAITS
// =============================================================================

/// Backend for generating text embeddings.
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    /// Generate embeddings for the given texts.
    ///
    /// Returns a vector of embedding vectors, one per input text.
    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vector>>;

    /// Embed a single text.
    async fn embed_text(&self, text: &str) -> Result<Vector> {
        self.embed_texts(&[text.to_string()])
            .await?
            .pop()
            .ok_or_else(|| Error::Embedding("Backend returned no embedding".to_string()))
    }

    /// Get the expected dimension of embedding vectors.
    fn dimension(&self) -> usize;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}

/// Backend for text generation (LLM).
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Complete `prompt` under `system` instructions, bounded to `max_tokens`.
    ///
    /// The result is free-form text; callers that expect JSON must parse it
    /// defensively.
    async fn complete(&self, system: &str, prompt: &str, max_tokens: u32) -> Result<String>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}
