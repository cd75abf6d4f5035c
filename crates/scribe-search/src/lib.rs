//! # scribe-search
//!
//! Semantic retrieval for the scribe notes agent.
//!
//! Documents are ranked by cosine similarity between the query embedding and
//! each document's title embedding rather than by keyword match. Title
//! embeddings are memoized in an [`EmbeddingCache`] keyed by document id and
//! invalidated automatically when the title changes.
//!
//! ## Pipeline
//!
//! 1. Fetch up to [`FETCH_PAGE_SIZE`](scribe_core::defaults::FETCH_PAGE_SIZE)
//!    pages, most recently edited first.
//! 2. Blank query: return the first `limit` pages without embedding anything.
//! 3. Embed the query, then each title (cache first).
//! 4. Stable sort by score, drop scores at or below the relevance floor,
//!    truncate to `limit`.

pub mod cache;
pub mod retrieval;
pub mod similarity;

pub use cache::{CacheStats, EmbeddingCache, EmbeddingStore, InMemoryEmbeddingStore};
pub use retrieval::{RetrievalConfig, ScoredCandidate, SemanticRetriever};
pub use similarity::cosine_similarity;
