//! Centralized default constants for scribe.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own magic
//! numbers.
//!
//! The retrieval policy values ([`RELEVANCE_FLOOR`], [`RESULT_LIMIT`]) are
//! tunable. Nothing else in the system depends on their exact values.

// =============================================================================
// RETRIEVAL
// =============================================================================

/// Minimum cosine similarity a candidate must exceed to count as a match.
pub const RELEVANCE_FLOOR: f32 = 0.3;

/// Default number of documents returned by search and list.
pub const RESULT_LIMIT: usize = 5;

/// Number of pages fetched from the workspace per retrieval (most recent first).
pub const FETCH_PAGE_SIZE: usize = 100;

/// Number of child blocks fetched when reading a page.
pub const BLOCK_PAGE_SIZE: usize = 100;

/// Title-embedding requests kept in flight while scoring candidates.
pub const EMBED_CONCURRENCY: usize = 8;

/// Title used for pages that have no title property text.
pub const UNTITLED: &str = "(untitled)";

/// Title used when a create request names no title.
pub const NEW_PAGE_TITLE: &str = "Untitled";

// =============================================================================
// INFERENCE
// =============================================================================

/// Default embedding model name.
pub const EMBED_MODEL: &str = "text-embedding-3-small";

/// Default embedding vector dimension for text-embedding-3-small.
pub const EMBED_DIMENSION: usize = 1536;

/// Token budget for intent classification responses.
pub const CLASSIFY_MAX_TOKENS: u32 = 256;

/// Token budget for free-form answers.
pub const ANSWER_MAX_TOKENS: u32 = 1024;

// =============================================================================
// NETWORK
// =============================================================================

/// Timeout applied to every outbound HTTP request.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 8000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relevance_floor_is_a_similarity() {
        assert!(RELEVANCE_FLOOR > -1.0 && RELEVANCE_FLOOR < 1.0);
    }

    #[test]
    fn test_result_limit_fits_page() {
        assert!(RESULT_LIMIT > 0);
        assert!(RESULT_LIMIT <= FETCH_PAGE_SIZE);
    }

    #[test]
    fn test_classify_budget_smaller_than_answer_budget() {
        assert!(CLASSIFY_MAX_TOKENS < ANSWER_MAX_TOKENS);
    }
}
