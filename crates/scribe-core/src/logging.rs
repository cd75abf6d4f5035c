//! Structured logging schema and field name constants for scribe.
//!
//! All crates use these names for structured `tracing` fields so log
//! aggregation can query every subsystem the same way.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-item iteration, high-volume data (candidate scores) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "agent", "search", "notion", "inference"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "retriever", "embedding_cache", "classifier", "dispatcher"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "search", "embed_texts", "complete", "dispatch"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Workspace document id being operated on.
pub const DOCUMENT_ID: &str = "document_id";

/// Inbound chat message id.
pub const MSG_ID: &str = "msg_id";

/// Address of the peer that sent the inbound message.
pub const SENDER: &str = "sender";

/// Classified intent name.
pub const INTENT: &str = "intent";

/// Search query text.
pub const QUERY: &str = "query";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned by a search.
pub const RESULT_COUNT: &str = "result_count";

/// Number of documents fetched and considered for ranking.
pub const CANDIDATE_COUNT: &str = "candidate_count";

/// Title embeddings served from the cache.
pub const CACHE_HITS: &str = "cache_hits";

/// Title embeddings that had to be computed.
pub const CACHE_MISSES: &str = "cache_misses";

/// Best similarity score seen in a ranking pass.
pub const TOP_SCORE: &str = "top_score";

/// Byte length of a prompt.
pub const PROMPT_LEN: &str = "prompt_len";

/// Byte length of a model response.
pub const RESPONSE_LEN: &str = "response_len";

// ─── Inference fields ──────────────────────────────────────────────────────

/// Model name used for inference.
pub const MODEL: &str = "model";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
