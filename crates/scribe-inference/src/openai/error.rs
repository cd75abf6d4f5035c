//! Upstream error classification for OpenAI-compatible APIs.

use scribe_core::Error;

/// Which service call produced the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Embedding,
    Completion,
}

/// Error classes reported by OpenAI-compatible endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamErrorCode {
    /// Invalid authentication credentials.
    AuthenticationError,
    /// Rate limit exceeded.
    RateLimitExceeded,
    /// Model not found or not available.
    ModelNotFound,
    /// Request too large.
    ContextLengthExceeded,
    /// Server error.
    ServerError,
    /// Unknown error.
    Unknown,
}

impl UpstreamErrorCode {
    /// Determine error code from HTTP status and error type.
    pub fn from_response(status: u16, error_type: &str) -> Self {
        match (status, error_type) {
            (401, _) => Self::AuthenticationError,
            (429, _) => Self::RateLimitExceeded,
            (404, _) | (_, "model_not_found") => Self::ModelNotFound,
            (400, _) if error_type.contains("context_length") => Self::ContextLengthExceeded,
            (500..=599, _) => Self::ServerError,
            _ => Self::Unknown,
        }
    }
}

/// Convert an upstream error into a scribe Error.
///
/// Credential and model problems are configuration errors; everything else is
/// reported against the call that failed.
pub fn to_scribe_error(code: UpstreamErrorCode, kind: CallKind, message: &str) -> Error {
    let detail = match code {
        UpstreamErrorCode::AuthenticationError => {
            return Error::Config(format!("Authentication failed: {}", message))
        }
        UpstreamErrorCode::ModelNotFound => {
            return Error::Config(format!("Model not found: {}", message))
        }
        UpstreamErrorCode::RateLimitExceeded => format!("Rate limit exceeded: {}", message),
        UpstreamErrorCode::ContextLengthExceeded => format!("Context too long: {}", message),
        UpstreamErrorCode::ServerError => format!("Server error: {}", message),
        UpstreamErrorCode::Unknown => message.to_string(),
    };
    match kind {
        CallKind::Embedding => Error::Embedding(detail),
        CallKind::Completion => Error::Inference(detail),
    }
}
