//! Agent configuration from environment variables.
//!
//! Reads:
//! - `AGENT_NAME` (default: notion-notes-agent)
//! - `HOST` / `PORT` (default: 0.0.0.0 / 8000)
//! - `HTTP_TIMEOUT_SECS` (default: 30), applied to every outbound client
//! - `ASI_ONE_API_KEY`, `ASI_ONE_BASE_URL`, `ASI_ONE_MODEL` for the reasoning service
//! - `OPENAI_API_KEY`, `OPENAI_BASE_URL`, `OPENAI_EMBED_MODEL` for embeddings
//!
//! Notion settings are read separately, on first use, by
//! [`WorkspaceHandle::notion_from_env`](crate::workspace::WorkspaceHandle::notion_from_env).

use std::net::SocketAddr;

use scribe_core::defaults;
use scribe_core::{Error, Result};
use scribe_inference::openai::DEFAULT_OPENAI_URL;
use scribe_inference::OpenAIConfig;

pub const DEFAULT_AGENT_NAME: &str = "notion-notes-agent";
pub const DEFAULT_REASONING_URL: &str = "https://api.asi1.ai/v1";
pub const DEFAULT_REASONING_MODEL: &str = "asi1";

#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub agent_name: String,
    pub host: String,
    pub port: u16,
    /// Chat-completions endpoint used for classification and general answers.
    pub reasoning: OpenAIConfig,
    /// Embeddings endpoint used for semantic search.
    pub embedding: OpenAIConfig,
}

impl AgentConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // A zero timeout would fail every request.
        let timeout_seconds = var("HTTP_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|&secs| secs > 0)
            .unwrap_or(defaults::HTTP_TIMEOUT_SECS);

        let reasoning = OpenAIConfig {
            base_url: var("ASI_ONE_BASE_URL").unwrap_or_else(|| DEFAULT_REASONING_URL.to_string()),
            api_key: var("ASI_ONE_API_KEY"),
            gen_model: var("ASI_ONE_MODEL").unwrap_or_else(|| DEFAULT_REASONING_MODEL.to_string()),
            timeout_seconds,
            ..OpenAIConfig::default()
        };

        let embedding = OpenAIConfig {
            base_url: var("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string()),
            api_key: var("OPENAI_API_KEY"),
            embed_model: var("OPENAI_EMBED_MODEL")
                .unwrap_or_else(|| defaults::EMBED_MODEL.to_string()),
            timeout_seconds,
            ..OpenAIConfig::default()
        };

        Self {
            agent_name: var("AGENT_NAME").unwrap_or_else(|| DEFAULT_AGENT_NAME.to_string()),
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: var("PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::SERVER_PORT),
            reasoning,
            embedding,
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::Config(format!("Invalid listen address: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> AgentConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AgentConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let c = config(&[]);
        assert_eq!(c.agent_name, DEFAULT_AGENT_NAME);
        assert_eq!(c.port, 8000);
        assert_eq!(c.reasoning.base_url, DEFAULT_REASONING_URL);
        assert_eq!(c.reasoning.gen_model, "asi1");
        assert_eq!(c.reasoning.api_key, None);
        assert_eq!(c.embedding.base_url, DEFAULT_OPENAI_URL);
        assert_eq!(c.embedding.embed_model, "text-embedding-3-small");
        assert_eq!(c.embedding.timeout_seconds, 30);
        assert_eq!(c.socket_addr().unwrap().to_string(), "0.0.0.0:8000");
    }

    #[test]
    fn test_overrides() {
        let c = config(&[
            ("ASI_ONE_API_KEY", "asi-key"),
            ("OPENAI_API_KEY", "oa-key"),
            ("OPENAI_EMBED_MODEL", "text-embedding-3-large"),
            ("HTTP_TIMEOUT_SECS", "5"),
            ("PORT", "9100"),
            ("AGENT_NAME", "notes"),
        ]);
        assert_eq!(c.reasoning.api_key.as_deref(), Some("asi-key"));
        assert_eq!(c.embedding.api_key.as_deref(), Some("oa-key"));
        assert_eq!(c.embedding.embed_model, "text-embedding-3-large");
        assert_eq!(c.reasoning.timeout_seconds, 5);
        assert_eq!(c.port, 9100);
        assert_eq!(c.agent_name, "notes");
    }

    #[test]
    fn test_blank_and_invalid_values_fall_back() {
        let c = config(&[("ASI_ONE_API_KEY", "  "), ("PORT", "http"), ("HTTP_TIMEOUT_SECS", "-1")]);
        assert_eq!(c.reasoning.api_key, None);
        assert_eq!(c.port, 8000);
        assert_eq!(c.reasoning.timeout_seconds, 30);
    }

    #[test]
    fn test_zero_timeout_falls_back_to_default() {
        let c = config(&[("HTTP_TIMEOUT_SECS", "0")]);
        assert_eq!(c.reasoning.timeout_seconds, defaults::HTTP_TIMEOUT_SECS);
        assert_eq!(c.embedding.timeout_seconds, defaults::HTTP_TIMEOUT_SECS);
    }

    #[test]
    fn test_bad_host_is_config_error() {
        let c = config(&[("HOST", "not a host")]);
        assert!(c.socket_addr().unwrap_err().is_config());
    }
}
