//! Notion REST client.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{json, Value as JsonValue};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

use scribe_core::defaults;
use scribe_core::{Block, Document, Error, PageQuery, Result, WorkspaceClient};

use crate::types::*;

/// Default Notion API endpoint.
pub const DEFAULT_NOTION_URL: &str = "https://api.notion.com/v1";

/// Notion API version sent with every request.
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// Configuration for the Notion client.
#[derive(Debug, Clone)]
pub struct NotionConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// Integration token.
    pub api_key: String,
    /// Value of the `Notion-Version` header.
    pub notion_version: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl NotionConfig {
    /// Config with default endpoint, version and timeout.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_NOTION_URL.to_string(),
            api_key: api_key.into(),
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
            timeout_seconds: defaults::HTTP_TIMEOUT_SECS,
        }
    }

    /// Create from environment variables.
    ///
    /// Reads:
    /// - `NOTION_API_KEY` (required)
    /// - `NOTION_BASE_URL` (default: https://api.notion.com/v1)
    /// - `NOTION_VERSION` (default: 2022-06-28)
    /// - `HTTP_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("NOTION_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| Error::Config("NOTION_API_KEY must be set".to_string()))?;

        Ok(Self {
            base_url: std::env::var("NOTION_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_NOTION_URL.to_string()),
            api_key,
            notion_version: std::env::var("NOTION_VERSION")
                .unwrap_or_else(|_| DEFAULT_NOTION_VERSION.to_string()),
            timeout_seconds: std::env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::HTTP_TIMEOUT_SECS),
        })
    }
}

/// Notion workspace client.
pub struct NotionClient {
    client: Client,
    config: NotionConfig,
}

impl NotionClient {
    /// Create a new client. Fails if the token is blank.
    pub fn new(config: NotionConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::Config("NOTION_API_KEY must be set".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "notion",
            component = "client",
            base_url = %config.base_url,
            notion_version = %config.notion_version,
            timeout_secs = config.timeout_seconds,
            "Initializing Notion client"
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(NotionConfig::from_env()?)
    }

    /// Get the current configuration.
    pub fn config(&self) -> &NotionConfig {
        &self.config
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        self.client
            .request(method, &url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Notion-Version", &self.config.notion_version)
    }

    /// Send a request and decode the JSON body, mapping Notion error bodies.
    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let response = req
            .send()
            .await
            .map_err(|e| Error::Workspace(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body: NotionErrorBody = response.json().await.unwrap_or(NotionErrorBody {
                status: status.as_u16(),
                code: "unknown".to_string(),
                message: "Unknown error".to_string(),
            });
            return Err(match body.code.as_str() {
                "object_not_found" => Error::NotFound(body.message),
                _ => Error::Workspace(format!(
                    "Notion returned {} ({}): {}",
                    status, body.code, body.message
                )),
            });
        }

        response
            .json()
            .await
            .map_err(|e| Error::Workspace(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl WorkspaceClient for NotionClient {
    #[instrument(skip(self), fields(subsystem = "notion", component = "client", op = "search_pages", page_size = query.page_size))]
    async fn search_pages(&self, query: PageQuery) -> Result<Vec<Document>> {
        let start = Instant::now();
        let body = SearchRequest::from(query);

        let response: ListResponse<PageObject> = self
            .send(self.request(Method::POST, "/search").json(&body))
            .await?;

        let docs: Vec<Document> = response
            .results
            .into_iter()
            .map(PageObject::into_document)
            .collect();

        debug!(
            result_count = docs.len(),
            has_more = response.has_more,
            duration_ms = start.elapsed().as_millis() as u64,
            "Page search complete"
        );
        Ok(docs)
    }

    #[instrument(skip(self), fields(subsystem = "notion", component = "client", op = "get_blocks", document_id = %page_id))]
    async fn get_blocks(&self, page_id: &str) -> Result<Vec<Block>> {
        let endpoint = format!(
            "/blocks/{}/children?page_size={}",
            page_id,
            defaults::BLOCK_PAGE_SIZE
        );
        let response: ListResponse<JsonValue> =
            self.send(self.request(Method::GET, &endpoint)).await?;

        let blocks: Vec<Block> = response.results.iter().map(block_from_raw).collect();
        debug!(result_count = blocks.len(), "Fetched page blocks");
        Ok(blocks)
    }

    #[instrument(skip(self, children), fields(subsystem = "notion", component = "client", op = "create_page"))]
    async fn create_page(
        &self,
        parent_id: &str,
        title: &str,
        children: Vec<Block>,
    ) -> Result<Document> {
        let body = create_page_body(parent_id, title, &children);
        let page: PageObject = self
            .send(self.request(Method::POST, "/pages").json(&body))
            .await?;

        let mut doc = page.into_document();
        doc.title = title.to_string();
        info!(document_id = %doc.id, "Created page");
        Ok(doc)
    }

    #[instrument(skip(self, blocks), fields(subsystem = "notion", component = "client", op = "append_blocks", document_id = %page_id, block_count = blocks.len()))]
    async fn append_blocks(&self, page_id: &str, blocks: Vec<Block>) -> Result<()> {
        let body = json!({
            "children": blocks.iter().map(block_to_raw).collect::<Vec<_>>()
        });
        let _: JsonValue = self
            .send(
                self.request(Method::PATCH, &format!("/blocks/{}/children", page_id))
                    .json(&body),
            )
            .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(subsystem = "notion", component = "client", op = "update_page", document_id = %page_id))]
    async fn update_page(&self, page_id: &str, archived: bool) -> Result<()> {
        let _: JsonValue = self
            .send(
                self.request(Method::PATCH, &format!("/pages/{}", page_id))
                    .json(&json!({ "archived": archived })),
            )
            .await?;
        Ok(())
    }
}
