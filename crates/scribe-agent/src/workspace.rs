//! Lazily-initialized workspace connection.
//!
//! The workspace client needs credentials that may be missing at startup.
//! [`WorkspaceHandle`] defers construction to the first request that needs it
//! and memoizes success. A failed initialization is returned to that request
//! as a configuration error and attempted again on the next one.

use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use scribe_core::{EmbeddingBackend, Error, Result, WorkspaceClient};
use scribe_notion::NotionClient;
use scribe_search::{EmbeddingCache, SemanticRetriever};

/// An initialized workspace: the raw client plus a retriever over it.
#[derive(Clone)]
pub struct Workspace {
    pub client: Arc<dyn WorkspaceClient>,
    pub retriever: Arc<SemanticRetriever>,
}

impl Workspace {
    pub fn new(
        client: Arc<dyn WorkspaceClient>,
        embedder: Arc<dyn EmbeddingBackend>,
        cache: EmbeddingCache,
    ) -> Self {
        let retriever = SemanticRetriever::new(client.clone(), embedder, cache);
        Self {
            client,
            retriever: Arc::new(retriever),
        }
    }
}

type Factory = Box<dyn Fn() -> BoxFuture<'static, Result<Workspace>> + Send + Sync>;

/// One-time, retry-on-failure workspace initializer.
pub struct WorkspaceHandle {
    cell: OnceCell<Workspace>,
    factory: Factory,
}

impl WorkspaceHandle {
    /// Handle that builds the workspace with `factory` on first use.
    pub fn new<F, Fut>(factory: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Workspace>> + Send + 'static,
    {
        Self {
            cell: OnceCell::new(),
            factory: Box::new(move || Box::pin(factory())),
        }
    }

    /// Handle that is already initialized.
    pub fn ready(workspace: Workspace) -> Self {
        Self {
            cell: OnceCell::new_with(Some(workspace)),
            factory: Box::new(|| {
                Box::pin(async { Err(Error::Internal("workspace already initialized".to_string())) })
            }),
        }
    }

    /// Notion-backed handle configured from the environment on first use.
    ///
    /// `embedder` and `cache` are shared across initialization attempts.
    pub fn notion_from_env(embedder: Arc<dyn EmbeddingBackend>, cache: EmbeddingCache) -> Self {
        Self::new(move || {
            let embedder = embedder.clone();
            let cache = cache.clone();
            async move {
                let client = NotionClient::from_env()?;
                Ok::<_, Error>(Workspace::new(Arc::new(client), embedder, cache))
            }
        })
    }

    /// The workspace, initializing it if needed.
    ///
    /// Any initialization failure is reported as [`Error::Config`].
    pub async fn get(&self) -> Result<&Workspace> {
        if let Some(workspace) = self.cell.get() {
            return Ok(workspace);
        }

        debug!(subsystem = "agent", component = "workspace", "Initializing workspace");
        self.cell
            .get_or_try_init(|| (self.factory)())
            .await
            .map(|workspace| {
                info!(subsystem = "agent", component = "workspace", "Workspace initialized");
                workspace
            })
            .map_err(|e| {
                warn!(subsystem = "agent", component = "workspace", error = %e, "Workspace initialization failed");
                match e {
                    Error::Config(msg) => Error::Config(msg),
                    other => Error::Config(other.to_string()),
                }
            })
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}
