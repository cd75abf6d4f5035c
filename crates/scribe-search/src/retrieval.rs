//! Semantic retrieval over workspace pages.

use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, trace, warn};

use scribe_core::defaults;
use scribe_core::{Document, EmbeddingBackend, Error, PageQuery, Result, Vector, WorkspaceClient};

use crate::cache::EmbeddingCache;
use crate::similarity::cosine_similarity;

/// Retrieval tuning knobs. Defaults come from [`scribe_core::defaults`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrievalConfig {
    /// Candidates must score strictly above this to be returned.
    pub relevance_floor: f32,
    /// Pages fetched per search.
    pub page_size: usize,
    /// Title embeddings computed concurrently.
    pub embed_concurrency: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            relevance_floor: defaults::RELEVANCE_FLOOR,
            page_size: defaults::FETCH_PAGE_SIZE,
            embed_concurrency: defaults::EMBED_CONCURRENCY,
        }
    }
}

/// A document paired with its similarity to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub score: f32,
    pub document: Document,
}

/// Ranks workspace pages against free-text queries by title embedding.
pub struct SemanticRetriever {
    workspace: Arc<dyn WorkspaceClient>,
    embedder: Arc<dyn EmbeddingBackend>,
    cache: EmbeddingCache,
    config: RetrievalConfig,
}

impl SemanticRetriever {
    pub fn new(
        workspace: Arc<dyn WorkspaceClient>,
        embedder: Arc<dyn EmbeddingBackend>,
        cache: EmbeddingCache,
    ) -> Self {
        Self {
            workspace,
            embedder,
            cache,
            config: RetrievalConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RetrievalConfig) -> Self {
        self.config = config;
        self
    }

    pub fn cache(&self) -> &EmbeddingCache {
        &self.cache
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Up to `limit` documents relevant to `query`, best first.
    ///
    /// A blank query returns the `limit` most recently edited documents and
    /// performs no embedding work.
    #[instrument(skip(self), fields(subsystem = "search", component = "retriever", op = "search"))]
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<Document>> {
        let start = Instant::now();

        let pages = self
            .workspace
            .search_pages(PageQuery::recent(self.config.page_size))
            .await
            .map_err(|e| Error::Search(format!("Failed to fetch pages: {}", e)))?;

        if pages.is_empty() {
            info!("No pages accessible in workspace");
            return Ok(vec![]);
        }

        if query.trim().is_empty() {
            debug!(candidate_count = pages.len(), "Blank query, returning most recent pages");
            return Ok(pages.into_iter().take(limit).collect());
        }

        let candidate_count = pages.len();
        let before = self.cache.stats();
        let ranked = self.rank(query, pages).await?;
        let top_score = ranked.first().map(|c| c.score).unwrap_or(0.0);
        let after = self.cache.stats();

        let results: Vec<Document> = ranked
            .into_iter()
            .filter(|c| c.score > self.config.relevance_floor)
            .take(limit)
            .map(|c| c.document)
            .collect();

        info!(
            candidate_count,
            result_count = results.len(),
            cache_hits = after.hits - before.hits,
            cache_misses = after.misses - before.misses,
            top_score = format_args!("{:.3}", top_score),
            duration_ms = start.elapsed().as_millis() as u64,
            "Semantic search complete"
        );
        Ok(results)
    }

    /// The `limit` most recently edited documents.
    pub async fn list_recent(&self, limit: usize) -> Result<Vec<Document>> {
        self.search("", limit).await
    }

    /// Best single match for a title, if any clears the relevance floor.
    pub async fn resolve(&self, title: &str) -> Result<Option<Document>> {
        Ok(self.search(title, 1).await?.into_iter().next())
    }

    /// Score every candidate against `query`, best first, unfiltered.
    ///
    /// Candidates whose title cannot be embedded are left out. Ties keep
    /// their original order.
    pub async fn rank(&self, query: &str, candidates: Vec<Document>) -> Result<Vec<ScoredCandidate>> {
        let query_vector = self.embedder.embed_text(query).await?;

        // Collected before streaming so the search future stays Send.
        let pending: Vec<_> = candidates
            .iter()
            .map(|doc| self.title_embedding(doc))
            .collect();
        let title_vectors: Vec<Option<Vector>> = stream::iter(pending)
            .buffered(self.config.embed_concurrency.max(1))
            .collect()
            .await;

        let mut scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .zip(title_vectors)
            .filter_map(|(document, vector)| {
                let score = cosine_similarity(&query_vector, &vector?);
                trace!(document_id = %document.id, score, "Scored candidate");
                Some(ScoredCandidate { score, document })
            })
            .collect();

        // sort_by is stable
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(scored)
    }

    /// Cached or freshly computed title embedding; `None` if embedding failed.
    async fn title_embedding(&self, doc: &Document) -> Option<Vector> {
        if let Some(vector) = self.cache.lookup(&doc.id, &doc.title) {
            return Some(vector);
        }

        match self.embedder.embed_text(&doc.title).await {
            Ok(vector) => {
                self.cache.put(&doc.id, &doc.title, vector.clone());
                Some(vector)
            }
            Err(e) => {
                warn!(
                    document_id = %doc.id,
                    error = %e,
                    "Title embedding failed, excluding document from ranking"
                );
                None
            }
        }
    }
}
