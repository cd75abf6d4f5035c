//! In-process workspace for tests.
//!
//! Pages are kept in recency order (index 0 is the most recently edited), so
//! `search_pages` with [`PageOrder::LastEditedDesc`](scribe_core::PageOrder)
//! returns them as inserted by [`InMemoryWorkspace::with_page`]. Every trait
//! call is counted so tests can assert that an operation did or did not reach
//! the workspace.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use scribe_core::{Block, Document, Error, PageQuery, Result, WorkspaceClient};

/// Per-operation call counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkspaceCalls {
    pub search: usize,
    pub get_blocks: usize,
    pub create: usize,
    pub append: usize,
    pub update: usize,
}

impl WorkspaceCalls {
    /// Calls that change workspace state.
    pub fn writes(&self) -> usize {
        self.create + self.append + self.update
    }
}

#[derive(Default)]
struct State {
    pages: Vec<Document>,
    blocks: HashMap<String, Vec<Block>>,
    archived: HashSet<String>,
    calls: WorkspaceCalls,
    unavailable: bool,
    next_id: u64,
}

/// Call-counting in-memory [`WorkspaceClient`].
#[derive(Clone, Default)]
pub struct InMemoryWorkspace {
    state: Arc<Mutex<State>>,
}

impl InMemoryWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page; earlier pages are treated as more recently edited.
    pub fn with_page(self, doc: Document) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.pages.push(doc);
        }
        self
    }

    /// Set the content blocks of a page.
    pub fn with_blocks(self, page_id: &str, blocks: Vec<Block>) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.blocks.insert(page_id.to_string(), blocks);
        }
        self
    }

    /// Make every subsequent call fail as if the service were down.
    pub fn unavailable(self) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.unavailable = true;
        }
        self
    }

    /// Rename a page in place, as an external edit would.
    pub fn rename(&self, page_id: &str, title: &str) {
        if let Ok(mut state) = self.state.lock() {
            if let Some(page) = state.pages.iter_mut().find(|p| p.id == page_id) {
                page.title = title.to_string();
            }
        }
    }

    pub fn calls(&self) -> WorkspaceCalls {
        self.state.lock().map(|s| s.calls).unwrap_or_default()
    }

    pub fn blocks_of(&self, page_id: &str) -> Vec<Block> {
        self.state
            .lock()
            .ok()
            .and_then(|s| s.blocks.get(page_id).cloned())
            .unwrap_or_default()
    }

    pub fn is_archived(&self, page_id: &str) -> bool {
        self.state
            .lock()
            .map(|s| s.archived.contains(page_id))
            .unwrap_or(false)
    }

    /// Titles of live pages in recency order.
    pub fn titles(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|s| s.pages.iter().map(|p| p.title.clone()).collect())
            .unwrap_or_default()
    }

    /// Lock state, count the call, and fail if the workspace is down.
    fn enter(&self, count: impl FnOnce(&mut WorkspaceCalls)) -> Result<MutexGuard<'_, State>> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| Error::Internal("workspace state poisoned".to_string()))?;
        count(&mut state.calls);
        if state.unavailable {
            return Err(Error::Workspace("workspace unavailable".to_string()));
        }
        Ok(state)
    }

    fn require_page(state: &State, page_id: &str) -> Result<()> {
        if state.pages.iter().any(|p| p.id == page_id) {
            Ok(())
        } else {
            Err(Error::NotFound(format!("page {}", page_id)))
        }
    }
}

#[async_trait]
impl WorkspaceClient for InMemoryWorkspace {
    async fn search_pages(&self, query: PageQuery) -> Result<Vec<Document>> {
        let state = self.enter(|c| c.search += 1)?;
        Ok(state.pages.iter().take(query.page_size).cloned().collect())
    }

    async fn get_blocks(&self, page_id: &str) -> Result<Vec<Block>> {
        let state = self.enter(|c| c.get_blocks += 1)?;
        Self::require_page(&state, page_id)?;
        Ok(state.blocks.get(page_id).cloned().unwrap_or_default())
    }

    async fn create_page(
        &self,
        parent_id: &str,
        title: &str,
        children: Vec<Block>,
    ) -> Result<Document> {
        let mut state = self.enter(|c| c.create += 1)?;
        Self::require_page(&state, parent_id)?;

        state.next_id += 1;
        let id = format!("created-{}", state.next_id);
        let mut doc = Document::new(id.clone(), title);
        doc.url = format!("https://www.notion.so/{}", id);

        state.pages.insert(0, doc.clone());
        state.blocks.insert(id, children);
        Ok(doc)
    }

    async fn append_blocks(&self, page_id: &str, blocks: Vec<Block>) -> Result<()> {
        let mut state = self.enter(|c| c.append += 1)?;
        Self::require_page(&state, page_id)?;
        state
            .blocks
            .entry(page_id.to_string())
            .or_default()
            .extend(blocks);
        Ok(())
    }

    async fn update_page(&self, page_id: &str, archived: bool) -> Result<()> {
        let mut state = self.enter(|c| c.update += 1)?;
        Self::require_page(&state, page_id)?;
        if archived {
            state.pages.retain(|p| p.id != page_id);
            state.archived.insert(page_id.to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workspace() -> InMemoryWorkspace {
        InMemoryWorkspace::new()
            .with_page(Document::new("a", "Newest"))
            .with_page(Document::new("b", "Older"))
    }

    #[tokio::test]
    async fn test_search_respects_page_size_and_order() {
        let ws = workspace();
        let docs = ws.search_pages(PageQuery::recent(1)).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "a");
        assert_eq!(ws.calls().search, 1);
    }

    #[tokio::test]
    async fn test_create_puts_page_first() {
        let ws = workspace();
        let doc = ws
            .create_page("a", "Fresh", vec![Block::paragraph("body")])
            .await
            .unwrap();
        assert_eq!(ws.titles(), vec!["Fresh", "Newest", "Older"]);
        assert_eq!(ws.blocks_of(&doc.id), vec![Block::paragraph("body")]);
    }

    #[tokio::test]
    async fn test_archive_removes_page() {
        let ws = workspace();
        ws.update_page("b", true).await.unwrap();
        assert!(ws.is_archived("b"));
        assert_eq!(ws.titles(), vec!["Newest"]);
    }

    #[tokio::test]
    async fn test_writes_count_only_mutations() {
        let ws = workspace();
        ws.search_pages(PageQuery::recent(10)).await.unwrap();
        ws.get_blocks("a").await.unwrap();
        assert_eq!(ws.calls().writes(), 0);

        ws.append_blocks("a", vec![Block::todo("x")]).await.unwrap();
        ws.update_page("b", true).await.unwrap();
        assert_eq!(ws.calls().writes(), 2);
    }

    #[tokio::test]
    async fn test_unavailable_counts_and_fails() {
        let ws = workspace().unavailable();
        assert!(ws.search_pages(PageQuery::recent(10)).await.is_err());
        assert_eq!(ws.calls().search, 1);
    }

    #[tokio::test]
    async fn test_unknown_page_is_not_found() {
        let ws = workspace();
        let err = ws.append_blocks("zzz", vec![]).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
