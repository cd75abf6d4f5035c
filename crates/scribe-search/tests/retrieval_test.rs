//! End-to-end retrieval behavior against in-memory collaborators.

use std::sync::Arc;

use scribe_core::{Document, Error};
use scribe_inference::mock::MockEmbeddingBackend;
use scribe_notion::memory::InMemoryWorkspace;
use scribe_search::{EmbeddingCache, RetrievalConfig, SemanticRetriever};

fn doc(id: &str, title: &str) -> Document {
    Document::new(id, title)
}

fn build(ws: &InMemoryWorkspace, embedder: &MockEmbeddingBackend) -> SemanticRetriever {
    SemanticRetriever::new(
        Arc::new(ws.clone()),
        Arc::new(embedder.clone()),
        EmbeddingCache::in_memory(),
    )
}

/// Workspace of three pages and an embedder where "meeting" is close to
/// "Meeting Notes", loosely related to "Team Sync" and unrelated to groceries.
fn fixture() -> (InMemoryWorkspace, MockEmbeddingBackend) {
    let ws = InMemoryWorkspace::new()
        .with_page(doc("p1", "Grocery List"))
        .with_page(doc("p2", "Team Sync"))
        .with_page(doc("p3", "Meeting Notes"));
    let embedder = MockEmbeddingBackend::new(3)
        .with_vector("meeting", vec![1.0, 0.0, 0.0])
        .with_vector("Meeting Notes", vec![0.9, 0.1, 0.0])
        .with_vector("Team Sync", vec![0.6, 0.8, 0.0])
        .with_vector("Grocery List", vec![0.0, 0.0, 1.0]);
    (ws, embedder)
}

#[tokio::test]
async fn test_blank_query_returns_most_recent_without_embedding() {
    let (ws, embedder) = fixture();
    let retriever = build(&ws, &embedder);

    let docs = retriever.search("   ", 2).await.unwrap();

    let ids: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p2"]);
    assert_eq!(embedder.embed_call_count(), 0);
}

#[tokio::test]
async fn test_list_recent_matches_blank_search() {
    let (ws, embedder) = fixture();
    let retriever = build(&ws, &embedder);

    let docs = retriever.list_recent(5).await.unwrap();
    assert_eq!(docs.len(), 3);
    assert_eq!(embedder.embed_call_count(), 0);
}

#[tokio::test]
async fn test_results_ordered_and_floor_applied() {
    let (ws, embedder) = fixture();
    let retriever = build(&ws, &embedder);

    let docs = retriever.search("meeting", 5).await.unwrap();

    // Grocery List scores 0 and is dropped.
    let ids: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["p3", "p2"]);
}

#[tokio::test]
async fn test_results_capped_at_limit() {
    let (ws, embedder) = fixture();
    let retriever = build(&ws, &embedder);

    let docs = retriever.search("meeting", 1).await.unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].title, "Meeting Notes");
}

#[tokio::test]
async fn test_score_equal_to_floor_is_excluded() {
    let ws = InMemoryWorkspace::new().with_page(doc("p1", "Edge"));
    let embedder = MockEmbeddingBackend::new(2)
        .with_vector("q", vec![1.0, 0.0])
        .with_vector("Edge", vec![1.0, 0.0]);
    let retriever = build(&ws, &embedder).with_config(RetrievalConfig {
        relevance_floor: 1.0,
        ..RetrievalConfig::default()
    });

    assert!(retriever.search("q", 5).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_title_embedding_is_skipped() {
    let (ws, embedder) = fixture();
    let embedder = embedder.with_failure_for("Team Sync");
    let retriever = build(&ws, &embedder);

    let docs = retriever.search("meeting", 5).await.unwrap();

    let ids: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["p3"]);
    assert!(retriever.cache().get("p2").is_none());
}

#[tokio::test]
async fn test_query_embedding_failure_propagates() {
    let (ws, embedder) = fixture();
    let embedder = embedder.with_failure_for("meeting");
    let retriever = build(&ws, &embedder);

    let err = retriever.search("meeting", 5).await.unwrap_err();
    assert!(matches!(err, Error::Embedding(_)));
}

#[tokio::test]
async fn test_workspace_failure_is_search_error() {
    let (ws, embedder) = fixture();
    let ws = ws.unavailable();
    let retriever = build(&ws, &embedder);

    let err = retriever.search("meeting", 5).await.unwrap_err();
    assert!(matches!(err, Error::Search(_)));
    assert!(err.to_string().contains("Failed to fetch pages"));
    assert_eq!(embedder.embed_call_count(), 0);
}

#[tokio::test]
async fn test_repeat_search_reuses_title_embeddings() {
    let (ws, embedder) = fixture();
    let retriever = build(&ws, &embedder);

    retriever.search("meeting", 5).await.unwrap();
    let after_first = embedder.embed_call_count();
    assert_eq!(after_first, 4);

    retriever.search("meeting", 5).await.unwrap();
    assert_eq!(embedder.embed_call_count(), after_first + 1);

    let stats = retriever.cache().stats();
    assert_eq!(stats.hits, 3);
    assert_eq!(stats.misses, 3);
    assert_eq!(stats.entries, 3);
}

#[tokio::test]
async fn test_renamed_page_is_recomputed() {
    let (ws, embedder) = fixture();
    let embedder = embedder.with_vector("Standup Notes", vec![0.8, 0.2, 0.0]);
    let retriever = build(&ws, &embedder);

    retriever.search("meeting", 5).await.unwrap();
    ws.rename("p3", "Standup Notes");
    retriever.search("meeting", 5).await.unwrap();

    assert_eq!(embedder.calls_for("Standup Notes"), 1);
    assert_eq!(embedder.calls_for("Meeting Notes"), 1);
    assert_eq!(retriever.cache().get("p3").unwrap().title, "Standup Notes");
}

#[tokio::test]
async fn test_resolve_returns_best_match() {
    let (ws, embedder) = fixture();
    let retriever = build(&ws, &embedder);

    let found = retriever.resolve("meeting").await.unwrap();
    assert_eq!(found.map(|d| d.id), Some("p3".to_string()));
}

#[tokio::test]
async fn test_resolve_with_no_relevant_page_is_none() {
    let ws = InMemoryWorkspace::new().with_page(doc("p1", "Grocery List"));
    let embedder = MockEmbeddingBackend::new(3)
        .with_vector("Project Plan", vec![1.0, 0.0, 0.0])
        .with_vector("Grocery List", vec![0.0, 0.0, 1.0]);
    let retriever = build(&ws, &embedder);

    assert!(retriever.resolve("Project Plan").await.unwrap().is_none());
}

fn assert_send<T: Send>(_: &T) {}

#[tokio::test]
async fn test_search_future_is_send_and_spawnable() {
    let (ws, embedder) = fixture();
    let retriever = Arc::new(build(&ws, &embedder));

    assert_send(&retriever.search("meeting", 1));
    assert_send(&retriever.resolve("meeting"));

    let spawned = retriever.clone();
    let docs = tokio::spawn(async move { spawned.search("meeting", 1).await })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(docs[0].id, "p3");
}
