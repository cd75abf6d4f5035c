//! Title-embedding cache.
//!
//! Maps a document id to the title it was embedded under and the resulting
//! vector. The cache never computes anything itself. [`EmbeddingCache::lookup`]
//! treats an entry whose title no longer matches as absent, which is how
//! renames are detected without invalidation events.
//!
//! Storage is pluggable through [`EmbeddingStore`]; the default
//! [`InMemoryEmbeddingStore`] lives for the life of the process and has no
//! eviction beyond explicit invalidation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use scribe_core::{EmbeddingEntry, Vector};
use tracing::trace;

/// Backing storage for cached embeddings.
pub trait EmbeddingStore: Send + Sync {
    fn load(&self, id: &str) -> Option<EmbeddingEntry>;

    fn save(&self, id: &str, entry: EmbeddingEntry);

    /// Remove an entry; returns whether one existed.
    fn remove(&self, id: &str) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-local store backed by a `HashMap`.
#[derive(Default)]
pub struct InMemoryEmbeddingStore {
    entries: RwLock<HashMap<String, EmbeddingEntry>>,
}

impl InMemoryEmbeddingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// Poisoned locks are recovered; every map operation is a single insert/remove.
impl EmbeddingStore for InMemoryEmbeddingStore {
    fn load(&self, id: &str) -> Option<EmbeddingEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    fn save(&self, id: &str, entry: EmbeddingEntry) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.to_string(), entry);
    }

    fn remove(&self, id: &str) -> bool {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
            .is_some()
    }

    fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Cache statistics for monitoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
    pub entries: usize,
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    invalidations: AtomicU64,
}

/// Shared handle to the embedding cache. Clones share storage and counters.
#[derive(Clone)]
pub struct EmbeddingCache {
    store: Arc<dyn EmbeddingStore>,
    counters: Arc<Counters>,
}

impl EmbeddingCache {
    pub fn new(store: Arc<dyn EmbeddingStore>) -> Self {
        Self {
            store,
            counters: Arc::new(Counters::default()),
        }
    }

    /// Cache backed by a fresh [`InMemoryEmbeddingStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryEmbeddingStore::new()))
    }

    /// Raw entry for `id`, stale or not.
    pub fn get(&self, id: &str) -> Option<EmbeddingEntry> {
        self.store.load(id)
    }

    pub fn put(&self, id: &str, title: &str, vector: Vector) {
        self.store.save(id, EmbeddingEntry::new(title, vector));
    }

    pub fn invalidate(&self, id: &str) {
        if self.store.remove(id) {
            self.counters.invalidations.fetch_add(1, Ordering::Relaxed);
            trace!(document_id = %id, "Invalidated cached embedding");
        }
    }

    /// Vector for `id` if it was computed for exactly `title`.
    ///
    /// Counts a hit or a miss; a title mismatch is a miss.
    pub fn lookup(&self, id: &str, title: &str) -> Option<Vector> {
        match self.store.load(id) {
            Some(entry) if entry.is_fresh_for(title) => {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.vector)
            }
            _ => {
                self.counters.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            invalidations: self.counters.invalidations.load(Ordering::Relaxed),
            entries: self.store.len(),
        }
    }
}

impl Default for EmbeddingCache {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_then_get() {
        let cache = EmbeddingCache::in_memory();
        cache.put("p1", "Roadmap", vec![0.1, 0.2]);

        let entry = cache.get("p1").unwrap();
        assert_eq!(entry.title, "Roadmap");
        assert_eq!(entry.vector, vec![0.1, 0.2]);
    }

    #[test]
    fn test_invalidate_removes_entry() {
        let cache = EmbeddingCache::in_memory();
        cache.put("p1", "Roadmap", vec![0.1]);
        cache.invalidate("p1");

        assert!(cache.get("p1").is_none());
        assert_eq!(cache.stats().invalidations, 1);
    }

    #[test]
    fn test_invalidate_missing_is_noop() {
        let cache = EmbeddingCache::in_memory();
        cache.invalidate("nothing");
        assert_eq!(cache.stats().invalidations, 0);
    }

    #[test]
    fn test_get_never_computes() {
        let cache = EmbeddingCache::in_memory();
        assert!(cache.get("p1").is_none());
        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[test]
    fn test_lookup_treats_renamed_title_as_miss() {
        let cache = EmbeddingCache::in_memory();
        cache.put("p1", "Roadmap", vec![1.0]);

        assert_eq!(cache.lookup("p1", "Roadmap"), Some(vec![1.0]));
        assert_eq!(cache.lookup("p1", "Roadmap v2"), None);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn test_put_overwrites_stale_entry() {
        let cache = EmbeddingCache::in_memory();
        cache.put("p1", "Old", vec![1.0]);
        cache.put("p1", "New", vec![2.0]);
        assert_eq!(cache.lookup("p1", "New"), Some(vec![2.0]));
        assert_eq!(cache.stats().entries, 1);
    }

    #[test]
    fn test_clones_share_store() {
        let cache = EmbeddingCache::in_memory();
        let clone = cache.clone();
        clone.put("p1", "T", vec![1.0]);
        assert!(cache.get("p1").is_some());
    }

    #[test]
    fn test_custom_store_is_used() {
        let store = Arc::new(InMemoryEmbeddingStore::new());
        let cache = EmbeddingCache::new(store.clone());
        cache.put("p1", "T", vec![1.0]);
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
    }
}
