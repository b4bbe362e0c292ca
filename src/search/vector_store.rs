//! Memory-resident job corpus with vector, keyword and hybrid retrieval.
//!
//! The store keeps three structures in step: the entries (id, vector, job)
//! in insertion order, an id -> position map, and an inverted index from
//! token to positions. All three live under one `RwLock`; the keyword result
//! cache has its own `Mutex` and is only touched while the store lock is
//! held, so a stale result can never be cached after a mutation.
//!
//! Durability is best-effort. Mutations bump a pending counter and a full
//! snapshot is written once it reaches `flush_threshold` (0 disables the
//! automatic write), on `add_vectors_batch`, or on an explicit [`flush`].
//! A failed write is logged and the in-memory state stays authoritative.
//!
//! [`flush`]: VectorStore::flush

use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::{Mutex, RwLock};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::core::JobRecord;
use crate::embeddings::local_embedding;
use crate::error::{MatchError, Result};

use super::hybrid::{FusionWeights, HybridHit, merge_weighted};
use super::persistence::SnapshotStore;
use super::sample::sample_jobs;
use super::similarity::cosine_similarity;
use super::tokenizer::{normalize, tokenize};

/// Width of each channel inside [`VectorStore::hybrid_search`].
pub const HYBRID_CHANNEL_WIDTH: usize = 50;

/// One job to insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreItem {
    pub id: String,
    pub vector: Vec<f32>,
    pub job: JobRecord,
}

impl StoreItem {
    pub fn new(id: impl Into<String>, vector: Vec<f32>, job: JobRecord) -> Self {
        Self {
            id: id.into(),
            vector,
            job,
        }
    }
}

/// What `initialize` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// Restored this many entries from the snapshot
    Loaded(usize),
    /// Snapshot missing or unreadable; seeded with the sample corpus
    Bootstrapped(usize),
    /// Nothing persisted and bootstrapping disabled
    Empty,
}

/// Introspection counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub vectors: usize,
    /// Distinct tokens in the inverted index
    pub tokens: usize,
    pub dimension: usize,
    pub pending_writes: usize,
    pub cached_queries: usize,
    pub backend: String,
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    dimension: usize,
    entries: &'a [StoreItem],
}

#[derive(Deserialize)]
struct Snapshot {
    dimension: usize,
    entries: Vec<StoreItem>,
}

#[derive(Default)]
struct StoreInner {
    entries: Vec<StoreItem>,
    positions: HashMap<String, usize>,
    index: HashMap<String, HashSet<usize>>,
    pending_writes: usize,
}

impl StoreInner {
    fn upsert(&mut self, item: StoreItem) {
        let tokens = tokenize(&item.job.index_text());
        let position = match self.positions.get(&item.id).copied() {
            Some(position) => {
                let old_tokens = tokenize(&self.entries[position].job.index_text());
                self.unindex(position, &old_tokens);
                self.entries[position] = item;
                position
            }
            None => {
                let position = self.entries.len();
                self.positions.insert(item.id.clone(), position);
                self.entries.push(item);
                position
            }
        };
        for token in tokens {
            self.index.entry(token).or_default().insert(position);
        }
    }

    fn unindex(&mut self, position: usize, tokens: &[String]) {
        for token in tokens {
            if let Some(postings) = self.index.get_mut(token) {
                postings.remove(&position);
                if postings.is_empty() {
                    self.index.remove(token);
                }
            }
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.positions.clear();
        self.index.clear();
    }
}

type QueryCache = LruCache<(String, usize), Vec<(String, f32)>>;

/// The persisted vector + keyword store.
pub struct VectorStore {
    dimension: usize,
    snapshot_key: String,
    flush_threshold: usize,
    bootstrap_sample: bool,
    snapshots: Box<dyn SnapshotStore>,
    inner: RwLock<StoreInner>,
    query_cache: Mutex<Option<QueryCache>>,
}

impl VectorStore {
    pub fn new(config: &StoreConfig, snapshots: Box<dyn SnapshotStore>) -> Self {
        Self {
            dimension: config.dimension,
            snapshot_key: config.snapshot_key.clone(),
            flush_threshold: config.flush_threshold,
            bootstrap_sample: config.bootstrap_sample,
            snapshots,
            inner: RwLock::new(StoreInner::default()),
            query_cache: Mutex::new(NonZeroUsize::new(config.query_cache_size).map(LruCache::new)),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Load the persisted snapshot, or seed the sample corpus.
    pub fn initialize(&self) -> InitOutcome {
        match self.load_snapshot() {
            Ok(Some(count)) => {
                info!(entries = count, backend = self.snapshots.name(), "loaded vector store snapshot");
                return InitOutcome::Loaded(count);
            }
            Ok(None) => debug!("no vector store snapshot"),
            Err(err) => warn!(error = %err, "failed to load vector store snapshot"),
        }

        if !self.bootstrap_sample {
            return InitOutcome::Empty;
        }
        let count = self.bootstrap();
        info!(entries = count, "bootstrapped vector store with sample corpus");
        InitOutcome::Bootstrapped(count)
    }

    /// Entries restored, or `None` when nothing was ever persisted.
    fn load_snapshot(&self) -> Result<Option<usize>> {
        let Some(bytes) = self.snapshots.get(&self.snapshot_key)? else {
            return Ok(None);
        };
        let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
        if snapshot.dimension != self.dimension {
            return Err(MatchError::DimensionMismatch {
                expected: self.dimension,
                actual: snapshot.dimension,
            });
        }
        if let Some(bad) = snapshot
            .entries
            .iter()
            .find(|entry| entry.vector.len() != self.dimension)
        {
            return Err(MatchError::DimensionMismatch {
                expected: self.dimension,
                actual: bad.vector.len(),
            });
        }

        let mut inner = self.inner.write();
        inner.clear();
        for entry in snapshot.entries {
            inner.upsert(entry);
        }
        inner.pending_writes = 0;
        self.clear_query_cache();
        Ok(Some(inner.entries.len()))
    }

    fn bootstrap(&self) -> usize {
        let items: Vec<StoreItem> = sample_jobs()
            .into_iter()
            .map(|job| {
                let vector = local_embedding(&job.embedding_text(), self.dimension);
                StoreItem::new(job.id.clone(), vector, job)
            })
            .collect();
        match self.add_vectors_batch(items) {
            Ok(count) => count,
            Err(err) => {
                warn!(error = %err, "sample bootstrap failed");
                0
            }
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Insert or replace one job.
    ///
    /// A replaced id keeps its original position, so tie-breaking by
    /// insertion order is stable across upserts.
    pub fn add_vector(&self, id: &str, vector: Vec<f32>, job: JobRecord) -> Result<()> {
        self.check_dimension(&vector)?;
        let should_flush = {
            let mut inner = self.inner.write();
            inner.upsert(StoreItem::new(id, vector, job));
            inner.pending_writes += 1;
            self.clear_query_cache();
            self.flush_threshold > 0 && inner.pending_writes >= self.flush_threshold
        };
        if should_flush {
            self.persist_best_effort();
        }
        Ok(())
    }

    /// Insert many jobs with a single snapshot write at the end.
    ///
    /// The whole batch is rejected before any mutation if one vector has
    /// the wrong dimension.
    pub fn add_vectors_batch(&self, items: Vec<StoreItem>) -> Result<usize> {
        if items.is_empty() {
            return Ok(0);
        }
        for item in &items {
            self.check_dimension(&item.vector)?;
        }

        let count = items.len();
        {
            let mut inner = self.inner.write();
            for item in items {
                inner.upsert(item);
            }
            inner.pending_writes += count;
            self.clear_query_cache();
        }
        self.persist_best_effort();
        debug!(count, "added vector batch");
        Ok(count)
    }

    /// Remove every entry and persist the empty state.
    pub fn clear_all(&self) {
        {
            let mut inner = self.inner.write();
            inner.clear();
            inner.pending_writes += 1;
            self.clear_query_cache();
        }
        self.persist_best_effort();
        info!("vector store cleared");
    }

    /// Write the snapshot now, reporting failure to the caller.
    pub fn flush(&self) -> Result<()> {
        let bytes = {
            let inner = self.inner.read();
            serde_json::to_vec(&SnapshotRef {
                dimension: self.dimension,
                entries: &inner.entries,
            })?
        };
        self.snapshots.set(&self.snapshot_key, &bytes)?;
        self.inner.write().pending_writes = 0;
        debug!(bytes = bytes.len(), backend = self.snapshots.name(), "flushed vector store");
        Ok(())
    }

    fn persist_best_effort(&self) {
        if let Err(err) = self.flush() {
            warn!(error = %err, backend = self.snapshots.name(), "vector store persistence failed");
        }
    }

    fn check_dimension(&self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dimension {
            return Err(MatchError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        Ok(())
    }

    fn clear_query_cache(&self) {
        if let Some(cache) = self.query_cache.lock().as_mut() {
            cache.clear();
        }
    }

    // =========================================================================
    // Retrieval
    // =========================================================================

    /// Top `top_k` ids by cosine similarity, ties in insertion order.
    ///
    /// A query of the wrong dimension matches nothing.
    pub fn vector_search(&self, query: &[f32], top_k: usize) -> Vec<(String, f32)> {
        if query.len() != self.dimension || top_k == 0 {
            return Vec::new();
        }
        let inner = self.inner.read();
        let mut scored: Vec<(usize, f32)> = inner
            .entries
            .par_iter()
            .enumerate()
            .map(|(position, entry)| (position, cosine_similarity(query, &entry.vector)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored
            .into_iter()
            .take(top_k)
            .map(|(position, score)| (inner.entries[position].id.clone(), score))
            .collect()
    }

    /// Top `top_k` ids by the share of distinct query tokens they contain.
    pub fn keyword_search(&self, query: &str, top_k: usize) -> Vec<(String, f32)> {
        if top_k == 0 {
            return Vec::new();
        }
        let key = (normalize(query), top_k);
        let inner = self.inner.read();
        if let Some(hits) = self
            .query_cache
            .lock()
            .as_ref()
            .and_then(|cache| cache.peek(&key).cloned())
        {
            return hits;
        }

        let mut seen = HashSet::new();
        let tokens: Vec<String> = tokenize(query)
            .into_iter()
            .filter(|token| seen.insert(token.clone()))
            .collect();
        if tokens.is_empty() {
            return Vec::new();
        }

        let mut counts: HashMap<usize, u32> = HashMap::new();
        for token in &tokens {
            if let Some(postings) = inner.index.get(token) {
                for position in postings {
                    *counts.entry(*position).or_insert(0) += 1;
                }
            }
        }

        let total = tokens.len() as f32;
        let mut scored: Vec<(usize, f32)> = counts
            .into_iter()
            .map(|(position, hits)| (position, hits as f32 / total))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        let hits: Vec<(String, f32)> = scored
            .into_iter()
            .take(top_k)
            .map(|(position, score)| (inner.entries[position].id.clone(), score))
            .collect();

        // peek + put without promotion evicts oldest-inserted first
        if let Some(cache) = self.query_cache.lock().as_mut() {
            cache.put(key, hits.clone());
        }
        hits
    }

    /// Both channels at width 50, blended 0.3 keyword / 0.7 vector.
    pub fn hybrid_search(&self, query: &str, query_vector: &[f32], top_k: usize) -> Vec<HybridHit> {
        let keyword = self.keyword_search(query, HYBRID_CHANNEL_WIDTH);
        let vector = self.vector_search(query_vector, HYBRID_CHANNEL_WIDTH);
        let mut merged = merge_weighted(&keyword, &vector, FusionWeights::default());
        merged.truncate(top_k);
        merged
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Job metadata by id.
    pub fn get(&self, id: &str) -> Option<JobRecord> {
        let inner = self.inner.read();
        inner
            .positions
            .get(id)
            .map(|position| inner.entries[*position].job.clone())
    }

    /// Stored vector by id.
    pub fn vector(&self, id: &str) -> Option<Vec<f32>> {
        let inner = self.inner.read();
        inner
            .positions
            .get(id)
            .map(|position| inner.entries[*position].vector.clone())
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }

    pub fn get_stats(&self) -> StoreStats {
        let inner = self.inner.read();
        let cached_queries = self
            .query_cache
            .lock()
            .as_ref()
            .map_or(0, LruCache::len);
        StoreStats {
            vectors: inner.entries.len(),
            tokens: inner.index.len(),
            dimension: self.dimension,
            pending_writes: inner.pending_writes,
            cached_queries,
            backend: self.snapshots.name().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::persistence::MemorySnapshotStore;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts writes and can be told to fail.
    #[derive(Default)]
    struct CountingSnapshots {
        inner: MemorySnapshotStore,
        writes: Arc<AtomicUsize>,
        fail: bool,
    }

    impl SnapshotStore for CountingSnapshots {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &[u8]) -> Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(MatchError::Persistence("disk full".to_string()));
            }
            self.inner.set(key, value)
        }
    }

    fn config(dimension: usize) -> StoreConfig {
        StoreConfig {
            dimension,
            ..StoreConfig::default()
        }
    }

    fn counting_store(dimension: usize) -> (VectorStore, Arc<AtomicUsize>) {
        let writes = Arc::new(AtomicUsize::new(0));
        let snapshots = CountingSnapshots {
            writes: Arc::clone(&writes),
            ..Default::default()
        };
        (VectorStore::new(&config(dimension), Box::new(snapshots)), writes)
    }

    fn job(id: &str, title: &str, requirements: &[&str]) -> JobRecord {
        let mut job = JobRecord::new(id, title);
        job.requirements = requirements.iter().map(|r| (*r).to_string()).collect();
        job
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    #[test]
    fn initialize_bootstraps_empty_store() {
        let store = VectorStore::new(&config(384), Box::new(MemorySnapshotStore::new()));
        assert_eq!(store.initialize(), InitOutcome::Bootstrapped(12));
        assert_eq!(store.len(), 12);
    }

    #[test]
    fn initialize_without_bootstrap_stays_empty() {
        let cfg = StoreConfig {
            bootstrap_sample: false,
            ..config(4)
        };
        let store = VectorStore::new(&cfg, Box::new(MemorySnapshotStore::new()));
        assert_eq!(store.initialize(), InitOutcome::Empty);
        assert!(store.is_empty());
    }

    #[test]
    fn initialize_ignores_corrupt_snapshot() {
        let snapshots = MemorySnapshotStore::new();
        snapshots.set("vector_store", b"not json").unwrap();
        let store = VectorStore::new(&config(384), Box::new(snapshots));
        assert!(matches!(store.initialize(), InitOutcome::Bootstrapped(_)));
        assert!(!store.is_empty());
    }

    #[test]
    fn initialize_restores_snapshot() {
        let first = VectorStore::new(&config(3), Box::new(MemorySnapshotStore::new()));
        first
            .add_vector("a", vec![1.0, 0.0, 0.0], job("a", "Rust dev", &["Rust"]))
            .unwrap();
        let bytes = first.snapshots.get("vector_store").unwrap().unwrap();

        let snapshots = MemorySnapshotStore::new();
        snapshots.set("vector_store", &bytes).unwrap();
        let second = VectorStore::new(&config(3), Box::new(snapshots));
        assert_eq!(second.initialize(), InitOutcome::Loaded(1));
        assert_eq!(second.keyword_search("rust", 5)[0].0, "a");
    }

    #[test]
    fn cleared_store_stays_empty_after_restart() {
        let first = VectorStore::new(&config(384), Box::new(MemorySnapshotStore::new()));
        first.initialize();
        first.clear_all();
        first.flush().unwrap();
        let bytes = first.snapshots.get("vector_store").unwrap().unwrap();

        let snapshots = MemorySnapshotStore::new();
        snapshots.set("vector_store", &bytes).unwrap();
        let second = VectorStore::new(&config(384), Box::new(snapshots));
        assert_eq!(second.initialize(), InitOutcome::Loaded(0));
        assert!(second.is_empty());
    }

    #[test]
    fn initialize_rejects_snapshot_of_other_dimension() {
        let first = VectorStore::new(&config(3), Box::new(MemorySnapshotStore::new()));
        first
            .add_vector("a", vec![1.0, 0.0, 0.0], JobRecord::new("a", "x"))
            .unwrap();
        let bytes = first.snapshots.get("vector_store").unwrap().unwrap();

        let snapshots = MemorySnapshotStore::new();
        snapshots.set("vector_store", &bytes).unwrap();
        let second = VectorStore::new(&config(384), Box::new(snapshots));
        assert_eq!(second.initialize(), InitOutcome::Bootstrapped(12));
        assert!(second.get("a").is_none());
    }

    // =========================================================================
    // Mutations and persistence cadence
    // =========================================================================

    #[test]
    fn add_vector_rejects_wrong_dimension() {
        let (store, writes) = counting_store(3);
        let err = store
            .add_vector("a", vec![1.0, 0.0], JobRecord::new("a", "x"))
            .unwrap_err();
        assert!(matches!(
            err,
            MatchError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        ));
        assert!(store.is_empty());
        assert_eq!(writes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn add_vector_persists_each_call_by_default() {
        let (store, writes) = counting_store(2);
        store.add_vector("a", vec![1.0, 0.0], JobRecord::new("a", "x")).unwrap();
        store.add_vector("b", vec![0.0, 1.0], JobRecord::new("b", "y")).unwrap();
        assert_eq!(writes.load(Ordering::SeqCst), 2);
        assert_eq!(store.get_stats().pending_writes, 0);
    }

    #[test]
    fn flush_threshold_batches_writes() {
        let writes = Arc::new(AtomicUsize::new(0));
        let snapshots = CountingSnapshots {
            writes: Arc::clone(&writes),
            ..Default::default()
        };
        let cfg = StoreConfig {
            flush_threshold: 3,
            ..config(2)
        };
        let store = VectorStore::new(&cfg, Box::new(snapshots));
        for i in 0..5 {
            store
                .add_vector(&format!("j{i}"), vec![1.0, i as f32], JobRecord::new(format!("j{i}"), "x"))
                .unwrap();
        }
        assert_eq!(writes.load(Ordering::SeqCst), 1);
        assert_eq!(store.get_stats().pending_writes, 2);

        store.flush().unwrap();
        assert_eq!(writes.load(Ordering::SeqCst), 2);
        assert_eq!(store.get_stats().pending_writes, 0);
    }

    #[test]
    fn batch_add_writes_once() {
        let (store, writes) = counting_store(2);
        let items = (0..20)
            .map(|i| StoreItem::new(format!("j{i}"), vec![1.0, i as f32], JobRecord::new(format!("j{i}"), "x")))
            .collect();
        assert_eq!(store.add_vectors_batch(items).unwrap(), 20);
        assert_eq!(writes.load(Ordering::SeqCst), 1);
        assert_eq!(store.len(), 20);
    }

    #[test]
    fn batch_with_bad_vector_is_rejected_whole() {
        let (store, writes) = counting_store(2);
        let items = vec![
            StoreItem::new("a", vec![1.0, 0.0], JobRecord::new("a", "x")),
            StoreItem::new("b", vec![1.0], JobRecord::new("b", "y")),
        ];
        assert!(store.add_vectors_batch(items).is_err());
        assert!(store.is_empty());
        assert_eq!(writes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn persistence_failure_is_swallowed() {
        let snapshots = CountingSnapshots {
            fail: true,
            ..Default::default()
        };
        let store = VectorStore::new(&config(2), Box::new(snapshots));
        store.add_vector("a", vec![1.0, 0.0], JobRecord::new("a", "x")).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_stats().pending_writes, 1);
        assert!(store.flush().is_err());
    }

    #[test]
    fn upsert_keeps_position_and_reindexes() {
        let (store, _) = counting_store(2);
        store.add_vector("a", vec![1.0, 0.0], job("a", "Java dev", &[])).unwrap();
        store.add_vector("b", vec![1.0, 0.0], job("b", "Go dev", &[])).unwrap();
        store.add_vector("a", vec![1.0, 0.0], job("a", "Rust dev", &[])).unwrap();

        assert_eq!(store.len(), 2);
        assert!(store.keyword_search("java", 10).is_empty());
        assert_eq!(store.keyword_search("rust", 10)[0].0, "a");

        // Equal cosine: "a" still first because it was inserted first
        let hits = store.vector_search(&[1.0, 0.0], 2);
        assert_eq!(hits[0].0, "a");
        assert_eq!(hits[1].0, "b");
    }

    #[test]
    fn clear_all_empties_everything() {
        let (store, writes) = counting_store(2);
        store.add_vector("a", vec![1.0, 0.0], job("a", "Rust dev", &[])).unwrap();
        store.keyword_search("rust", 5);
        store.clear_all();

        let stats = store.get_stats();
        assert_eq!(stats.vectors, 0);
        assert_eq!(stats.tokens, 0);
        assert_eq!(stats.cached_queries, 0);
        assert_eq!(writes.load(Ordering::SeqCst), 2);
    }

    // =========================================================================
    // Retrieval
    // =========================================================================

    #[test]
    fn vector_search_ranks_exact_match_first() {
        let (store, _) = counting_store(3);
        let items = vec![
            StoreItem::new("a", vec![1.0, 0.0, 0.0], JobRecord::new("a", "x")),
            StoreItem::new("b", vec![0.0, 1.0, 0.0], JobRecord::new("b", "y")),
            StoreItem::new("c", vec![0.7, 0.7, 0.0], JobRecord::new("c", "z")),
        ];
        store.add_vectors_batch(items).unwrap();

        let hits = store.vector_search(&[0.0, 1.0, 0.0], 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].0, "b");
        assert!((hits[0].1 - 1.0).abs() < 1e-6);
        assert_eq!(hits[1].0, "c");
    }

    #[test]
    fn vector_search_with_wrong_dimension_is_empty() {
        let (store, _) = counting_store(3);
        store.add_vector("a", vec![1.0, 0.0, 0.0], JobRecord::new("a", "x")).unwrap();
        assert!(store.vector_search(&[1.0, 0.0], 5).is_empty());
    }

    #[test]
    fn keyword_search_normalizes_by_token_count() {
        let (store, _) = counting_store(2);
        store.add_vector("a", vec![1.0, 0.0], job("a", "Frontend", &["React", "TypeScript"])).unwrap();
        store.add_vector("b", vec![1.0, 0.0], job("b", "Frontend", &["Vue"])).unwrap();

        let hits = store.keyword_search("react typescript", 10);
        assert_eq!(hits, vec![("a".to_string(), 1.0)]);

        let hits = store.keyword_search("React frontend", 10);
        assert_eq!(hits[0], ("a".to_string(), 1.0));
        assert_eq!(hits[1], ("b".to_string(), 0.5));
    }

    #[test]
    fn keyword_search_finds_skills_inside_chinese_text() {
        let (store, _) = counting_store(2);
        let mut posting = JobRecord::new("cn", "前端工程师");
        posting.description = "负责前端开发，熟悉React和TypeScript".to_string();
        store.add_vector("cn", vec![1.0, 0.0], posting).unwrap();
        store.add_vector("b", vec![1.0, 0.0], job("b", "Backend", &["Go"])).unwrap();

        let hits = store.keyword_search("React", 5);
        assert_eq!(hits, vec![("cn".to_string(), 1.0)]);
    }

    #[test]
    fn keyword_search_on_sample_prefers_react_jobs() {
        let store = VectorStore::new(&config(384), Box::new(MemorySnapshotStore::new()));
        store.initialize();

        let hits = store.keyword_search("React", 50);
        assert!(!hits.is_empty());
        for (id, _) in &hits {
            let job = store.get(id).unwrap();
            assert!(job.index_text().to_lowercase().contains("react"));
        }
    }

    #[test]
    fn keyword_cache_fills_and_clears_on_mutation() {
        let (store, _) = counting_store(2);
        store.add_vector("a", vec![1.0, 0.0], job("a", "Rust dev", &[])).unwrap();

        store.keyword_search("rust", 5);
        store.keyword_search("Rust!", 5);
        assert_eq!(store.get_stats().cached_queries, 1);

        store.add_vector("b", vec![0.0, 1.0], job("b", "Rust lead", &[])).unwrap();
        assert_eq!(store.get_stats().cached_queries, 0);
        assert_eq!(store.keyword_search("rust", 5).len(), 2);
    }

    #[test]
    fn keyword_cache_evicts_oldest_first() {
        let cfg = StoreConfig {
            query_cache_size: 2,
            ..config(2)
        };
        let store = VectorStore::new(&cfg, Box::new(MemorySnapshotStore::new()));
        store.add_vector("a", vec![1.0, 0.0], job("a", "Rust Go Java", &[])).unwrap();

        store.keyword_search("rust", 5);
        store.keyword_search("go", 5);
        store.keyword_search("rust", 5);
        store.keyword_search("java", 5);

        let cache = store.query_cache.lock();
        let cache = cache.as_ref().unwrap();
        assert!(!cache.contains(&("rust".to_string(), 5)));
        assert!(cache.contains(&("go".to_string(), 5)));
        assert!(cache.contains(&("java".to_string(), 5)));
    }

    #[test]
    fn hybrid_search_blends_channels() {
        let (store, _) = counting_store(2);
        store.add_vector("kw", vec![0.0, 1.0], job("kw", "Rust dev", &[])).unwrap();
        store.add_vector("vec", vec![1.0, 0.0], job("vec", "Go dev", &[])).unwrap();

        let hits = store.hybrid_search("rust", &[1.0, 0.0], 10);
        assert_eq!(hits[0].id, "vec");
        assert!((hits[0].score - 0.7).abs() < 1e-6);
        assert_eq!(hits[1].id, "kw");
        assert!((hits[1].score - 0.3).abs() < 1e-6);

        assert_eq!(store.hybrid_search("rust", &[1.0, 0.0], 1).len(), 1);
    }
}
