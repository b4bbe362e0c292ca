//! Embedding cache keyed by (provider, sha256(text)).
//!
//! Bounded caches evict oldest-inserted first: lookups use `peek`, so a hit
//! never refreshes an entry's position. A capacity of 0 keeps every entry.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};

enum Entries {
    Bounded(LruCache<String, Vec<f32>>),
    Unbounded(HashMap<String, Vec<f32>>),
}

/// Thread-safe embedding cache with hit/miss counters.
pub struct EmbeddingCache {
    entries: Mutex<Entries>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl EmbeddingCache {
    pub fn new(capacity: usize) -> Self {
        let entries = match NonZeroUsize::new(capacity) {
            Some(bound) => Entries::Bounded(LruCache::new(bound)),
            None => Entries::Unbounded(HashMap::new()),
        };
        Self {
            entries: Mutex::new(entries),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Cache key for `text` under `provider`.
    pub fn key(provider: &str, text: &str) -> String {
        let digest = Sha256::digest(text.as_bytes());
        format!("{provider}:{}", hex::encode(digest))
    }

    pub fn get(&self, key: &str) -> Option<Vec<f32>> {
        let found = match &*self.entries.lock() {
            Entries::Bounded(cache) => cache.peek(key).cloned(),
            Entries::Unbounded(map) => map.get(key).cloned(),
        };
        let counter = if found.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    pub fn insert(&self, key: String, embedding: Vec<f32>) {
        match &mut *self.entries.lock() {
            Entries::Bounded(cache) => {
                cache.put(key, embedding);
            }
            Entries::Unbounded(map) => {
                map.insert(key, embedding);
            }
        }
    }

    pub fn len(&self) -> usize {
        match &*self.entries.lock() {
            Entries::Bounded(cache) => cache.len(),
            Entries::Unbounded(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configured bound; 0 means unbounded.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}
