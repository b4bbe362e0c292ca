//! Job ingestion: pull from sources, embed, load into the store.

pub mod rate_limit;
pub mod source;

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::embeddings::EmbeddingService;
use crate::error::Result;
use crate::search::{StoreItem, VectorStore};

pub use rate_limit::RateLimiter;
pub use source::{JobSource, JsonFileSource};

/// Outcome of one ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub added: usize,
    /// Sources refused by the rate limiter
    pub skipped_sources: Vec<String>,
    /// Sources whose fetch failed
    pub failed_sources: Vec<String>,
}

/// Loads jobs from a set of sources into the vector store.
pub struct Ingester {
    store: Arc<VectorStore>,
    embeddings: Arc<EmbeddingService>,
    limiter: Arc<RateLimiter>,
    sources: Vec<Box<dyn JobSource>>,
}

impl Ingester {
    pub fn new(
        store: Arc<VectorStore>,
        embeddings: Arc<EmbeddingService>,
        limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            store,
            embeddings,
            limiter,
            sources: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: Box<dyn JobSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Fetch from every source, embed and add all jobs in one batch.
    ///
    /// Rate-limited and failing sources are reported, not fatal. Jobs without
    /// an id are dropped; the first occurrence of a duplicate id wins.
    pub fn ingest(&self, query: &str) -> Result<IngestReport> {
        let mut report = IngestReport::default();
        let mut seen = HashSet::new();
        let mut jobs = Vec::new();

        for source in &self.sources {
            let name = source.name();
            if let Err(err) = self.limiter.try_acquire(name) {
                warn!(source = name, error = %err, "skipping rate-limited source");
                report.skipped_sources.push(name.to_string());
                continue;
            }
            match source.fetch(query) {
                Ok(fetched) => {
                    let before = jobs.len();
                    jobs.extend(
                        fetched
                            .into_iter()
                            .filter(|job| !job.id.trim().is_empty() && seen.insert(job.id.clone())),
                    );
                    info!(source = name, jobs = jobs.len() - before, "fetched jobs");
                }
                Err(err) => {
                    warn!(source = name, error = %err, "source fetch failed");
                    report.failed_sources.push(name.to_string());
                }
            }
        }

        if jobs.is_empty() {
            return Ok(report);
        }

        let texts: Vec<String> = jobs.iter().map(|job| job.embedding_text()).collect();
        let vectors = self.embeddings.embed_many(&texts);
        let items: Vec<StoreItem> = jobs
            .into_iter()
            .zip(vectors)
            .map(|(job, vector)| StoreItem::new(job.id.clone(), vector, job))
            .collect();

        report.added = self.store.add_vectors_batch(items)?;
        info!(added = report.added, "ingestion complete");
        Ok(report)
    }
}
