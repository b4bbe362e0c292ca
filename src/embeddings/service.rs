//! Embedding service: provider dispatch, caching, batching and fallback.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{EmbeddingConfig, MAX_EMBEDDING_BATCH};
use crate::error::{MatchError, Result};

use super::api::{API_PROVIDER_NAME, ApiProvider};
use super::cache::EmbeddingCache;
use super::local::{LOCAL_PROVIDER_NAME, LocalProvider, local_embedding};
use super::EmbeddingProvider;

/// Build the provider called `name`.
pub fn build_provider(
    name: &str,
    config: &EmbeddingConfig,
    dim: usize,
) -> Result<Arc<dyn EmbeddingProvider>> {
    match name.trim().to_lowercase().as_str() {
        "" | LOCAL_PROVIDER_NAME => Ok(Arc::new(LocalProvider::new(dim))),
        API_PROVIDER_NAME => Ok(Arc::new(ApiProvider::new(config, dim)?)),
        other => Err(MatchError::Config(format!(
            "unknown embedding provider: {other}"
        ))),
    }
}

/// Counters reported by [`EmbeddingService::stats`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbeddingStats {
    pub provider: String,
    pub dimension: usize,
    pub cached: usize,
    pub cache_capacity: usize,
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// Chunks answered by the local fallback after a provider failure
    pub fallback_chunks: u64,
}

/// Text to vector conversion that always answers.
///
/// Cache misses are sent to the active provider in chunks of at most
/// `batch_size`. When a chunk fails, that chunk alone is embedded locally
/// and cached under the local provider's key, so a recovered remote
/// provider is asked again next time.
pub struct EmbeddingService {
    provider: RwLock<Arc<dyn EmbeddingProvider>>,
    cache: EmbeddingCache,
    fallback: LocalProvider,
    dim: usize,
    batch_size: usize,
    fallback_chunks: AtomicU64,
}

impl EmbeddingService {
    /// Service using the provider named in `config`.
    pub fn new(config: &EmbeddingConfig, dim: usize) -> Result<Self> {
        let provider = build_provider(&config.provider, config, dim)?;
        Ok(Self::with_provider(provider, config, dim))
    }

    /// Service around an already-built provider.
    pub fn with_provider(
        provider: Arc<dyn EmbeddingProvider>,
        config: &EmbeddingConfig,
        dim: usize,
    ) -> Self {
        Self {
            provider: RwLock::new(provider),
            cache: EmbeddingCache::new(config.cache_size),
            fallback: LocalProvider::new(dim),
            dim,
            batch_size: config.batch_size.clamp(1, MAX_EMBEDDING_BATCH),
            fallback_chunks: AtomicU64::new(0),
        }
    }

    /// Local-only service; handy for tests and offline tools.
    pub fn local(dim: usize) -> Self {
        Self::with_provider(
            Arc::new(LocalProvider::new(dim)),
            &EmbeddingConfig::default(),
            dim,
        )
    }

    /// Swap the active provider. Cached vectors are kept.
    pub fn set_provider(&self, name: &str, config: &EmbeddingConfig) -> Result<()> {
        let provider = build_provider(name, config, self.dim)?;
        info!(provider = provider.name(), "embedding provider switched");
        *self.provider.write() = provider;
        Ok(())
    }

    pub fn provider_name(&self) -> String {
        self.provider.read().name().to_string()
    }

    pub fn dimension(&self) -> usize {
        self.dim
    }

    /// Embed one text.
    pub fn embed(&self, text: &str) -> Vec<f32> {
        self.embed_many(&[text.to_string()])
            .into_iter()
            .next()
            .unwrap_or_else(|| local_embedding(text, self.dim))
    }

    /// Embed texts in order; the output has one vector per input.
    pub fn embed_many(&self, texts: &[String]) -> Vec<Vec<f32>> {
        let provider = Arc::clone(&*self.provider.read());
        let provider_name = provider.name().to_string();

        let mut results: Vec<Option<Vec<f32>>> = texts
            .iter()
            .map(|text| {
                self.cache
                    .get(&EmbeddingCache::key(&provider_name, text))
                    .or_else(|| {
                        // earlier fallback results for the same text
                        (provider_name != LOCAL_PROVIDER_NAME)
                            .then(|| self.cache.get(&EmbeddingCache::key(LOCAL_PROVIDER_NAME, text)))
                            .flatten()
                    })
            })
            .collect();

        let missing: Vec<usize> = results
            .iter()
            .enumerate()
            .filter_map(|(i, cached)| cached.is_none().then_some(i))
            .collect();

        for chunk in missing.chunks(self.batch_size) {
            let chunk_texts: Vec<String> = chunk.iter().map(|&i| texts[i].clone()).collect();
            let (vectors, source) = match self.dispatch(provider.as_ref(), &chunk_texts) {
                Ok(vectors) => (vectors, provider_name.as_str()),
                Err(err) => {
                    warn!(
                        provider = %provider_name,
                        error = %err,
                        chunk = chunk_texts.len(),
                        "embedding provider failed; using local fallback"
                    );
                    self.fallback_chunks.fetch_add(1, Ordering::Relaxed);
                    let vectors = chunk_texts
                        .iter()
                        .map(|text| local_embedding(text, self.dim))
                        .collect();
                    (vectors, LOCAL_PROVIDER_NAME)
                }
            };

            for ((&index, text), vector) in chunk.iter().zip(&chunk_texts).zip(vectors) {
                self.cache
                    .insert(EmbeddingCache::key(source, text), vector.clone());
                results[index] = Some(vector);
            }
        }

        debug!(
            total = texts.len(),
            computed = missing.len(),
            provider = %provider_name,
            "embedded texts"
        );

        results
            .into_iter()
            .zip(texts)
            .map(|(vector, text)| vector.unwrap_or_else(|| local_embedding(text, self.dim)))
            .collect()
    }

    /// Send `texts` straight to the active provider, without cache or
    /// fallback.
    pub fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let provider = Arc::clone(&*self.provider.read());
        self.dispatch(provider.as_ref(), texts)
    }

    fn dispatch(
        &self,
        provider: &dyn EmbeddingProvider,
        texts: &[String],
    ) -> Result<Vec<Vec<f32>>> {
        let vectors = provider.embed_batch(texts)?;
        if vectors.len() != texts.len() {
            return Err(MatchError::Provider(format!(
                "{} returned {} vectors for {} texts",
                provider.name(),
                vectors.len(),
                texts.len()
            )));
        }
        if let Some(bad) = vectors.iter().find(|vector| vector.len() != self.dim) {
            return Err(MatchError::DimensionMismatch {
                expected: self.dim,
                actual: bad.len(),
            });
        }
        Ok(vectors)
    }

    pub fn stats(&self) -> EmbeddingStats {
        EmbeddingStats {
            provider: self.provider_name(),
            dimension: self.dim,
            cached: self.cache.len(),
            cache_capacity: self.cache.capacity(),
            cache_hits: self.cache.hits(),
            cache_misses: self.cache.misses(),
            fallback_chunks: self.fallback_chunks.load(Ordering::Relaxed),
        }
    }
}
