//! Pluggable text embeddings
//!
//! [`EmbeddingService`] fronts one [`EmbeddingProvider`] at a time and
//! guarantees an answer: remote failures degrade to [`local_embedding`].

pub mod api;
pub mod cache;
pub mod local;
pub mod service;

pub use api::ApiProvider;
pub use cache::EmbeddingCache;
pub use local::{LocalProvider, local_embedding};
pub use service::{EmbeddingService, EmbeddingStats, build_provider};

use crate::error::Result;

/// Embedding backend.
pub trait EmbeddingProvider: Send + Sync {
    /// Stable name, used in cache keys.
    fn name(&self) -> &str;

    /// Length of every vector this provider returns.
    fn dimension(&self) -> usize;

    /// One vector per input text, in input order.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}
