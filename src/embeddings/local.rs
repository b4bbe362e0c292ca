//! Deterministic offline embedding
//!
//! Every token is hashed with FNV-1a; the hash picks a frequency and phase
//! and the token adds `sin(freq * (i + 1) + phase)` to each dimension i.
//! Adjacent-token bigrams contribute at half weight. The sum is
//! L2-normalized, so identical texts always produce identical unit vectors
//! with no network or model files involved.

use crate::error::Result;
use crate::search::l2_normalize;
use crate::search::tokenizer::tokenize;

use super::EmbeddingProvider;

/// Name reported by [`LocalProvider`].
pub const LOCAL_PROVIDER_NAME: &str = "local";

/// Embed `text` into a unit vector of `dim` dimensions.
///
/// Text without any token yields the zero vector.
#[must_use]
pub fn local_embedding(text: &str, dim: usize) -> Vec<f32> {
    let mut embedding = vec![0.0; dim];
    if dim == 0 {
        return embedding;
    }

    let tokens = tokenize(text);
    for token in &tokens {
        accumulate(&mut embedding, token, 1.0);
    }
    for window in tokens.windows(2) {
        let bigram = format!("{} {}", window[0], window[1]);
        accumulate(&mut embedding, &bigram, 0.5);
    }

    l2_normalize(&mut embedding);
    embedding
}

fn accumulate(embedding: &mut [f32], token: &str, weight: f32) {
    let hash = fnv1a_hash(token.as_bytes());
    // low 32 bits choose the frequency, high 32 bits the phase
    let freq = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) * std::f64::consts::PI + 0.1;
    let phase = ((hash >> 32) as f64 / u32::MAX as f64) * std::f64::consts::TAU;

    for (i, value) in embedding.iter_mut().enumerate() {
        let contribution = (freq * (i as f64 + 1.0) + phase).sin();
        *value += weight * contribution as f32;
    }
}

fn fnv1a_hash(data: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    let mut hash = FNV_OFFSET;
    for byte in data {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Provider backed by [`local_embedding`]; never fails.
#[derive(Debug, Clone)]
pub struct LocalProvider {
    dim: usize,
}

impl LocalProvider {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl EmbeddingProvider for LocalProvider {
    fn name(&self) -> &str {
        LOCAL_PROVIDER_NAME
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|text| local_embedding(text, self.dim))
            .collect())
    }
}
