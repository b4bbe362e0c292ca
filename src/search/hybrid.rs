//! Weighted fusion for dual-channel recall
//!
//! Merges keyword and vector results by job id. A channel that did not
//! return an id contributes 0 for it:
//!
//! ```text
//! score(d) = keyword_weight * keyword(d) + vector_weight * vector(d)
//! ```
//!
//! Both the store's `hybrid_search` and the orchestrator's recall stage go
//! through [`merge_weighted`], so the two always agree on blending.

use std::collections::HashMap;

/// Default keyword channel weight.
pub const DEFAULT_KEYWORD_WEIGHT: f32 = 0.3;
/// Default vector channel weight.
pub const DEFAULT_VECTOR_WEIGHT: f32 = 0.7;

/// Channel weights for the merge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionWeights {
    pub keyword: f32,
    pub vector: f32,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            keyword: DEFAULT_KEYWORD_WEIGHT,
            vector: DEFAULT_VECTOR_WEIGHT,
        }
    }
}

impl FusionWeights {
    pub fn new(keyword: f32, vector: f32) -> Self {
        Self { keyword, vector }
    }
}

/// A merged recall candidate with its sub-scores.
#[derive(Debug, Clone, PartialEq)]
pub struct HybridHit {
    pub id: String,
    /// Blended recall score
    pub score: f32,
    pub keyword_score: f32,
    pub vector_score: f32,
}

/// Merge `(id, score)` lists from both channels.
///
/// The result is sorted by blended score, descending. Ties keep first-seen
/// order: keyword results in their order, then vector-only results in
/// theirs.
pub fn merge_weighted(
    keyword_results: &[(String, f32)],
    vector_results: &[(String, f32)],
    weights: FusionWeights,
) -> Vec<HybridHit> {
    let mut order: Vec<String> = Vec::with_capacity(keyword_results.len() + vector_results.len());
    let mut hits: HashMap<String, HybridHit> = HashMap::new();

    for (id, score) in keyword_results {
        hits.entry(id.clone())
            .and_modify(|hit| hit.keyword_score = hit.keyword_score.max(*score))
            .or_insert_with(|| {
                order.push(id.clone());
                HybridHit {
                    id: id.clone(),
                    score: 0.0,
                    keyword_score: *score,
                    vector_score: 0.0,
                }
            });
    }

    for (id, score) in vector_results {
        hits.entry(id.clone())
            .and_modify(|hit| hit.vector_score = hit.vector_score.max(*score))
            .or_insert_with(|| {
                order.push(id.clone());
                HybridHit {
                    id: id.clone(),
                    score: 0.0,
                    keyword_score: 0.0,
                    vector_score: *score,
                }
            });
    }

    let mut merged: Vec<HybridHit> = order
        .into_iter()
        .filter_map(|id| hits.remove(&id))
        .map(|mut hit| {
            hit.score = weights.keyword * hit.keyword_score + weights.vector * hit.vector_score;
            if !hit.score.is_finite() {
                hit.score = 0.0;
            }
            hit
        })
        .collect();

    // sort_by is stable, so equal scores keep first-seen order
    merged.sort_by(|a, b| b.score.total_cmp(&a.score));
    merged
}
