//! Capability interfaces between the orchestrator and its collaborators.
//!
//! Each trait is the narrow slice of a service the pipeline needs, so tests
//! can substitute any stage.

use crate::core::{JobRecord, UserProfile};
use crate::embeddings::EmbeddingService;
use crate::error::Result;
use crate::ranking::{FeatureBuilder, FeatureMatrix, FeatureRow, LtrModelService, RecallSignal};
use crate::search::VectorStore;

/// Keyword and vector recall over the job corpus.
pub trait RecallSource: Send + Sync {
    fn keyword_recall(&self, query: &str, top_k: usize) -> Vec<(String, f32)>;
    fn vector_recall(&self, vector: &[f32], top_k: usize) -> Vec<(String, f32)>;
    fn job(&self, id: &str) -> Option<JobRecord>;
}

/// Query text to vector.
pub trait QueryEmbedder: Send + Sync {
    fn embed_query(&self, text: &str) -> Result<Vec<f32>>;
}

/// Candidate feature extraction.
pub trait FeatureSource: Send + Sync {
    fn build(&self, profile: &UserProfile, jobs: &[JobRecord], recall: &[RecallSignal]) -> FeatureMatrix;
}

/// Candidate scoring.
pub trait RankingSource: Send + Sync {
    /// Whether a model is available to score with.
    fn is_ready(&self) -> bool;
    fn score(&self, rows: &[FeatureRow]) -> Result<Vec<f32>>;
}

impl RecallSource for VectorStore {
    fn keyword_recall(&self, query: &str, top_k: usize) -> Vec<(String, f32)> {
        self.keyword_search(query, top_k)
    }

    fn vector_recall(&self, vector: &[f32], top_k: usize) -> Vec<(String, f32)> {
        self.vector_search(vector, top_k)
    }

    fn job(&self, id: &str) -> Option<JobRecord> {
        self.get(id)
    }
}

impl QueryEmbedder for EmbeddingService {
    fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed(text))
    }
}

impl FeatureSource for FeatureBuilder {
    fn build(&self, profile: &UserProfile, jobs: &[JobRecord], recall: &[RecallSignal]) -> FeatureMatrix {
        self.build_features(profile, jobs, recall)
    }
}

impl RankingSource for LtrModelService {
    fn is_ready(&self) -> bool {
        self.is_loaded()
    }

    fn score(&self, rows: &[FeatureRow]) -> Result<Vec<f32>> {
        Ok(self.predict_batch(rows))
    }
}
