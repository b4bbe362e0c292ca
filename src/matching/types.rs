//! Request and response shapes of `match_jobs`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{JobRecord, UserProfile};

/// Hard constraints applied after recall.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchFilters {
    /// Minimum acceptable salary in thousands per month
    pub min_salary: Option<f32>,
    /// Candidate's years of experience, matched within a tolerance
    pub experience_years: Option<f32>,
    /// Exact company-size label, e.g. "500-2000人"
    pub company_size: Option<String>,
}

/// Input of [`JobMatchOrchestrator::match_jobs`](super::JobMatchOrchestrator::match_jobs).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchRequest {
    pub query: String,
    pub user_profile: Option<UserProfile>,
    pub location: Option<String>,
    pub filters: MatchFilters,
    /// 0 selects the configured default
    pub limit: usize,
}

impl MatchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_profile(mut self, profile: UserProfile) -> Self {
        self.user_profile = Some(profile);
        self
    }

    pub fn with_filters(mut self, filters: MatchFilters) -> Self {
        self.filters = filters;
        self
    }
}

/// How a response was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Dual-channel recall ranked by the LTR model
    HybridLtr,
    /// Dual-channel recall ordered by blended recall score
    HybridRecall,
    /// Synthetic results after a pipeline failure
    Fallback,
}

impl Algorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HybridLtr => "hybrid_ltr",
            Self::HybridRecall => "hybrid_recall",
            Self::Fallback => "fallback",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ranked job flattened for the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedJob {
    #[serde(flatten)]
    pub job: JobRecord,
    /// Final score as an integer in [0, 100]
    pub match_score: u8,
    pub reasons: Vec<String>,
    pub keyword_score: f32,
    pub vector_score: f32,
    pub recall_score: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ltr_score: Option<f32>,
}

/// Output of `match_jobs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
    pub jobs: Vec<MatchedJob>,
    /// Candidates that survived the hard filters, before truncation
    pub total_count: usize,
    pub latency_ms: u64,
    pub algorithm: Algorithm,
    pub request_id: String,
}

/// Convert a [0, 1] score to the integer match score.
#[must_use]
pub fn to_match_score(score: f32) -> u8 {
    if !score.is_finite() {
        return 0;
    }
    (score * 100.0).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_score_is_clamped() {
        assert_eq!(to_match_score(0.874), 87);
        assert_eq!(to_match_score(1.7), 100);
        assert_eq!(to_match_score(-0.3), 0);
        assert_eq!(to_match_score(f32::NAN), 0);
    }

    #[test]
    fn matched_job_flattens_record() {
        let matched = MatchedJob {
            job: JobRecord::new("j1", "Rust Engineer"),
            match_score: 90,
            reasons: vec!["skills strongly match".to_string()],
            keyword_score: 1.0,
            vector_score: 0.8,
            recall_score: 0.86,
            ltr_score: None,
        };
        let value = serde_json::to_value(&matched).unwrap();
        assert_eq!(value["id"], "j1");
        assert_eq!(value["title"], "Rust Engineer");
        assert_eq!(value["matchScore"], 90);
        assert!(value.get("ltrScore").is_none());
    }

    #[test]
    fn request_deserializes_from_boundary_json() {
        let request: MatchRequest = serde_json::from_str(
            r#"{"query":"前端","limit":5,"filters":{"minSalary":20,"companySize":"500-2000人"}}"#,
        )
        .unwrap();
        assert_eq!(request.limit, 5);
        assert_eq!(request.filters.min_salary, Some(20.0));
        assert!(request.user_profile.is_none());
    }

    #[test]
    fn algorithm_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Algorithm::HybridLtr).unwrap(), "\"hybrid_ltr\"");
        assert_eq!(Algorithm::Fallback.to_string(), "fallback");
    }
}
