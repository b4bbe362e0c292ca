//! Human-readable recommendation reasons from score thresholds.

use crate::core::parse::parse_salary_range;
use crate::core::{JobRecord, UserProfile};

/// Keyword score above which skills "strongly" match.
pub const STRONG_KEYWORD_THRESHOLD: f32 = 0.7;
const PARTIAL_KEYWORD_THRESHOLD: f32 = 0.4;
const STRONG_VECTOR_THRESHOLD: f32 = 0.8;
const VECTOR_THRESHOLD: f32 = 0.6;
const STRONG_LTR_THRESHOLD: f32 = 0.8;

/// Scores a reason is derived from.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReasonScores {
    pub keyword: f32,
    pub vector: f32,
    pub ltr: Option<f32>,
}

/// Reasons for recommending `job` to `profile`, strongest first.
///
/// Never empty: a job with no notable signal gets a generic reason.
pub fn explain_match(scores: ReasonScores, job: &JobRecord, profile: &UserProfile) -> Vec<String> {
    let mut reasons = Vec::new();

    if scores.keyword > STRONG_KEYWORD_THRESHOLD {
        reasons.push("skills strongly match".to_string());
    } else if scores.keyword > PARTIAL_KEYWORD_THRESHOLD {
        reasons.push("skills partially match".to_string());
    }

    if scores.vector > STRONG_VECTOR_THRESHOLD {
        reasons.push("highly similar role".to_string());
    } else if scores.vector > VECTOR_THRESHOLD {
        reasons.push("similar role".to_string());
    }

    if scores.ltr.is_some_and(|ltr| ltr > STRONG_LTR_THRESHOLD) {
        reasons.push("top pick for your profile".to_string());
    }

    let location = job.location.to_lowercase();
    if !location.is_empty()
        && profile
            .preferred_locations
            .iter()
            .any(|preferred| !preferred.trim().is_empty() && location.contains(&preferred.trim().to_lowercase()))
    {
        reasons.push(format!("located in {}", job.location));
    }

    let (expected_low, expected_high) = parse_salary_range(&profile.expected_salary);
    let expected = (expected_low + expected_high) / 2.0;
    let (_, job_max) = parse_salary_range(&job.salary);
    if expected > 0.0 && job_max >= expected {
        reasons.push("meets salary expectation".to_string());
    }

    if reasons.is_empty() {
        reasons.push("related to your search".to_string());
    }
    reasons
}
