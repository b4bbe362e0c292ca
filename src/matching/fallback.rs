//! Synthetic results used when the pipeline fails.

use crate::core::JobRecord;
use crate::search::tokenizer::normalize;

use super::types::MatchedJob;

/// Upper bound on synthesized jobs.
pub const FALLBACK_SIZE: usize = 3;

const TEMPLATES: [(&str, &str, u8); FALLBACK_SIZE] = [
    ("{} Engineer", "Full-time role working with {}", 60),
    ("Senior {} Engineer", "Lead projects centred on {}", 50),
    ("{} Specialist", "Contract role requiring {}", 40),
];

/// Normalized query text, or "General" when nothing is left.
fn query_label(query: &str) -> String {
    let normalized = normalize(query);
    if normalized.is_empty() {
        return "General".to_string();
    }
    normalized.chars().take(40).collect()
}

/// Build up to `limit` placeholder jobs from the raw query text alone.
pub fn synthesize(query: &str, limit: usize) -> Vec<MatchedJob> {
    let label = query_label(query);
    TEMPLATES
        .iter()
        .take(limit.min(FALLBACK_SIZE))
        .enumerate()
        .map(|(i, (title, description, score))| {
            let mut job = JobRecord::new(format!("fallback-{}", i + 1), title.replace("{}", &label));
            job.description = description.replace("{}", &label);
            job.requirements = vec![label.clone()];
            job.source = "fallback".to_string();
            MatchedJob {
                job,
                match_score: *score,
                reasons: vec!["fallback recommendation".to_string()],
                keyword_score: 0.0,
                vector_score: 0.0,
                recall_score: 0.0,
                ltr_score: None,
            }
        })
        .collect()
}
