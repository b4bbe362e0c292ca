//! Feature extraction for learning-to-rank.
//!
//! Maps (profile, job, recall signal) to a fixed row of 24 numbers. The
//! order of [`FEATURE_NAMES`] is a contract with every trained model: a
//! change here requires retraining. Extraction is total; unparseable text
//! yields 0 and every emitted value is finite.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::parse::{company_size_level, education_level, parse_salary_range, parse_years};
use crate::core::{JobRecord, UserProfile};
use crate::search::tokenizer::token_set;

/// Number of features per row.
pub const FEATURE_COUNT: usize = 24;

/// One feature row in contract order.
pub type FeatureRow = [f32; FEATURE_COUNT];

/// Cap for the days-since-application feature.
pub const MAX_DAYS_SINCE_APPLICATION: u32 = 999;

/// Weight for requirements missing from the skill table.
pub const DEFAULT_SKILL_WEIGHT: f32 = 0.5;

/// Feature names in contract order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    // keyword
    "exact_skill_matches",
    "partial_skill_matches",
    "skill_coverage",
    "weighted_skill_score",
    // semantic
    "vector_similarity",
    "keyword_similarity",
    "fused_similarity",
    "description_overlap",
    // profile
    "experience_years",
    "education_level",
    "skill_count",
    "project_count",
    // job
    "salary_min",
    "salary_max",
    "required_experience",
    "company_size",
    // behavioral
    "days_since_application",
    "click_through_rate",
    "category_preference",
    "location_preferred",
    // interaction
    "salary_gap",
    "location_match",
    "industry_match",
    "company_size_match",
];

static SKILL_WEIGHTS: LazyLock<HashMap<&'static str, f32>> = LazyLock::new(|| {
    [
        ("react", 1.0),
        ("vue", 0.9),
        ("typescript", 0.9),
        ("javascript", 0.8),
        ("node.js", 0.8),
        ("rust", 1.0),
        ("go", 0.9),
        ("java", 0.9),
        ("python", 0.9),
        ("spring", 0.8),
        ("kubernetes", 0.8),
        ("docker", 0.7),
        ("linux", 0.6),
        ("sql", 0.7),
        ("mysql", 0.7),
        ("postgresql", 0.7),
        ("redis", 0.6),
        ("kafka", 0.7),
        ("pytorch", 0.9),
        ("machine learning", 1.0),
        ("前端", 0.8),
        ("后端", 0.8),
        ("css", 0.5),
    ]
    .into_iter()
    .collect()
});

/// Importance of a requirement; unknown skills weigh 0.5.
#[must_use]
pub fn skill_weight(skill: &str) -> f32 {
    SKILL_WEIGHTS
        .get(skill.trim().to_lowercase().as_str())
        .copied()
        .unwrap_or(DEFAULT_SKILL_WEIGHT)
}

/// Skills in the weight table, used to pull skills out of resume text.
pub fn known_skills() -> impl Iterator<Item = &'static str> {
    SKILL_WEIGHTS.keys().copied()
}

/// Recall-stage scores for one job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RecallSignal {
    pub keyword_score: f32,
    pub vector_score: f32,
    /// Blended recall score
    pub recall_score: f32,
}

/// Rows positionally paired with the input jobs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureMatrix {
    pub features: Vec<FeatureRow>,
    pub feature_names: Vec<String>,
}

impl FeatureMatrix {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Stateless builder for [`FeatureRow`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureBuilder;

impl FeatureBuilder {
    pub fn new() -> Self {
        Self
    }

    /// One row per job; a job without a recall entry gets zero semantic
    /// scores.
    pub fn build_features(
        &self,
        profile: &UserProfile,
        jobs: &[JobRecord],
        recall: &[RecallSignal],
    ) -> FeatureMatrix {
        self.build_features_at(profile, jobs, recall, Utc::now())
    }

    /// [`build_features`](Self::build_features) with an explicit clock.
    pub fn build_features_at(
        &self,
        profile: &UserProfile,
        jobs: &[JobRecord],
        recall: &[RecallSignal],
        now: DateTime<Utc>,
    ) -> FeatureMatrix {
        let context = ProfileContext::new(profile, now);
        let features = jobs
            .iter()
            .enumerate()
            .map(|(i, job)| context.row(job, recall.get(i).copied().unwrap_or_default()))
            .collect();
        FeatureMatrix {
            features,
            feature_names: FEATURE_NAMES.iter().map(|name| (*name).to_string()).collect(),
        }
    }

    /// Row for a single job.
    pub fn build_row(
        &self,
        profile: &UserProfile,
        job: &JobRecord,
        recall: RecallSignal,
        now: DateTime<Utc>,
    ) -> FeatureRow {
        ProfileContext::new(profile, now).row(job, recall)
    }
}

/// Profile-side values computed once per request.
struct ProfileContext<'a> {
    profile: &'a UserProfile,
    skills: Vec<String>,
    summary_tokens: HashSet<String>,
    experience_years: f32,
    education: f32,
    expected_salary: f32,
    preferred_size: f32,
    days_since_application: f32,
    ctr: f32,
}

impl<'a> ProfileContext<'a> {
    fn new(profile: &'a UserProfile, now: DateTime<Utc>) -> Self {
        let (low, high) = parse_salary_range(&profile.expected_salary);
        Self {
            profile,
            skills: profile
                .skills
                .iter()
                .map(|skill| skill.trim().to_lowercase())
                .filter(|skill| !skill.is_empty())
                .collect(),
            summary_tokens: token_set(&profile.summary_text()),
            experience_years: parse_years(&profile.experience),
            education: education_level(&profile.education),
            expected_salary: (low + high) / 2.0,
            preferred_size: profile
                .preferred_company_size
                .as_deref()
                .map_or(0.0, company_size_level),
            days_since_application: profile
                .history
                .days_since_last_application(now, MAX_DAYS_SINCE_APPLICATION)
                as f32,
            ctr: profile.history.click_through_rate(),
        }
    }

    fn row(&self, job: &JobRecord, recall: RecallSignal) -> FeatureRow {
        let requirements: Vec<String> = job
            .requirements
            .iter()
            .map(|r| r.trim().to_lowercase())
            .filter(|r| !r.is_empty())
            .collect();

        let mut exact = 0.0;
        let mut partial = 0.0;
        let mut matched_weight = 0.0;
        let mut total_weight = 0.0;
        for requirement in &requirements {
            let weight = skill_weight(requirement);
            total_weight += weight;
            if self.skills.iter().any(|skill| skill == requirement) {
                exact += 1.0;
                matched_weight += weight;
            } else if self
                .skills
                .iter()
                .any(|skill| skill.contains(requirement.as_str()) || requirement.contains(skill.as_str()))
            {
                partial += 1.0;
            }
        }
        let coverage = ratio(exact, requirements.len() as f32);
        let weighted = ratio(matched_weight, total_weight);

        let (salary_min, salary_max) = parse_salary_range(&job.salary);
        let job_size = company_size_level(&job.company_size);
        let location_preferred = self.location_preferred(&job.location);

        let mut row: FeatureRow = [
            exact,
            partial,
            coverage,
            weighted,
            recall.vector_score,
            recall.keyword_score,
            recall.recall_score,
            jaccard(&self.summary_tokens, &token_set(&job.description)),
            self.experience_years,
            self.education,
            self.profile.skills.len() as f32,
            self.profile.projects.len() as f32,
            salary_min,
            salary_max,
            parse_years(&job.experience),
            job_size,
            self.days_since_application,
            self.ctr,
            self.profile.history.category_preference(&job.industry),
            bool_feature(location_preferred),
            self.salary_gap(salary_min, salary_max),
            self.location_match(&job.location, location_preferred),
            bool_feature(self.industry_match(&job.industry)),
            bool_feature(self.preferred_size > 0.0 && self.preferred_size == job_size),
        ];
        for value in &mut row {
            if !value.is_finite() {
                *value = 0.0;
            }
        }
        row
    }

    fn location_preferred(&self, location: &str) -> bool {
        let location = location.to_lowercase();
        !location.is_empty()
            && self
                .profile
                .preferred_locations
                .iter()
                .map(|preferred| preferred.trim().to_lowercase())
                .any(|preferred| !preferred.is_empty() && location.contains(&preferred))
    }

    /// 1 on a preferred location, 0.5 for remote jobs or no preference.
    fn location_match(&self, location: &str, preferred: bool) -> f32 {
        if preferred {
            return 1.0;
        }
        let lowered = location.to_lowercase();
        if self.profile.preferred_locations.is_empty()
            || lowered.contains("remote")
            || lowered.contains("远程")
        {
            0.5
        } else {
            0.0
        }
    }

    /// Relative gap between the job's midpoint and the expectation, in
    /// [-1, 1]; 0 when either side is unknown.
    fn salary_gap(&self, salary_min: f32, salary_max: f32) -> f32 {
        let job_mid = (salary_min + salary_max) / 2.0;
        if self.expected_salary <= 0.0 || job_mid <= 0.0 {
            return 0.0;
        }
        ((job_mid - self.expected_salary) / self.expected_salary).clamp(-1.0, 1.0)
    }

    fn industry_match(&self, industry: &str) -> bool {
        let industry = industry.trim();
        !industry.is_empty()
            && self
                .profile
                .preferred_industries
                .iter()
                .any(|preferred| preferred.trim().eq_ignore_ascii_case(industry))
    }
}

fn ratio(numerator: f32, denominator: f32) -> f32 {
    if denominator > 0.0 { numerator / denominator } else { 0.0 }
}

fn bool_feature(value: bool) -> f32 {
    if value { 1.0 } else { 0.0 }
}

/// Jaccard similarity of two token sets; 0 when both are empty.
#[must_use]
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f32 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f32 / union as f32
}
