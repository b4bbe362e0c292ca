//! User profile and behavioral history

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A candidate's profile as supplied by the boundary layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub skills: Vec<String>,
    /// Free-text experience such as "3年" or "5 years"
    pub experience: String,
    pub education: String,
    pub preferred_locations: Vec<String>,
    /// Free-text expectation such as "20k" or "15-25k"
    pub expected_salary: String,
    pub resume_text: Option<String>,
    /// Short self-description compared against job descriptions
    pub summary: String,
    pub projects: Vec<String>,
    pub preferred_industries: Vec<String>,
    pub preferred_company_size: Option<String>,
    pub history: BehaviorHistory,
}

impl UserProfile {
    /// Text used for description overlap: summary, falling back to the
    /// resume and finally to the skill list.
    #[must_use]
    pub fn summary_text(&self) -> String {
        if !self.summary.trim().is_empty() {
            return self.summary.clone();
        }
        if let Some(resume) = self.resume_text.as_deref() {
            if !resume.trim().is_empty() {
                return resume.to_string();
            }
        }
        self.skills.join(" ")
    }

    /// Whether the profile lists `skill`, ignoring case.
    #[must_use]
    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills
            .iter()
            .any(|existing| existing.eq_ignore_ascii_case(skill))
    }
}

/// Past interactions used for behavioral features.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BehaviorHistory {
    pub clicked_job_ids: Vec<String>,
    /// Number of jobs shown to the user
    pub impressions: u32,
    pub clicks: u32,
    pub last_applied: Option<DateTime<Utc>>,
    /// Affinity per industry/category in [0, 1]
    pub category_preferences: HashMap<String, f32>,
}

impl BehaviorHistory {
    /// Historical click-through rate; 0 without impressions.
    #[must_use]
    pub fn click_through_rate(&self) -> f32 {
        if self.impressions == 0 {
            return 0.0;
        }
        (self.clicks as f32 / self.impressions as f32).clamp(0.0, 1.0)
    }

    /// Whole days since the last application, capped at `cap`.
    #[must_use]
    pub fn days_since_last_application(&self, now: DateTime<Utc>, cap: u32) -> u32 {
        match self.last_applied {
            Some(at) => {
                let days = now.signed_duration_since(at).num_days().max(0);
                u32::try_from(days).unwrap_or(cap).min(cap)
            }
            None => cap,
        }
    }

    /// Preference for a category, 0 when unknown.
    #[must_use]
    pub fn category_preference(&self, category: &str) -> f32 {
        self.category_preferences
            .get(category)
            .copied()
            .filter(|value| value.is_finite())
            .unwrap_or(0.0)
    }
}
