//! Job record data structure

use serde::{Deserialize, Serialize};

/// A job posting as supplied by an ingestion source.
///
/// Records are treated as immutable once stored: enrichment code works on
/// clones. Field names follow the camelCase shape job-board adapters emit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobRecord {
    /// Unique job ID
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    /// Free-text salary such as "15k-25k" or "1.5-2万"
    pub salary: String,
    /// Free-text experience requirement such as "3-5年"
    pub experience: String,
    pub education: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub benefits: Vec<String>,
    pub publish_time: String,
    pub source: String,
    pub industry: String,
    pub company_size: String,
}

impl JobRecord {
    /// Create a job with the given ID and title; everything else empty.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    /// Text fed to the inverted index: title, description and requirements.
    #[must_use]
    pub fn index_text(&self) -> String {
        let mut text = String::with_capacity(
            self.title.len() + self.description.len() + self.requirements.len() * 16,
        );
        text.push_str(&self.title);
        text.push(' ');
        text.push_str(&self.description);
        for requirement in &self.requirements {
            text.push(' ');
            text.push_str(requirement);
        }
        text
    }

    /// Text fed to the embedding provider.
    #[must_use]
    pub fn embedding_text(&self) -> String {
        format!(
            "{} {} {} {}",
            self.title,
            self.company,
            self.description,
            self.requirements.join(" ")
        )
    }
}
