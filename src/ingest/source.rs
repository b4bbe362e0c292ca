//! Job sources feeding the ingester.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::JobRecord;
use crate::error::Result;
use crate::search::tokenizer::token_set;

/// Something that can hand over job postings.
///
/// Records are trusted as-is; no schema negotiation happens here.
pub trait JobSource: Send + Sync {
    fn name(&self) -> &str;

    /// Jobs relevant to `query`; an empty query asks for everything.
    fn fetch(&self, query: &str) -> Result<Vec<JobRecord>>;
}

/// Reads a JSON array of job records from disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    name: String,
    path: PathBuf,
}

impl JsonFileSource {
    /// Source named after the file stem.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "json".to_string());
        Self { name, path }
    }

    pub fn named(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl JobSource for JsonFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self, query: &str) -> Result<Vec<JobRecord>> {
        let content = fs::read_to_string(&self.path)?;
        let jobs: Vec<JobRecord> = serde_json::from_str(&content)?;
        let wanted = token_set(query);
        if wanted.is_empty() {
            return Ok(jobs);
        }

        let total = jobs.len();
        let matching: Vec<JobRecord> = jobs
            .into_iter()
            .filter(|job| {
                let tokens = token_set(&job.index_text());
                wanted.iter().any(|token| tokens.contains(token))
            })
            .collect();
        debug!(source = %self.name, total, matching = matching.len(), "filtered source by query");
        Ok(matching)
    }
}
