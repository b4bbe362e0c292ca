use std::path::{Path, PathBuf};

use tempfile::TempDir;

use jobmatch::app::AppContext;
use jobmatch::config::Config;
use jobmatch::core::JobRecord;

/// A temporary data root plus helpers to build an `AppContext` on it.
pub struct TestRoot {
    pub dir: TempDir,
}

impl TestRoot {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp root"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(backend: &str) -> Config {
        let mut config = Config::default();
        config.store.backend = backend.to_string();
        config
    }

    pub fn context(&self, config: Config) -> AppContext {
        AppContext::new(self.path().to_path_buf(), config).expect("build app context")
    }

    /// Write `jobs` as a JSON array and return the file path.
    pub fn write_jobs(&self, name: &str, jobs: &[JobRecord]) -> PathBuf {
        let path = self.path().join(name);
        let json = serde_json::to_string_pretty(jobs).expect("serialize jobs");
        std::fs::write(&path, json).expect("write jobs file");
        path
    }
}

pub fn job(id: &str, title: &str, company: &str, location: &str, requirements: &[&str]) -> JobRecord {
    JobRecord {
        company: company.to_string(),
        location: location.to_string(),
        salary: "20k-35k".to_string(),
        experience: "3-5年".to_string(),
        description: format!("{title} at {company}"),
        requirements: requirements.iter().map(|r| (*r).to_string()).collect(),
        source: "fixture".to_string(),
        ..JobRecord::new(id, title)
    }
}
