use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};

/// Most texts sent to an embedding backend in one call.
pub const MAX_EMBEDDING_BATCH: usize = 100;

/// Hard ceiling on jobs returned by one match request.
pub const MAX_RESULT_LIMIT: usize = 50;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub recall: RecallConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub postprocess: PostprocessConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

impl Config {
    pub fn load(explicit_path: Option<&Path>, root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("JOBMATCH_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            if let Some(patch) = Self::load_patch(&path)? {
                config.merge_patch(patch);
            }
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_patch(&root.join("config.toml"))? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            return Ok(None);
        };
        Self::load_patch(&dir.join("jobmatch/config.toml"))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| MatchError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| MatchError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.store {
            self.store.merge(patch);
        }
        if let Some(patch) = patch.embedding {
            self.embedding.merge(patch);
        }
        if let Some(patch) = patch.recall {
            self.recall.merge(patch);
        }
        if let Some(patch) = patch.ranking {
            self.ranking.merge(patch);
        }
        if let Some(patch) = patch.postprocess {
            self.postprocess.merge(patch);
        }
        if let Some(patch) = patch.rate_limit {
            self.rate_limit.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(value) = env_string("JOBMATCH_STORE_BACKEND") {
            self.store.backend = value;
        }
        if let Some(value) = env_usize("JOBMATCH_STORE_FLUSH_THRESHOLD")? {
            self.store.flush_threshold = value;
        }
        if let Some(value) = env_bool("JOBMATCH_STORE_BOOTSTRAP_SAMPLE") {
            self.store.bootstrap_sample = value;
        }

        if let Some(value) = env_string("JOBMATCH_EMBEDDING_PROVIDER") {
            self.embedding.provider = value;
        }
        if let Some(value) = env_string("JOBMATCH_EMBEDDING_ENDPOINT") {
            self.embedding.endpoint = Some(value);
        }
        if let Some(value) = env_string("JOBMATCH_EMBEDDING_MODEL") {
            self.embedding.model = value;
        }
        if let Some(value) = env_u64("JOBMATCH_EMBEDDING_TIMEOUT_SECS")? {
            self.embedding.timeout_secs = value;
        }

        if let Some(value) = env_f32("JOBMATCH_RECALL_KEYWORD_WEIGHT")? {
            self.recall.keyword_weight = value;
        }
        if let Some(value) = env_f32("JOBMATCH_RECALL_VECTOR_WEIGHT")? {
            self.recall.vector_weight = value;
        }

        if let Some(value) = env_bool("JOBMATCH_RANKING_ENABLED") {
            self.ranking.enabled = value;
        }
        if let Some(value) = env_string("JOBMATCH_RANKING_MODEL_PATH") {
            self.ranking.model_path = Some(PathBuf::from(value));
        }

        if let Some(value) = env_usize("JOBMATCH_POSTPROCESS_MAX_PER_COMPANY")? {
            self.postprocess.max_per_company = value;
        }

        if let Some(value) = env_u64("JOBMATCH_RATE_LIMIT_WINDOW_SECS")? {
            self.rate_limit.window_secs = value;
        }
        if let Some(value) = env_usize("JOBMATCH_RATE_LIMIT_MAX_REQUESTS")? {
            self.rate_limit.max_requests = value;
        }

        Ok(())
    }

    /// Reject values that would silently break the pipeline.
    pub fn validate(&self) -> Result<()> {
        if self.store.dimension == 0 {
            return Err(MatchError::Config(
                "store.dimension must be greater than 0".to_string(),
            ));
        }
        if !matches!(self.store.backend.as_str(), "file" | "sqlite" | "memory") {
            return Err(MatchError::Config(format!(
                "unknown store backend: {}",
                self.store.backend
            )));
        }
        if !(1..=MAX_EMBEDDING_BATCH).contains(&self.embedding.batch_size) {
            return Err(MatchError::Config(format!(
                "embedding.batch_size must be between 1 and {MAX_EMBEDDING_BATCH}, got {}",
                self.embedding.batch_size
            )));
        }
        for (name, weight) in [
            ("recall.keyword_weight", self.recall.keyword_weight),
            ("recall.vector_weight", self.recall.vector_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(MatchError::Config(format!(
                    "{name} must be a non-negative number, got {weight}"
                )));
            }
        }
        if !(1..=MAX_RESULT_LIMIT).contains(&self.postprocess.max_limit) {
            return Err(MatchError::Config(format!(
                "postprocess.max_limit must be between 1 and {MAX_RESULT_LIMIT}, got {}",
                self.postprocess.max_limit
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Persistence backend: file, sqlite or memory
    #[serde(default)]
    pub backend: String,
    /// Logical key the snapshot blob is stored under
    #[serde(default)]
    pub snapshot_key: String,
    #[serde(default)]
    pub dimension: usize,
    /// Bounded keyword-result cache; oldest entry evicted first
    #[serde(default)]
    pub query_cache_size: usize,
    /// Pending mutations that trigger a snapshot write
    #[serde(default)]
    pub flush_threshold: usize,
    #[serde(default)]
    pub bootstrap_sample: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: "file".to_string(),
            snapshot_key: "vector_store".to_string(),
            dimension: 384,
            query_cache_size: 50,
            flush_threshold: 1,
            bootstrap_sample: true,
        }
    }
}

impl StoreConfig {
    fn merge(&mut self, patch: StorePatch) {
        if let Some(value) = patch.backend {
            self.backend = value;
        }
        if let Some(value) = patch.snapshot_key {
            self.snapshot_key = value;
        }
        if let Some(value) = patch.dimension {
            self.dimension = value;
        }
        if let Some(value) = patch.query_cache_size {
            self.query_cache_size = value;
        }
        if let Some(value) = patch.flush_threshold {
            self.flush_threshold = value;
        }
        if let Some(value) = patch.bootstrap_sample {
            self.bootstrap_sample = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Active backend: local or api
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub model: String,
    /// Name of the environment variable holding the bearer token
    #[serde(default)]
    pub api_key_env: String,
    #[serde(default)]
    pub timeout_secs: u64,
    /// Maximum texts per provider call
    #[serde(default)]
    pub batch_size: usize,
    /// Cached vectors kept before oldest-first eviction; 0 disables the bound
    #[serde(default)]
    pub cache_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "local".to_string(),
            endpoint: None,
            model: "text-embedding-3-small".to_string(),
            api_key_env: "JOBMATCH_EMBEDDING_API_KEY".to_string(),
            timeout_secs: 10,
            batch_size: 100,
            cache_size: 10_000,
        }
    }
}

impl EmbeddingConfig {
    fn merge(&mut self, patch: EmbeddingPatch) {
        if let Some(value) = patch.provider {
            self.provider = value;
        }
        if let Some(value) = patch.endpoint {
            self.endpoint = Some(value);
        }
        if let Some(value) = patch.model {
            self.model = value;
        }
        if let Some(value) = patch.api_key_env {
            self.api_key_env = value;
        }
        if let Some(value) = patch.timeout_secs {
            self.timeout_secs = value;
        }
        if let Some(value) = patch.batch_size {
            self.batch_size = value;
        }
        if let Some(value) = patch.cache_size {
            self.cache_size = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecallConfig {
    #[serde(default)]
    pub keyword_size: usize,
    #[serde(default)]
    pub vector_size: usize,
    #[serde(default)]
    pub keyword_weight: f32,
    #[serde(default)]
    pub vector_weight: f32,
    /// Allowed distance in years between requested and required experience
    #[serde(default)]
    pub experience_tolerance: f32,
}

impl Default for RecallConfig {
    fn default() -> Self {
        Self {
            keyword_size: 50,
            vector_size: 50,
            keyword_weight: 0.3,
            vector_weight: 0.7,
            experience_tolerance: 1.0,
        }
    }
}

impl RecallConfig {
    fn merge(&mut self, patch: RecallPatch) {
        if let Some(value) = patch.keyword_size {
            self.keyword_size = value;
        }
        if let Some(value) = patch.vector_size {
            self.vector_size = value;
        }
        if let Some(value) = patch.keyword_weight {
            self.keyword_weight = value;
        }
        if let Some(value) = patch.vector_weight {
            self.vector_weight = value;
        }
        if let Some(value) = patch.experience_tolerance {
            self.experience_tolerance = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub model_path: Option<PathBuf>,
    /// Expected artifact kind: linear, tree_ensemble or default
    #[serde(default)]
    pub model_type: String,
    #[serde(default)]
    pub learning_rate: f32,
    #[serde(default)]
    pub iterations: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model_path: None,
            model_type: "linear".to_string(),
            learning_rate: 0.01,
            iterations: 500,
        }
    }
}

impl RankingConfig {
    fn merge(&mut self, patch: RankingPatch) {
        if let Some(value) = patch.enabled {
            self.enabled = value;
        }
        if let Some(value) = patch.model_path {
            self.model_path = Some(value);
        }
        if let Some(value) = patch.model_type {
            self.model_type = value;
        }
        if let Some(value) = patch.learning_rate {
            self.learning_rate = value;
        }
        if let Some(value) = patch.iterations {
            self.iterations = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostprocessConfig {
    #[serde(default)]
    pub default_limit: usize,
    /// Hard ceiling on the number of jobs returned per request
    #[serde(default)]
    pub max_limit: usize,
    #[serde(default)]
    pub max_per_company: usize,
}

impl Default for PostprocessConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 50,
            max_per_company: 3,
        }
    }
}

impl PostprocessConfig {
    fn merge(&mut self, patch: PostprocessPatch) {
        if let Some(value) = patch.default_limit {
            self.default_limit = value;
        }
        if let Some(value) = patch.max_limit {
            self.max_limit = value;
        }
        if let Some(value) = patch.max_per_company {
            self.max_per_company = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default)]
    pub window_secs: u64,
    #[serde(default)]
    pub max_requests: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: 60,
            max_requests: 10,
        }
    }
}

impl RateLimitConfig {
    fn merge(&mut self, patch: RateLimitPatch) {
        if let Some(value) = patch.window_secs {
            self.window_secs = value;
        }
        if let Some(value) = patch.max_requests {
            self.max_requests = value;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    store: Option<StorePatch>,
    embedding: Option<EmbeddingPatch>,
    recall: Option<RecallPatch>,
    ranking: Option<RankingPatch>,
    postprocess: Option<PostprocessPatch>,
    rate_limit: Option<RateLimitPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct StorePatch {
    backend: Option<String>,
    snapshot_key: Option<String>,
    dimension: Option<usize>,
    query_cache_size: Option<usize>,
    flush_threshold: Option<usize>,
    bootstrap_sample: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct EmbeddingPatch {
    provider: Option<String>,
    endpoint: Option<String>,
    model: Option<String>,
    api_key_env: Option<String>,
    timeout_secs: Option<u64>,
    batch_size: Option<usize>,
    cache_size: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct RecallPatch {
    keyword_size: Option<usize>,
    vector_size: Option<usize>,
    keyword_weight: Option<f32>,
    vector_weight: Option<f32>,
    experience_tolerance: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
struct RankingPatch {
    enabled: Option<bool>,
    model_path: Option<PathBuf>,
    model_type: Option<String>,
    learning_rate: Option<f32>,
    iterations: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct PostprocessPatch {
    default_limit: Option<usize>,
    max_limit: Option<usize>,
    max_per_company: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct RateLimitPatch {
    window_secs: Option<u64>,
    max_requests: Option<usize>,
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key).ok().map(|value| {
        matches!(
            value.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

fn env_usize(key: &str) -> Result<Option<usize>> {
    match std::env::var(key) {
        Ok(value) => value.parse::<usize>().map(Some).map_err(|err| {
            MatchError::Config(format!("invalid {key} value {value}: {err}"))
        }),
        Err(_) => Ok(None),
    }
}

fn env_u64(key: &str) -> Result<Option<u64>> {
    match std::env::var(key) {
        Ok(value) => value.parse::<u64>().map(Some).map_err(|err| {
            MatchError::Config(format!("invalid {key} value {value}: {err}"))
        }),
        Err(_) => Ok(None),
    }
}

fn env_f32(key: &str) -> Result<Option<f32>> {
    match std::env::var(key) {
        Ok(value) => value.parse::<f32>().map(Some).map_err(|err| {
            MatchError::Config(format!("invalid {key} value {value}: {err}"))
        }),
        Err(_) => Ok(None),
    }
}
