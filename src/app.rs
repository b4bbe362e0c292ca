use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::Config;
use crate::embeddings::{EmbeddingService, LocalProvider};
use crate::error::{MatchError, Result};
use crate::ingest::{Ingester, JsonFileSource, RateLimiter};
use crate::matching::{Collaborators, JobMatchOrchestrator, PipelineSettings};
use crate::ranking::{FeatureBuilder, LtrModelService, ModelType};
use crate::search::{InitOutcome, MemorySnapshotStore, VectorStore, open_snapshot_store};

/// Every long-lived service, built once per process.
pub struct AppContext {
    pub root: PathBuf,
    pub config: Config,
    pub store: Arc<VectorStore>,
    pub embeddings: Arc<EmbeddingService>,
    pub features: Arc<FeatureBuilder>,
    pub ranker: Arc<LtrModelService>,
    pub limiter: Arc<RateLimiter>,
    pub orchestrator: JobMatchOrchestrator,
    pub init_outcome: InitOutcome,
    pub robot_mode: bool,
    pub verbosity: u8,
}

impl AppContext {
    pub fn from_cli(cli: &crate::cli::Cli) -> Result<Self> {
        let root = match &cli.root {
            Some(root) => root.clone(),
            None => Self::find_root()?,
        };
        let config = Config::load(cli.config.as_deref(), &root)?;
        let mut ctx = Self::new(root, config)?;
        ctx.robot_mode = cli.robot;
        ctx.verbosity = cli.verbose;
        Ok(ctx)
    }

    /// Wire the services for `config`, persisting under `root/data`.
    pub fn new(root: PathBuf, config: Config) -> Result<Self> {
        let data_dir = root.join("data");
        let snapshots = match open_snapshot_store(&config.store.backend, &data_dir) {
            Ok(snapshots) => snapshots,
            Err(err @ MatchError::Config(_)) => return Err(err),
            Err(err) => {
                warn!(
                    error = %err,
                    backend = %config.store.backend,
                    "snapshot backend unavailable; keeping the store in memory"
                );
                Box::new(MemorySnapshotStore::new())
            }
        };
        let store = Arc::new(VectorStore::new(&config.store, snapshots));
        let init_outcome = store.initialize();
        debug!(outcome = ?init_outcome, backend = %config.store.backend, "vector store ready");

        let dimension = config.store.dimension;
        let embeddings = match EmbeddingService::new(&config.embedding, dimension) {
            Ok(service) => service,
            Err(err) => {
                warn!(error = %err, "embedding provider unavailable; using local embeddings");
                EmbeddingService::with_provider(
                    Arc::new(LocalProvider::new(dimension)),
                    &config.embedding,
                    dimension,
                )
            }
        };
        let embeddings = Arc::new(embeddings);

        let ranker = Arc::new(LtrModelService::new());
        let model_type: ModelType = config.ranking.model_type.parse()?;
        let model_path = config
            .ranking
            .model_path
            .as_deref()
            .map(|path| resolve(&root, path));
        ranker.load_model(model_path.as_deref(), model_type);

        let features = Arc::new(FeatureBuilder::new());
        let limiter = Arc::new(RateLimiter::new(&config.rate_limit));

        let orchestrator = JobMatchOrchestrator::new(
            Collaborators {
                recall: store.clone(),
                embedder: embeddings.clone(),
                features: features.clone(),
                ranker: ranker.clone(),
            },
            PipelineSettings {
                recall: config.recall.clone(),
                postprocess: config.postprocess.clone(),
                ranking_enabled: config.ranking.enabled,
            },
        );

        Ok(Self {
            root,
            config,
            store,
            embeddings,
            features,
            ranker,
            limiter,
            orchestrator,
            init_outcome,
            robot_mode: false,
            verbosity: 0,
        })
    }

    /// Where trained models are written when no path is given.
    pub fn model_path(&self) -> PathBuf {
        self.config
            .ranking
            .model_path
            .as_deref()
            .map_or_else(|| self.root.join("models/ranker.json"), |path| resolve(&self.root, path))
    }

    /// Ingester reading the given JSON files.
    pub fn ingester(&self, files: &[PathBuf]) -> Ingester {
        files.iter().fold(
            Ingester::new(self.store.clone(), self.embeddings.clone(), self.limiter.clone()),
            |ingester, file| ingester.with_source(Box::new(JsonFileSource::new(file))),
        )
    }

    fn find_root() -> Result<PathBuf> {
        if let Ok(root) = std::env::var("JOBMATCH_ROOT") {
            return Ok(PathBuf::from(root));
        }
        let cwd = std::env::current_dir()?;
        if let Some(found) = find_upwards(&cwd, ".jobmatch") {
            return Ok(found);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| MatchError::MissingConfig("data directory not found".to_string()))?;
        Ok(data_dir.join("jobmatch"))
    }
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

fn find_upwards(start: &Path, name: &str) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        let candidate = dir.join(name);
        if candidate.is_dir() {
            return Some(candidate);
        }
        current = dir.parent();
    }
    None
}
