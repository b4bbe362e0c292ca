//! Learning-to-rank model service.
//!
//! Holds the active [`ModelArtifact`] behind a `RwLock<Arc<_>>`. Readers
//! clone the `Arc` and score without holding the lock; loading and training
//! build a complete artifact first and swap it in with one write.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{MatchError, Result};

use super::features::FeatureRow;
use super::metrics::{auc, mean_average_precision, ndcg_at_k};
use super::model::{ModelArtifact, ModelType};
use super::training::{TrainConfig, TrainingExample, fit_linear};

/// Cutoff used by [`LtrModelService::evaluate_model`].
pub const NDCG_CUTOFF: usize = 10;

/// Where the active model came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadOutcome {
    /// The requested artifact was loaded
    Artifact,
    /// The built-in default model is active
    Fallback,
}

/// Result of a training run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainReport {
    pub iterations: usize,
    pub samples: usize,
    pub final_loss: f32,
    pub version: String,
}

/// Offline evaluation of the active model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub ndcg_at_10: f32,
    pub map: f32,
    pub auc: f32,
    pub samples: usize,
    pub model_version: String,
}

/// Interchangeable ranking model.
pub struct LtrModelService {
    active: RwLock<Option<Arc<ModelArtifact>>>,
}

impl Default for LtrModelService {
    fn default() -> Self {
        Self::new()
    }
}

impl LtrModelService {
    /// Service with no model yet; the default model is installed on first
    /// prediction.
    pub fn new() -> Self {
        Self {
            active: RwLock::new(None),
        }
    }

    /// Service with the built-in model already active.
    pub fn with_default_model() -> Self {
        let service = Self::new();
        service.install(ModelArtifact::default_model());
        service
    }

    /// Load the artifact at `path` as `kind`.
    ///
    /// A missing path, unreadable file, malformed artifact or a strategy
    /// other than `kind` installs the default model instead.
    pub fn load_model(&self, path: Option<&Path>, kind: ModelType) -> LoadOutcome {
        let loaded = match (path, kind) {
            (_, ModelType::Default) | (None, _) => None,
            (Some(path), kind) => match read_artifact(path, kind) {
                Ok(artifact) => Some(artifact),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "ranking model load failed; using default model");
                    None
                }
            },
        };

        match loaded {
            Some(artifact) => {
                info!(version = %artifact.version, kind = %kind, "loaded ranking model");
                self.install(artifact);
                LoadOutcome::Artifact
            }
            None => {
                self.install(ModelArtifact::default_model());
                LoadOutcome::Fallback
            }
        }
    }

    /// Write the active model as JSON (temp file + rename).
    pub fn save_model(&self, path: &Path) -> Result<()> {
        let artifact = self.current();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(artifact.as_ref())?;
        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, json)?;

        // Atomic rename
        match std::fs::rename(&temp_path, path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                std::fs::remove_file(path)?;
                std::fs::rename(&temp_path, path)?;
                Ok(())
            }
            Err(err) => {
                let _ = std::fs::remove_file(&temp_path);
                Err(MatchError::Io(err))
            }
        }
    }

    /// Whether a model has been installed.
    pub fn is_loaded(&self) -> bool {
        self.active.read().is_some()
    }

    pub fn active_kind(&self) -> ModelType {
        self.current().model.model_type()
    }

    pub fn version(&self) -> String {
        self.current().version.clone()
    }

    /// Score one row.
    pub fn predict(&self, row: &FeatureRow) -> f32 {
        self.current().predict(row)
    }

    /// Score rows, preserving order.
    pub fn predict_batch(&self, rows: &[FeatureRow]) -> Vec<f32> {
        let model = self.current();
        rows.par_iter().map(|row| model.predict(row)).collect()
    }

    /// Fit a linear model and make it active once fitting succeeds.
    pub fn train_model(
        &self,
        examples: &[TrainingExample],
        config: &TrainConfig,
    ) -> Result<TrainReport> {
        let fit = fit_linear(examples, config)?;
        let version = format!("linear-{}", Utc::now().format("%Y%m%dT%H%M%S"));
        let artifact = ModelArtifact::linear(version.clone(), fit.weights, fit.bias);
        artifact.validate()?;
        self.install(artifact);

        info!(
            version = %version,
            samples = examples.len(),
            loss = fit.final_loss,
            "trained ranking model"
        );
        Ok(TrainReport {
            iterations: config.iterations,
            samples: examples.len(),
            final_loss: fit.final_loss,
            version,
        })
    }

    /// NDCG@10, MAP and AUC of the active model on labeled rows.
    ///
    /// Rows sharing a `query_id` form one ranked list for NDCG and MAP
    /// (rows without one form a single list); AUC is computed over all rows.
    pub fn evaluate_model(&self, examples: &[TrainingExample]) -> EvaluationReport {
        let model = self.current();
        let scores: Vec<f32> = examples
            .par_iter()
            .map(|example| model.predict(&example.features))
            .collect();
        let labels: Vec<f32> = examples.iter().map(|example| example.label).collect();

        let mut groups: BTreeMap<Option<&str>, (Vec<f32>, Vec<f32>)> = BTreeMap::new();
        for ((example, score), label) in examples.iter().zip(&scores).zip(&labels) {
            let group = groups.entry(example.query_id.as_deref()).or_default();
            group.0.push(*score);
            group.1.push(*label);
        }
        let lists: Vec<(Vec<f32>, Vec<f32>)> = groups.into_values().collect();

        let ndcg = if lists.is_empty() {
            0.0
        } else {
            lists
                .iter()
                .map(|(scores, labels)| ndcg_at_k(scores, labels, NDCG_CUTOFF))
                .sum::<f32>()
                / lists.len() as f32
        };

        debug!(samples = examples.len(), lists = lists.len(), "evaluated ranking model");
        EvaluationReport {
            ndcg_at_10: ndcg,
            map: mean_average_precision(&lists),
            auc: auc(&scores, &labels),
            samples: examples.len(),
            model_version: model.version.clone(),
        }
    }

    fn install(&self, artifact: ModelArtifact) {
        *self.active.write() = Some(Arc::new(artifact));
    }

    fn current(&self) -> Arc<ModelArtifact> {
        if let Some(model) = self.active.read().as_ref() {
            return Arc::clone(model);
        }
        let mut active = self.active.write();
        Arc::clone(active.get_or_insert_with(|| Arc::new(ModelArtifact::default_model())))
    }
}

fn read_artifact(path: &Path, kind: ModelType) -> Result<ModelArtifact> {
    let contents = std::fs::read_to_string(path)?;
    let artifact: ModelArtifact = serde_json::from_str(&contents)?;
    let actual = artifact.model.model_type();
    if actual != kind {
        return Err(MatchError::Model(format!(
            "artifact is {actual}, expected {kind}"
        )));
    }
    artifact.validate()?;
    Ok(artifact)
}
