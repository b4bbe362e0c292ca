//! Feature engineering and learning-to-rank.
//!
//! [`FeatureBuilder`] turns candidates into fixed 24-feature rows;
//! [`LtrModelService`] scores them with a linear, tree-ensemble or built-in
//! default model and can retrain and evaluate the linear strategy.

pub mod features;
pub mod metrics;
pub mod model;
pub mod service;
pub mod training;

pub use features::{
    FEATURE_COUNT, FEATURE_NAMES, FeatureBuilder, FeatureMatrix, FeatureRow, RecallSignal,
};
pub use model::{ModelArtifact, ModelKind, ModelType, TreeNode};
pub use service::{EvaluationReport, LoadOutcome, LtrModelService, TrainReport};
pub use training::{TrainConfig, TrainingExample};
