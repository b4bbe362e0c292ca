//! Ranking model artifacts and scoring strategies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};

use super::features::{FEATURE_COUNT, FeatureRow};

/// Version string of the built-in model.
pub const DEFAULT_MODEL_VERSION: &str = "default-v1";

/// Hand-tuned weights for the built-in linear model, in feature order.
pub const DEFAULT_WEIGHTS: [f32; FEATURE_COUNT] = [
    0.05,    // exact_skill_matches
    0.02,    // partial_skill_matches
    0.15,    // skill_coverage
    0.15,    // weighted_skill_score
    0.20,    // vector_similarity
    0.15,    // keyword_similarity
    0.15,    // fused_similarity
    0.05,    // description_overlap
    0.005,   // experience_years
    0.01,    // education_level
    0.002,   // skill_count
    0.002,   // project_count
    0.0,     // salary_min
    0.0,     // salary_max
    -0.005,  // required_experience
    0.005,   // company_size
    -0.0001, // days_since_application
    0.05,    // click_through_rate
    0.05,    // category_preference
    0.05,    // location_preferred
    0.05,    // salary_gap
    0.05,    // location_match
    0.03,    // industry_match
    0.02,    // company_size_match
];

/// Bias of the built-in linear model.
pub const DEFAULT_BIAS: f32 = 0.0;

/// Strategy requested when loading a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelType {
    Linear,
    TreeEnsemble,
    Default,
}

impl FromStr for ModelType {
    type Err = MatchError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().replace('-', "_").as_str() {
            "linear" => Ok(Self::Linear),
            "tree_ensemble" | "tree" | "xgboost" => Ok(Self::TreeEnsemble),
            "" | "default" => Ok(Self::Default),
            other => Err(MatchError::Config(format!("unknown model type: {other}"))),
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Linear => "linear",
            Self::TreeEnsemble => "tree_ensemble",
            Self::Default => "default",
        };
        f.write_str(name)
    }
}

/// A binary regression tree over feature thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum TreeNode {
    /// `row[feature] < threshold` descends left, otherwise right.
    Split {
        feature: usize,
        threshold: f32,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
    Leaf {
        value: f32,
    },
}

impl TreeNode {
    /// Leaf value reached by `row`. Out-of-range features read as 0.
    pub fn evaluate(&self, row: &[f32]) -> f32 {
        let mut node = self;
        loop {
            match node {
                Self::Leaf { value } => return *value,
                Self::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let x = row.get(*feature).copied().unwrap_or(0.0);
                    node = if x < *threshold { left } else { right };
                }
            }
        }
    }

    fn max_feature(&self) -> Option<usize> {
        match self {
            Self::Leaf { .. } => None,
            Self::Split {
                feature,
                left,
                right,
                ..
            } => [Some(*feature), left.max_feature(), right.max_feature()]
                .into_iter()
                .flatten()
                .max(),
        }
    }
}

/// Strategy-specific parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelKind {
    Linear { weights: Vec<f32>, bias: f32 },
    TreeEnsemble { trees: Vec<TreeNode>, base_score: f32 },
    Default,
}

impl ModelKind {
    pub fn model_type(&self) -> ModelType {
        match self {
            Self::Linear { .. } => ModelType::Linear,
            Self::TreeEnsemble { .. } => ModelType::TreeEnsemble,
            Self::Default => ModelType::Default,
        }
    }
}

/// A versioned, serializable ranking model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub version: String,
    pub model: ModelKind,
}

impl ModelArtifact {
    /// The built-in hand-tuned linear model.
    pub fn default_model() -> Self {
        Self {
            version: DEFAULT_MODEL_VERSION.to_string(),
            model: ModelKind::Default,
        }
    }

    pub fn linear(version: impl Into<String>, weights: Vec<f32>, bias: f32) -> Self {
        Self {
            version: version.into(),
            model: ModelKind::Linear { weights, bias },
        }
    }

    /// Reject artifacts that cannot score a full feature row.
    pub fn validate(&self) -> Result<()> {
        match &self.model {
            ModelKind::Linear { weights, bias } => {
                if weights.len() != FEATURE_COUNT {
                    return Err(MatchError::Model(format!(
                        "linear model has {} weights, expected {FEATURE_COUNT}",
                        weights.len()
                    )));
                }
                if !bias.is_finite() || weights.iter().any(|w| !w.is_finite()) {
                    return Err(MatchError::Model(
                        "linear model has non-finite parameters".to_string(),
                    ));
                }
            }
            ModelKind::TreeEnsemble { trees, base_score } => {
                if trees.is_empty() {
                    return Err(MatchError::Model("tree ensemble has no trees".to_string()));
                }
                if !base_score.is_finite() {
                    return Err(MatchError::Model(
                        "tree ensemble has non-finite base score".to_string(),
                    ));
                }
                if let Some(feature) = trees.iter().filter_map(TreeNode::max_feature).max() {
                    if feature >= FEATURE_COUNT {
                        return Err(MatchError::Model(format!(
                            "tree splits on feature {feature}, only {FEATURE_COUNT} exist"
                        )));
                    }
                }
            }
            ModelKind::Default => {}
        }
        Ok(())
    }

    /// Score one row.
    ///
    /// Linear models are clamped to [0, 1]; tree ensembles pass the summed
    /// leaves through a sigmoid.
    pub fn predict(&self, row: &FeatureRow) -> f32 {
        let score = match &self.model {
            ModelKind::Linear { weights, bias } => linear_score(weights, *bias, row),
            ModelKind::Default => linear_score(&DEFAULT_WEIGHTS, DEFAULT_BIAS, row),
            ModelKind::TreeEnsemble { trees, base_score } => {
                let sum: f32 = trees.iter().map(|tree| tree.evaluate(row)).sum();
                sigmoid(base_score + sum)
            }
        };
        if score.is_finite() { score } else { 0.0 }
    }
}

fn linear_score(weights: &[f32], bias: f32, row: &FeatureRow) -> f32 {
    let dot: f32 = weights.iter().zip(row.iter()).map(|(w, x)| w * x).sum();
    (bias + dot).clamp(0.0, 1.0)
}

/// Logistic function.
#[must_use]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_with(index: usize, value: f32) -> FeatureRow {
        let mut row = [0.0; FEATURE_COUNT];
        row[index] = value;
        row
    }

    #[test]
    fn linear_model_is_clamped() {
        let mut weights = vec![0.0; FEATURE_COUNT];
        weights[0] = 1.0;
        let model = ModelArtifact::linear("t", weights, 0.0);
        assert_eq!(model.predict(&row_with(0, 5.0)), 1.0);
        assert_eq!(model.predict(&row_with(0, -5.0)), 0.0);
        assert!((model.predict(&row_with(0, 0.4)) - 0.4).abs() < 1e-6);
    }

    #[test]
    fn default_model_scores_in_unit_interval() {
        let model = ModelArtifact::default_model();
        let mut row = [1.0; FEATURE_COUNT];
        row[16] = 999.0;
        let score = model.predict(&row);
        assert!((0.0..=1.0).contains(&score));
        assert!(model.validate().is_ok());
    }

    #[test]
    fn tree_descends_left_below_threshold() {
        let tree = TreeNode::Split {
            feature: 4,
            threshold: 0.5,
            left: Box::new(TreeNode::Leaf { value: -1.0 }),
            right: Box::new(TreeNode::Leaf { value: 2.0 }),
        };
        assert_eq!(tree.evaluate(&row_with(4, 0.2)), -1.0);
        assert_eq!(tree.evaluate(&row_with(4, 0.5)), 2.0);
    }

    #[test]
    fn ensemble_sums_trees_then_applies_sigmoid() {
        let model = ModelArtifact {
            version: "t".to_string(),
            model: ModelKind::TreeEnsemble {
                trees: vec![TreeNode::Leaf { value: 0.5 }, TreeNode::Leaf { value: 0.5 }],
                base_score: -1.0,
            },
        };
        assert!((model.predict(&[0.0; FEATURE_COUNT]) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn validation_rejects_malformed_artifacts() {
        assert!(ModelArtifact::linear("t", vec![0.1; 3], 0.0).validate().is_err());
        assert!(ModelArtifact::linear("t", vec![f32::NAN; FEATURE_COUNT], 0.0).validate().is_err());

        let out_of_range = ModelArtifact {
            version: "t".to_string(),
            model: ModelKind::TreeEnsemble {
                trees: vec![TreeNode::Split {
                    feature: 30,
                    threshold: 0.0,
                    left: Box::new(TreeNode::Leaf { value: 0.0 }),
                    right: Box::new(TreeNode::Leaf { value: 0.0 }),
                }],
                base_score: 0.0,
            },
        };
        assert!(out_of_range.validate().is_err());
    }

    #[test]
    fn artifact_json_shape() {
        let json = r#"{
            "version": "2024-06",
            "model": {
                "type": "tree_ensemble",
                "base_score": 0.0,
                "trees": [{
                    "node": "split", "feature": 0, "threshold": 1.0,
                    "left": {"node": "leaf", "value": -0.5},
                    "right": {"node": "leaf", "value": 0.5}
                }]
            }
        }"#;
        let artifact: ModelArtifact = serde_json::from_str(json).unwrap();
        assert_eq!(artifact.model.model_type(), ModelType::TreeEnsemble);
        assert!(artifact.validate().is_ok());
    }

    #[test]
    fn model_type_parses_aliases() {
        assert_eq!("linear".parse::<ModelType>().unwrap(), ModelType::Linear);
        assert_eq!("tree-ensemble".parse::<ModelType>().unwrap(), ModelType::TreeEnsemble);
        assert_eq!("default".parse::<ModelType>().unwrap(), ModelType::Default);
        assert!("svm".parse::<ModelType>().is_err());
        assert_eq!(ModelType::TreeEnsemble.to_string(), "tree_ensemble");
    }
}
