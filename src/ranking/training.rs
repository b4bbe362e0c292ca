//! Batch gradient descent for the linear ranking model.
//!
//! Features are standardized before fitting (raw columns range from 0..1
//! ratios to 999-day counters) and the fitted weights are folded back into
//! raw-feature space, so the resulting artifact scores unscaled rows.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MatchError, Result};

use super::features::{FEATURE_COUNT, FeatureRow};

/// One labeled feature row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub features: FeatureRow,
    /// Graded relevance; above 0 counts as relevant
    pub label: f32,
    /// Rows sharing a query id form one ranked list during evaluation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_id: Option<String>,
}

impl TrainingExample {
    pub fn new(features: FeatureRow, label: f32) -> Self {
        Self {
            features,
            label,
            query_id: None,
        }
    }
}

/// Gradient descent settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainConfig {
    pub learning_rate: f32,
    pub iterations: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            iterations: 500,
        }
    }
}

/// Fitted linear parameters in raw-feature space.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearFit {
    pub weights: Vec<f32>,
    pub bias: f32,
    /// Mean squared error after the last iteration
    pub final_loss: f32,
}

/// Fit `bias + w·x` to the labels by minimizing mean squared error.
pub fn fit_linear(examples: &[TrainingExample], config: &TrainConfig) -> Result<LinearFit> {
    if examples.is_empty() {
        return Err(MatchError::Validation("training data is empty".to_string()));
    }
    if !(config.learning_rate.is_finite() && config.learning_rate > 0.0) {
        return Err(MatchError::Validation(format!(
            "learning rate must be positive, got {}",
            config.learning_rate
        )));
    }
    if examples.iter().any(|example| !example.label.is_finite()) {
        return Err(MatchError::Validation("training labels must be finite".to_string()));
    }

    let n = examples.len() as f64;
    let (means, stds) = column_stats(examples);
    let standardized: Vec<[f64; FEATURE_COUNT]> = examples
        .iter()
        .map(|example| {
            let mut row = [0.0; FEATURE_COUNT];
            for (j, value) in row.iter_mut().enumerate() {
                *value = (finite(example.features[j]) - means[j]) / stds[j];
            }
            row
        })
        .collect();

    let lr = f64::from(config.learning_rate);
    let mut weights = [0.0f64; FEATURE_COUNT];
    let mut bias = 0.0f64;
    let mut loss = f64::NAN;

    for iteration in 0..config.iterations {
        let mut grad_w = [0.0f64; FEATURE_COUNT];
        let mut grad_b = 0.0f64;
        let mut squared_error = 0.0f64;

        for (row, example) in standardized.iter().zip(examples) {
            let prediction = bias + row.iter().zip(&weights).map(|(x, w)| x * w).sum::<f64>();
            let error = prediction - f64::from(example.label);
            squared_error += error * error;
            for (g, x) in grad_w.iter_mut().zip(row) {
                *g += error * x;
            }
            grad_b += error;
        }

        for (w, g) in weights.iter_mut().zip(&grad_w) {
            *w -= lr * 2.0 * g / n;
        }
        bias -= lr * 2.0 * grad_b / n;
        loss = squared_error / n;

        if !loss.is_finite() {
            return Err(MatchError::Model(format!(
                "training diverged at iteration {iteration}"
            )));
        }
    }

    if config.iterations == 0 {
        loss = examples
            .iter()
            .map(|example| f64::from(example.label).powi(2))
            .sum::<f64>()
            / n;
    }

    // w_raw = w / std, bias_raw = bias - sum(w * mean / std)
    let raw_weights: Vec<f32> = weights
        .iter()
        .zip(&stds)
        .map(|(w, std)| (w / std) as f32)
        .collect();
    let raw_bias = bias
        - weights
            .iter()
            .zip(means.iter().zip(&stds))
            .map(|(w, (mean, std))| w * mean / std)
            .sum::<f64>();

    debug!(
        samples = examples.len(),
        iterations = config.iterations,
        loss,
        "fitted linear ranking model"
    );

    Ok(LinearFit {
        weights: raw_weights,
        bias: raw_bias as f32,
        final_loss: loss as f32,
    })
}

fn finite(value: f32) -> f64 {
    if value.is_finite() { f64::from(value) } else { 0.0 }
}

/// Per-column mean and standard deviation; constant columns get std 1.
fn column_stats(examples: &[TrainingExample]) -> ([f64; FEATURE_COUNT], [f64; FEATURE_COUNT]) {
    let n = examples.len() as f64;
    let mut means = [0.0; FEATURE_COUNT];
    for example in examples {
        for (mean, value) in means.iter_mut().zip(&example.features) {
            *mean += finite(*value) / n;
        }
    }

    let mut stds = [0.0; FEATURE_COUNT];
    for example in examples {
        for ((std, value), mean) in stds.iter_mut().zip(&example.features).zip(&means) {
            *std += (finite(*value) - mean).powi(2) / n;
        }
    }
    for std in &mut stds {
        *std = std.sqrt();
        if *std < 1e-9 {
            *std = 1.0;
        }
    }
    (means, stds)
}
