//! jobmatch train - Fit the linear ranking model

use std::path::{Path, PathBuf};

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json, robot_ok};
use crate::error::{MatchError, Result};
use crate::ranking::{TrainConfig, TrainingExample};

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// JSON array of {features, label, query_id?} rows
    pub file: PathBuf,

    /// Where to write the model (default: ranking.model_path or models/ranker.json)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Gradient descent step size
    #[arg(long)]
    pub learning_rate: Option<f32>,

    /// Number of full-batch iterations
    #[arg(long)]
    pub iterations: Option<usize>,
}

/// Read labeled rows from a JSON file.
pub(crate) fn read_examples(path: &Path) -> Result<Vec<TrainingExample>> {
    let content = std::fs::read_to_string(path)?;
    let examples: Vec<TrainingExample> = serde_json::from_str(&content)?;
    if examples.is_empty() {
        return Err(MatchError::Validation(format!(
            "{} contains no training rows",
            path.display()
        )));
    }
    Ok(examples)
}

pub fn run(ctx: &AppContext, args: &TrainArgs) -> Result<()> {
    let examples = read_examples(&args.file)?;
    let config = TrainConfig {
        learning_rate: args.learning_rate.unwrap_or(ctx.config.ranking.learning_rate),
        iterations: args.iterations.unwrap_or(ctx.config.ranking.iterations),
    };

    let report = ctx.ranker.train_model(&examples, &config)?;
    let output = args.output.clone().unwrap_or_else(|| ctx.model_path());
    ctx.ranker.save_model(&output)?;

    if ctx.robot_mode {
        let payload = serde_json::json!({
            "report": report,
            "learning_rate": config.learning_rate,
            "model_path": output.display().to_string(),
        });
        return emit_json(&robot_ok(payload));
    }

    let mut layout = HumanLayout::new();
    layout
        .title("Model Trained")
        .kv("Version", &report.version.green().to_string())
        .kv("Samples", &report.samples.to_string())
        .kv("Iterations", &report.iterations.to_string())
        .kv("Learning rate", &config.learning_rate.to_string())
        .kv("Final loss", &format!("{:.6}", report.final_loss))
        .kv("Saved to", &output.display().to_string());
    emit_human(layout);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::FEATURE_COUNT;

    #[test]
    fn reads_rows_with_optional_query_id() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("rows.json");
        let rows = vec![
            TrainingExample::new([0.5; FEATURE_COUNT], 1.0),
            TrainingExample {
                query_id: Some("q1".to_string()),
                ..TrainingExample::new([0.0; FEATURE_COUNT], 0.0)
            },
        ];
        std::fs::write(&path, serde_json::to_string(&rows).unwrap()).unwrap();
        assert_eq!(read_examples(&path).unwrap(), rows);
    }

    #[test]
    fn empty_file_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("rows.json");
        std::fs::write(&path, "[]").unwrap();
        assert!(matches!(read_examples(&path), Err(MatchError::Validation(_))));
    }

    #[test]
    fn wrong_row_width_is_a_parse_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("rows.json");
        std::fs::write(&path, r#"[{"features": [1.0, 2.0], "label": 1.0}]"#).unwrap();
        assert!(matches!(read_examples(&path), Err(MatchError::Json(_))));
    }
}
