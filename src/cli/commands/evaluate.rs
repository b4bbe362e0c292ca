//! jobmatch evaluate - Offline ranking metrics

use std::path::PathBuf;

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json, robot_ok};
use crate::error::Result;
use crate::ranking::{LoadOutcome, ModelType};

use super::train::read_examples;

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// JSON array of {features, label, query_id?} rows
    pub file: PathBuf,

    /// Model artifact to evaluate instead of the configured one
    #[arg(long, short)]
    pub model: Option<PathBuf>,

    /// Strategy of --model (linear, tree_ensemble)
    #[arg(long, default_value = "linear")]
    pub model_type: String,
}

pub fn run(ctx: &AppContext, args: &EvaluateArgs) -> Result<()> {
    let examples = read_examples(&args.file)?;

    let mut warnings = Vec::new();
    if let Some(path) = &args.model {
        let kind: ModelType = args.model_type.parse()?;
        if ctx.ranker.load_model(Some(path), kind) == LoadOutcome::Fallback {
            warnings.push(format!(
                "could not load {} as {kind}; evaluated the default model",
                path.display()
            ));
        }
    }

    let report = ctx.ranker.evaluate_model(&examples);

    if ctx.robot_mode {
        let mut payload = robot_ok(&report);
        for warning in warnings {
            payload = payload.with_warning(warning);
        }
        return emit_json(&payload);
    }

    let mut layout = HumanLayout::new();
    layout
        .title("Model Evaluation")
        .kv("Model", &report.model_version)
        .kv("Samples", &report.samples.to_string())
        .kv("NDCG@10", &format!("{:.4}", report.ndcg_at_10))
        .kv("MAP", &format!("{:.4}", report.map))
        .kv("AUC", &format!("{:.4}", report.auc));
    for warning in &warnings {
        layout.bullet(warning);
    }
    emit_human(layout);
    Ok(())
}
