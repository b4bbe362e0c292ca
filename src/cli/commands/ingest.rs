//! jobmatch ingest - Load job records into the vector store

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json, robot_ok};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct IngestArgs {
    /// JSON files, each an array of job records
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Only keep jobs matching this query
    #[arg(long, default_value = "")]
    pub query: String,
}

pub fn run(ctx: &AppContext, args: &IngestArgs) -> Result<()> {
    let report = ctx.ingester(&args.files).ingest(&args.query)?;
    let total = ctx.store.len();

    if ctx.robot_mode {
        let payload = serde_json::json!({
            "added": report.added,
            "skipped_sources": report.skipped_sources,
            "failed_sources": report.failed_sources,
            "total": total,
        });
        return emit_json(&robot_ok(payload));
    }

    let mut layout = HumanLayout::new();
    layout
        .title("Ingestion")
        .kv("Added", &report.added.to_string().green().to_string())
        .kv("Store size", &total.to_string());
    for source in &report.skipped_sources {
        layout.bullet(&format!("{} {source}", "rate limited:".yellow()));
    }
    for source in &report.failed_sources {
        layout.bullet(&format!("{} {source}", "failed:".red()));
    }
    emit_human(layout);
    Ok(())
}
