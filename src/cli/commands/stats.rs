//! jobmatch stats - Store, embedding and model counters

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json, robot_ok};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct StatsArgs {}

pub fn run(ctx: &AppContext, _args: &StatsArgs) -> Result<()> {
    let store = ctx.store.get_stats();
    let embeddings = ctx.embeddings.stats();
    let model_kind = ctx.ranker.active_kind();
    let model_version = ctx.ranker.version();

    if ctx.robot_mode {
        let payload = serde_json::json!({
            "root": ctx.root.display().to_string(),
            "store": store,
            "embeddings": embeddings,
            "model": {
                "type": model_kind,
                "version": model_version,
            },
        });
        return emit_json(&robot_ok(payload));
    }

    let mut layout = HumanLayout::new();
    layout
        .title("jobmatch stats")
        .kv("Root", &ctx.root.display().to_string())
        .blank()
        .section("Vector store")
        .kv("Backend", &store.backend)
        .kv("Vectors", &store.vectors.to_string())
        .kv("Tokens", &store.tokens.to_string())
        .kv("Dimension", &store.dimension.to_string())
        .kv("Pending writes", &store.pending_writes.to_string())
        .kv("Cached queries", &store.cached_queries.to_string())
        .blank()
        .section("Embeddings")
        .kv("Provider", &embeddings.provider)
        .kv("Cached", &format!("{} / {}", embeddings.cached, cache_bound(embeddings.cache_capacity)))
        .kv("Hits / misses", &format!("{} / {}", embeddings.cache_hits, embeddings.cache_misses))
        .kv("Fallback chunks", &embeddings.fallback_chunks.to_string())
        .blank()
        .section("Ranking model")
        .kv("Type", &model_kind.to_string())
        .kv("Version", &model_version);
    emit_human(layout);
    Ok(())
}

fn cache_bound(capacity: usize) -> String {
    if capacity == 0 {
        "unbounded".to_string()
    } else {
        capacity.to_string()
    }
}
