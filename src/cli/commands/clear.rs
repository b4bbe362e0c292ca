//! jobmatch clear - Empty the vector store

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json, robot_ok};
use crate::error::{MatchError, Result};

#[derive(Args, Debug)]
pub struct ClearArgs {
    /// Confirm removal of every stored job
    #[arg(long)]
    pub yes: bool,
}

pub fn run(ctx: &AppContext, args: &ClearArgs) -> Result<()> {
    if !args.yes {
        return Err(MatchError::Validation(
            "refusing to clear the store without --yes".to_string(),
        ));
    }

    let removed = ctx.store.len();
    ctx.store.clear_all();
    ctx.store.flush()?;

    if ctx.robot_mode {
        return emit_json(&robot_ok(serde_json::json!({ "removed": removed })));
    }

    let mut layout = HumanLayout::new();
    layout.title("Store Cleared").kv("Removed", &removed.to_string());
    emit_human(layout);
    Ok(())
}
