//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - `run()` function to execute the command

use crate::app::AppContext;
use crate::cli::Commands;
use crate::error::Result;

pub mod clear;
pub mod embed;
pub mod evaluate;
pub mod ingest;
pub mod match_jobs;
pub mod stats;
pub mod train;

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Match(args) => match_jobs::run(ctx, args),
        Commands::Ingest(args) => ingest::run(ctx, args),
        Commands::Embed(args) => embed::run(ctx, args),
        Commands::Train(args) => train::run(ctx, args),
        Commands::Evaluate(args) => evaluate::run(ctx, args),
        Commands::Stats(args) => stats::run(ctx, args),
        Commands::Clear(args) => clear::run(ctx, args),
    }
}
