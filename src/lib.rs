pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod embeddings;
pub mod error;
pub mod ingest;
pub mod matching;
pub mod ranking;
pub mod search;

pub use error::{MatchError, Result};

/// Package version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
