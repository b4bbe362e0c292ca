//! CLI module - Command-line interface definitions and handlers
//!
//! Uses clap v4 with derive macros for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod commands;
pub mod output;

/// jobmatch - Hybrid job recall and learning-to-rank matching
#[derive(Parser, Debug)]
#[command(name = "jobmatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Emit JSON on stdout for machine consumption
    #[arg(long, global = true)]
    pub robot: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file path (default: ~/.config/jobmatch/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Data root (default: nearest .jobmatch directory, else the user data dir)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Match jobs against a query and optional profile
    Match(commands::match_jobs::MatchArgs),

    /// Load jobs from JSON files into the vector store
    Ingest(commands::ingest::IngestArgs),

    /// Embed text with the configured provider
    Embed(commands::embed::EmbedArgs),

    /// Fit a linear ranking model on labeled feature rows
    Train(commands::train::TrainArgs),

    /// Score a ranking model with NDCG@10, MAP and AUC
    Evaluate(commands::evaluate::EvaluateArgs),

    /// Show store, embedding and model statistics
    Stats(commands::stats::StatsArgs),

    /// Remove every job from the vector store
    Clear(commands::clear::ClearArgs),
}
