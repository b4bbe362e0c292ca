//! jobmatch embed - Test embedding providers
//!
//! Utility command for testing and debugging embedding providers.

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::cli::output::{emit_json, robot_ok};
use crate::error::Result;
use crate::search::cosine_similarity;

#[derive(Args, Debug)]
pub struct EmbedArgs {
    /// Text to embed
    pub text: String,

    /// Override embedding provider (local, api)
    #[arg(long, short)]
    pub provider: Option<String>,

    /// Show full embedding vector (default: summary only)
    #[arg(long)]
    pub full: bool,

    /// Compare with another text (show similarity)
    #[arg(long, short)]
    pub compare: Option<String>,
}

/// Summary statistics of one vector.
struct VectorSummary {
    min: f32,
    max: f32,
    mean: f32,
    norm: f32,
    non_zero: usize,
}

fn summarize(vector: &[f32]) -> VectorSummary {
    let (min, max, sum) = vector
        .iter()
        .fold((f32::MAX, f32::MIN, 0.0f32), |acc, &x| {
            (acc.0.min(x), acc.1.max(x), acc.2 + x)
        });
    let len = vector.len().max(1) as f32;
    VectorSummary {
        min,
        max,
        mean: sum / len,
        norm: vector.iter().map(|x| x * x).sum::<f32>().sqrt(),
        non_zero: vector.iter().filter(|&&x| x.abs() > 1e-10).count(),
    }
}

pub fn run(ctx: &AppContext, args: &EmbedArgs) -> Result<()> {
    if let Some(provider) = &args.provider {
        ctx.embeddings.set_provider(provider, &ctx.config.embedding)?;
    }

    let embedding = ctx.embeddings.embed(&args.text);
    let similarity = args.compare.as_ref().map(|other| {
        let other_embedding = ctx.embeddings.embed(other);
        cosine_similarity(&embedding, &other_embedding)
    });

    if ctx.robot_mode {
        run_robot(ctx, args, &embedding, similarity)
    } else {
        run_human(ctx, args, &embedding, similarity);
        Ok(())
    }
}

fn run_robot(
    ctx: &AppContext,
    args: &EmbedArgs,
    embedding: &[f32],
    similarity: Option<f32>,
) -> Result<()> {
    let summary = summarize(embedding);
    let mut payload = serde_json::json!({
        "provider": ctx.embeddings.provider_name(),
        "dimension": embedding.len(),
        "text": args.text,
        "stats": {
            "min": summary.min,
            "max": summary.max,
            "mean": summary.mean,
            "l2_norm": summary.norm,
            "non_zero": summary.non_zero,
        },
    });
    if args.full {
        payload["embedding"] = serde_json::json!(embedding);
    }
    if let (Some(compare), Some(similarity)) = (&args.compare, similarity) {
        payload["comparison"] = serde_json::json!({
            "text": compare,
            "similarity": similarity,
        });
    }
    emit_json(&robot_ok(payload))
}

fn run_human(ctx: &AppContext, args: &EmbedArgs, embedding: &[f32], similarity: Option<f32>) {
    println!("{}", "Embedding Configuration".bold());
    println!("  Provider: {}", ctx.embeddings.provider_name().cyan());
    println!("  Dimensions: {}", ctx.embeddings.dimension().to_string().cyan());
    println!();

    println!("{}", "Input Text".bold());
    println!("  \"{}\"", args.text.green());
    println!();

    let summary = summarize(embedding);
    println!("{}", "Embedding Result".bold());
    println!("  Length: {} floats", embedding.len());
    println!("  Min: {:.6}", summary.min);
    println!("  Max: {:.6}", summary.max);
    println!("  Mean: {:.6}", summary.mean);
    println!("  L2 Norm: {:.6}", summary.norm);
    println!(
        "  Non-zero: {} ({:.1}%)",
        summary.non_zero,
        100.0 * summary.non_zero as f32 / embedding.len().max(1) as f32
    );

    if args.full {
        println!();
        println!("{}", "Full Vector".bold());
        for (i, v) in embedding.iter().enumerate() {
            if i > 0 && i % 8 == 0 {
                println!();
            }
            print!("{v:8.5} ");
        }
        println!();
    }

    if let (Some(compare), Some(similarity)) = (&args.compare, similarity) {
        println!();
        println!("{}", "Similarity Comparison".bold());
        println!("  Text A: \"{}\"", args.text.green());
        println!("  Text B: \"{}\"", compare.green());

        let rendered = format!("{similarity:.4}");
        let rendered = if similarity > 0.8 {
            rendered.green()
        } else if similarity > 0.5 {
            rendered.yellow()
        } else {
            rendered.red()
        };
        println!("  Cosine Similarity: {rendered}");
    }
}
