//! jobmatch match - Run the matching pipeline for one request

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json, robot_ok, score_badge};
use crate::core::UserProfile;
use crate::error::Result;
use crate::matching::{Algorithm, MatchFilters, MatchRequest, MatchResponse};

#[derive(Args, Debug)]
pub struct MatchArgs {
    /// Free-text query (may be empty when a profile is given)
    #[arg(default_value = "")]
    pub query: String,

    /// Only jobs whose location contains this text
    #[arg(long, short)]
    pub location: Option<String>,

    /// Maximum results (0 = configured default)
    #[arg(long, short = 'n', default_value_t = 0)]
    pub limit: usize,

    /// Drop jobs whose salary ceiling is below this value
    #[arg(long)]
    pub min_salary: Option<f32>,

    /// Candidate's years of experience
    #[arg(long)]
    pub experience: Option<f32>,

    /// Exact company-size label
    #[arg(long)]
    pub company_size: Option<String>,

    /// JSON file holding the user profile
    #[arg(long, short)]
    pub profile: Option<PathBuf>,
}

pub fn run(ctx: &AppContext, args: &MatchArgs) -> Result<()> {
    let request = build_request(args)?;
    let response = ctx.orchestrator.match_jobs(&request);

    if ctx.robot_mode {
        let mut payload = robot_ok(&response);
        if response.algorithm == Algorithm::Fallback {
            payload = payload.with_warning("pipeline failed; results are synthesized");
        }
        return emit_json(&payload);
    }

    emit_human(render(&args.query, &response));
    Ok(())
}

fn build_request(args: &MatchArgs) -> Result<MatchRequest> {
    let mut request = MatchRequest::new(args.query.clone())
        .with_limit(args.limit)
        .with_filters(MatchFilters {
            min_salary: args.min_salary,
            experience_years: args.experience,
            company_size: args.company_size.clone(),
        });
    if let Some(location) = &args.location {
        request = request.with_location(location.clone());
    }
    if let Some(path) = &args.profile {
        let profile: UserProfile = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        request = request.with_profile(profile);
    }
    Ok(request)
}

fn render(query: &str, response: &MatchResponse) -> HumanLayout {
    let mut layout = HumanLayout::new();
    layout
        .title(&format!("Matches for \"{query}\""))
        .kv("Algorithm", &response.algorithm.to_string())
        .kv(
            "Shown",
            &format!("{} of {}", response.jobs.len(), response.total_count),
        )
        .kv("Latency", &format!("{} ms", response.latency_ms))
        .kv("Request", &response.request_id)
        .blank();

    if response.jobs.is_empty() {
        layout.push_line("No matching jobs.".dimmed().to_string());
        return layout;
    }

    for (rank, matched) in response.jobs.iter().enumerate() {
        let job = &matched.job;
        layout.push_line(format!(
            "{:>2}. {} {} {} {}",
            rank + 1,
            score_badge(matched.match_score),
            job.title.bold(),
            format!("@ {}", job.company).cyan(),
            format!("[{}]", job.location).dimmed(),
        ));
        if !job.salary.is_empty() {
            layout.push_line(format!("      {}", job.salary));
        }
        for reason in &matched.reasons {
            layout.push_line(format!("      - {reason}"));
        }
    }
    layout
}
