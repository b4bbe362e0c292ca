use jobmatch::core::UserProfile;
use jobmatch::matching::{Algorithm, MatchFilters, MatchRequest};
use jobmatch::ranking::{
    FeatureBuilder, LoadOutcome, ModelType, RecallSignal, TrainConfig, TrainingExample,
};
use jobmatch::search::{InitOutcome, sample::sample_jobs};

use crate::fixture::{TestRoot, job};

#[test]
fn frontend_query_on_bootstrapped_store() {
    let root = TestRoot::new();
    let ctx = root.context(TestRoot::config("memory"));
    assert!(matches!(ctx.init_outcome, InitOutcome::Bootstrapped(_)));

    let response = ctx
        .orchestrator
        .match_jobs(&MatchRequest::new("前端").with_limit(5));
    assert!(response.jobs.len() <= 5);
    assert!(!response.jobs.is_empty());
    assert!(response.jobs.iter().all(|job| job.match_score <= 100));
    assert_ne!(response.algorithm, Algorithm::Fallback);
    assert!(!response.request_id.is_empty());
}

#[test]
fn response_serializes_with_camel_case_fields() {
    let root = TestRoot::new();
    let ctx = root.context(TestRoot::config("memory"));
    let response = ctx
        .orchestrator
        .match_jobs(&MatchRequest::new("React").with_limit(2));
    let value = serde_json::to_value(&response).unwrap();
    assert!(value["totalCount"].is_number());
    assert!(value["latencyMs"].is_number());
    assert_eq!(value["algorithm"], "hybrid_ltr");
    let first = &value["jobs"][0];
    assert!(first["matchScore"].is_number());
    assert!(first["title"].is_string());
    assert!(first["reasons"].is_array());
}

#[test]
fn ingested_jobs_become_matchable() {
    let root = TestRoot::new();
    let ctx = root.context(TestRoot::config("memory"));
    let file = root.write_jobs(
        "feed.json",
        &[
            job("feed-1", "Zig Compiler Engineer", "Ziglings", "Berlin", &["zig", "llvm"]),
            job("feed-2", "Zig Tooling Engineer", "Ziglings", "Berlin", &["zig"]),
        ],
    );

    let report = ctx.ingester(&[file]).ingest("").unwrap();
    assert_eq!(report.added, 2);

    let response = ctx
        .orchestrator
        .match_jobs(&MatchRequest::new("zig llvm").with_limit(3));
    assert_eq!(response.jobs[0].job.id, "feed-1");
    assert!(response.jobs[0].keyword_score > 0.99);
}

#[test]
fn filters_and_profile_shape_results() {
    let root = TestRoot::new();
    let ctx = root.context(TestRoot::config("memory"));
    let profile = UserProfile {
        skills: vec!["React".to_string(), "TypeScript".to_string()],
        preferred_locations: vec!["北京".to_string()],
        expected_salary: "25k".to_string(),
        ..Default::default()
    };
    let request = MatchRequest::new("")
        .with_profile(profile)
        .with_location("北京")
        .with_filters(MatchFilters {
            min_salary: Some(10.0),
            ..Default::default()
        })
        .with_limit(10);

    let response = ctx.orchestrator.match_jobs(&request);
    assert_ne!(response.algorithm, Algorithm::Fallback);
    assert!(response.jobs.iter().all(|job| job.job.location.contains("北京")));
}

#[test]
fn train_save_load_and_evaluate() {
    let root = TestRoot::new();
    let ctx = root.context(TestRoot::config("memory"));
    let profile = UserProfile {
        skills: vec!["React".to_string()],
        ..Default::default()
    };
    let jobs = sample_jobs();
    let signals = vec![RecallSignal::default(); jobs.len()];
    let matrix = FeatureBuilder::new().build_features(&profile, &jobs, &signals);

    let examples: Vec<TrainingExample> = matrix
        .features
        .iter()
        .zip(&jobs)
        .map(|(row, job)| {
            let relevant = job
                .requirements
                .iter()
                .any(|r| r.eq_ignore_ascii_case("react"));
            TrainingExample {
                query_id: Some("react".to_string()),
                ..TrainingExample::new(*row, if relevant { 1.0 } else { 0.0 })
            }
        })
        .collect();

    let config = TrainConfig {
        learning_rate: 0.05,
        iterations: 800,
    };
    let report = ctx.ranker.train_model(&examples, &config).unwrap();
    assert!(report.version.starts_with("linear-"));
    assert_eq!(report.samples, jobs.len());

    let path = ctx.model_path();
    ctx.ranker.save_model(&path).unwrap();
    assert!(path.exists());

    let reloaded = jobmatch::ranking::LtrModelService::new();
    assert_eq!(reloaded.load_model(Some(&path), ModelType::Linear), LoadOutcome::Artifact);
    assert_eq!(reloaded.version(), report.version);

    let evaluation = reloaded.evaluate_model(&examples);
    assert_eq!(evaluation.samples, jobs.len());
    assert!(evaluation.ndcg_at_10 > 0.8, "ndcg {}", evaluation.ndcg_at_10);
    assert!(evaluation.auc > 0.8, "auc {}", evaluation.auc);
}
