use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::{TempDir, tempdir};

/// `jobmatch` pinned to a private root and an empty config file.
fn jobmatch(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("jobmatch").unwrap();
    cmd.env_remove("JOBMATCH_CONFIG")
        .env_remove("JOBMATCH_STORE_BACKEND")
        .env("RUST_LOG", "error")
        .env("NO_COLOR", "1")
        .arg("--root")
        .arg(root)
        .arg("--config")
        .arg(root.join("config.toml"));
    cmd
}

fn robot_json(root: &Path, args: &[&str]) -> Value {
    let output = jobmatch(root).arg("--robot").args(args).output().unwrap();
    assert!(
        output.status.success(),
        "command {args:?} failed: {}",
        String::from_utf8_lossy(&output.stdout)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

fn write_json(dir: &TempDir, name: &str, value: &Value) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
    path.display().to_string()
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("jobmatch").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("jobmatch").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_match_robot_output() {
    let dir = tempdir().unwrap();
    let json = robot_json(dir.path(), &["match", "前端", "--limit", "5"]);
    assert_eq!(json["status"], "ok");
    let jobs = json["data"]["jobs"].as_array().unwrap();
    assert!(!jobs.is_empty());
    assert!(jobs.len() <= 5);
    for job in jobs {
        let score = job["matchScore"].as_u64().unwrap();
        assert!(score <= 100);
    }
    assert_eq!(json["data"]["algorithm"], "hybrid_ltr");
}

#[test]
fn test_match_human_output() {
    let dir = tempdir().unwrap();
    jobmatch(dir.path())
        .args(["match", "React", "--limit", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Matches for \"React\""))
        .stdout(predicate::str::contains("hybrid_ltr"));
}

#[test]
fn test_ingest_persists_between_runs() {
    let dir = tempdir().unwrap();
    let feed = write_json(
        &dir,
        "feed.json",
        &json!([{
            "id": "feed-1",
            "title": "Zig Compiler Engineer",
            "company": "Ziglings",
            "location": "Berlin",
            "requirements": ["zig", "llvm"]
        }]),
    );

    let ingest = robot_json(dir.path(), &["ingest", &feed]);
    assert_eq!(ingest["data"]["added"], 1);
    assert_eq!(ingest["data"]["total"], 13);

    let matched = robot_json(dir.path(), &["match", "zig llvm", "--limit", "1"]);
    assert_eq!(matched["data"]["jobs"][0]["id"], "feed-1");

    let stats = robot_json(dir.path(), &["stats"]);
    assert_eq!(stats["data"]["store"]["vectors"], 13);
    assert_eq!(stats["data"]["store"]["backend"], "file");
}

#[test]
fn test_embed_compare() {
    let dir = tempdir().unwrap();
    let json = robot_json(
        dir.path(),
        &["embed", "rust engineer", "--compare", "rust engineer"],
    );
    assert_eq!(json["data"]["provider"], "local");
    assert_eq!(json["data"]["dimension"], 384);
    let similarity = json["data"]["comparison"]["similarity"].as_f64().unwrap();
    assert!((similarity - 1.0).abs() < 1e-4);
}

#[test]
fn test_train_then_evaluate() {
    let dir = tempdir().unwrap();
    let mut rows = Vec::new();
    for i in 0..20 {
        let mut features = vec![0.0; 24];
        let relevant = i % 2 == 0;
        features[0] = if relevant { 1.0 } else { 0.0 };
        features[4] = (i % 5) as f64 / 5.0;
        rows.push(json!({
            "features": features,
            "label": if relevant { 1.0 } else { 0.0 },
            "query_id": format!("q{}", i / 5),
        }));
    }
    let rows = write_json(&dir, "rows.json", &Value::Array(rows));
    let model = dir.path().join("model.json").display().to_string();

    let trained = robot_json(
        dir.path(),
        &["train", &rows, "--output", &model, "--iterations", "300", "--learning-rate", "0.05"],
    );
    assert_eq!(trained["data"]["report"]["iterations"], 300);
    assert!(Path::new(&model).exists());

    let evaluated = robot_json(dir.path(), &["evaluate", &rows, "--model", &model]);
    assert_eq!(evaluated["data"]["samples"], 20);
    assert!(evaluated["data"]["auc"].as_f64().unwrap() > 0.9);
    assert!(evaluated["warnings"].is_null());
}

#[test]
fn test_clear_requires_confirmation() {
    let dir = tempdir().unwrap();
    let output = jobmatch(dir.path())
        .args(["--robot", "clear"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"]["error"]["code"], "VALIDATION_FAILED");

    let cleared = robot_json(dir.path(), &["clear", "--yes"]);
    assert_eq!(cleared["data"]["removed"], 12);
    let stats = robot_json(dir.path(), &["stats"]);
    assert_eq!(stats["data"]["store"]["vectors"], 0);
}

#[test]
fn test_invalid_config_is_reported() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[ranking]\nmodel_type = \"forest\"\n",
    )
    .unwrap();
    let output = jobmatch(dir.path())
        .args(["--robot", "stats"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"]["error"]["code"], "CONFIG_INVALID");
}
