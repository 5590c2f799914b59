//! Runs the `aidoc` binary end to end.

use serde_json::{json, Value};
use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

fn aidoc(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_aidoc"))
        .args(args)
        .env_remove("AIDOC_CONFIG")
        .env_remove("AIDOC_VECTOR_DIMENSIONS")
        .env_remove("AIDOC_LEGAL_BASIS_POLICY")
        .env_remove("AIDOC_MAX_ROW_ID")
        .env_remove("AIDOC_SCHEMA_VERSION")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn info_reports_field_total() {
    let out = aidoc(&["info"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("Total fields: 65"));
    assert!(text.contains("Vector dimensions: 1024"));
}

#[test]
fn example_with_small_vector_is_valid_json() {
    let out = aidoc(&["example", "--user", "alice", "--dims", "4"]);
    assert!(out.status.success());
    let record: Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(record["insertedBy"], "alice");
    assert_eq!(record["embeddingVector01"].as_array().unwrap().len(), 4);
}

#[test]
fn example_rejects_zero_dims() {
    let out = aidoc(&["example", "--dims", "0"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("--dims"));
}

#[test]
fn validate_exit_code_follows_outcome() {
    let dir = TempDir::new().unwrap();
    let good = dir.path().join("good.json");
    let bad = dir.path().join("bad.json");
    fs::write(
        &good,
        json!({"insertedBy": "p", "updatedBy": "p", "chunkText": "hi"}).to_string(),
    )
    .unwrap();
    fs::write(
        &bad,
        json!({"insertedBy": "p", "updatedBy": "p", "qualityScore": 250}).to_string(),
    )
    .unwrap();

    let ok = aidoc(&["validate", "--candidate", good.to_str().unwrap()]);
    assert!(ok.status.success());

    let rejected = aidoc(&["validate", "--candidate", bad.to_str().unwrap()]);
    assert_eq!(rejected.status.code(), Some(1));
    assert!(stdout(&rejected).contains("qualityScore [OutOfRange]"));
}

#[test]
fn config_file_changes_dimensions() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("aidoc.toml");
    fs::write(&config, "vector_dimensions = 8\n").unwrap();
    let out = aidoc(&["--config", config.to_str().unwrap(), "info"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("Vector dimensions: 8"));
}

#[test]
fn export_markdown_to_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("schema.md");
    let out = aidoc(&["export", "--format", "markdown", "--output", path.to_str().unwrap()]);
    assert!(out.status.success());
    assert!(fs::read_to_string(&path).unwrap().starts_with("# AI Document Schema"));
}
