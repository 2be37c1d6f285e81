//! Integration tests for the CLI interface
//!
//! Runs the binary against temporary files and checks the JSON it prints

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SALES: &str = "region,units,price\nnorth,3,1.5\nsouth,1,2\nnorth,2,1.5\n";

fn sales_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("sales.csv"), SALES).unwrap();
    dir
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = Command::cargo_bin("datadata").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("--reduce"));
}

#[test]
fn test_missing_source() {
    let mut cmd = Command::cargo_bin("datadata").unwrap();
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("No data specification provided"));
}

#[test]
fn test_group_and_sum() {
    let dir = sales_dir();
    let mut cmd = Command::cargo_bin("datadata").unwrap();
    cmd.current_dir(dir.path())
        .args(["sales.csv", "--key", "region", "--reduce", "sum", "--include", "units"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"north\": {"))
        .stdout(predicate::str::contains("\"units\": 5"))
        .stdout(predicate::str::contains("\"price\": 1.5"));
}

#[test]
fn test_default_keys_rows_by_position() {
    let dir = sales_dir();
    let mut cmd = Command::cargo_bin("datadata").unwrap();
    cmd.current_dir(dir.path())
        .arg("sales.csv")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"0\": {"))
        .stdout(predicate::str::contains("\"2\": {"));
}

#[test]
fn test_values_prints_array() {
    let dir = sales_dir();
    let mut cmd = Command::cargo_bin("datadata").unwrap();
    let output = cmd
        .current_dir(dir.path())
        .args(["sales.csv", "-k", "region", "-r", "first", "--values"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let values: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        values,
        serde_json::json!([
            {"region": "north", "units": 3, "price": 1.5},
            {"region": "south", "units": 1, "price": 2}
        ])
    );
}

#[test]
fn test_raw_keeps_strings() {
    let dir = sales_dir();
    let mut cmd = Command::cargo_bin("datadata").unwrap();
    cmd.current_dir(dir.path())
        .args(["sales.csv", "--raw", "-k", "region", "-r", "first"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"units\": \"3\""));
}

#[test]
fn test_unknown_file_type() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("data.xyz"), "a,b\n1,2\n").unwrap();

    let mut cmd = Command::cargo_bin("datadata").unwrap();
    cmd.current_dir(dir.path())
        .args(["-v", "data.xyz"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Unknown file type"));
}

#[test]
fn test_type_override() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("data.xyz"), "a\tb\n1\t2\n").unwrap();

    let mut cmd = Command::cargo_bin("datadata").unwrap();
    cmd.current_dir(dir.path())
        .args(["data.xyz", "--type", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"b\": 2"));
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("datadata").unwrap();
    cmd.current_dir(dir.path())
        .arg("nothing.csv")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to process nothing.csv"));
}

#[test]
fn test_invalid_reduce_strategy() {
    let mut cmd = Command::cargo_bin("datadata").unwrap();
    cmd.args(["data.csv", "--reduce", "average"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_pipeline_file() {
    let dir = sales_dir();
    let pipeline = dir.path().join("pipeline.toml");
    std::fs::write(
        &pipeline,
        "source = \"sales.csv\"\nkey = \"region\"\nreduce = \"merge\"\n",
    )
    .unwrap();

    // The source is resolved against the pipeline file, not the cwd
    let cwd = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("datadata").unwrap();
    cmd.current_dir(cwd.path())
        .arg("--config")
        .arg(&pipeline)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"south\": {"));
}

#[test]
fn test_flags_override_pipeline_file() {
    let dir = sales_dir();
    let pipeline = dir.path().join("pipeline.yaml");
    std::fs::write(&pipeline, "source: sales.csv\nkey: region\nreduce: ident\n").unwrap();

    let mut cmd = Command::cargo_bin("datadata").unwrap();
    cmd.current_dir(dir.path())
        .args(["-c", "pipeline.yaml", "--reduce", "last", "--values"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"units\": 2"))
        .stdout(predicate::str::contains("\"units\": 3").not());
}

#[test]
fn test_invalid_pipeline_file() {
    let dir = TempDir::new().unwrap();
    let pipeline = dir.path().join("pipeline.toml");
    std::fs::write(&pipeline, "colour = \"red\"\n").unwrap();

    let mut cmd = Command::cargo_bin("datadata").unwrap();
    cmd.arg("--config")
        .arg(&pipeline)
        .assert()
        .failure()
        .code(2);
}
