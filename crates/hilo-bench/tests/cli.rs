use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const CONFIG: &str = r#"
run_id: "cli_check"
shoes:
  seed: 1
  count: 3
agents:
  - name: "midpoint"
    kind: "midpoint"
outputs:
  jsonl: "out/{run_id}/games.jsonl"
  summary_md: "out/{run_id}/summary.md"
"#;

#[test]
fn validate_only_skips_the_run() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("bench.yaml");
    fs::write(&path, CONFIG).expect("write config");

    Command::cargo_bin("hilo-bench")
        .expect("binary built")
        .current_dir(dir.path())
        .arg("--config")
        .arg(&path)
        .arg("--validate-only")
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded configuration 'cli_check'"))
        .stdout(predicate::str::contains("Validation-only mode"));

    assert!(!dir.path().join("out").exists());
}

#[test]
fn run_id_override_reaches_output_paths() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("bench.yaml");
    fs::write(&path, CONFIG).expect("write config");

    Command::cargo_bin("hilo-bench")
        .expect("binary built")
        .current_dir(dir.path())
        .args(["--run-id", "renamed", "--shoes", "2", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 agents x 2 games -> 2 rows"));

    assert!(dir.path().join("out/renamed/games.jsonl").exists());
    assert!(dir.path().join("out/renamed/summary.md").exists());
}

#[test]
fn invalid_config_fails_with_field_name() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("bench.yaml");
    fs::write(&path, CONFIG.replace("count: 3", "count: 0")).expect("write config");

    Command::cargo_bin("hilo-bench")
        .expect("binary built")
        .arg("--config")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("shoes.count"));
}
