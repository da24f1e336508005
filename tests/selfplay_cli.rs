use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn selfplay_runs_a_short_deterministic_game() {
    let mut cmd = Command::cargo_bin("selfplay").expect("binary built");
    cmd.args([
        "--size", "15", "--depth", "1", "--moves", "4", "--seed", "7", "--threads", "2",
        "--quiet",
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("selfplay: 15x15 board"))
        .stdout(predicate::str::contains("move   1: X plays"))
        .stdout(predicate::str::contains("total nodes:"));
}

#[test]
fn selfplay_writes_a_json_record() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("game.json");

    let mut cmd = Command::cargo_bin("selfplay").expect("binary built");
    cmd.args(["--size", "15", "--depth", "1", "--moves", "3", "--quiet"])
        .arg("--json-out")
        .arg(&out);
    cmd.assert().success();

    let raw = std::fs::read_to_string(&out).expect("record written");
    let record: serde_json::Value = serde_json::from_str(&raw).expect("valid JSON");
    assert_eq!(record["board_size"], 15);
    assert_eq!(record["depth"], 1);
    let moves = record["moves"].as_array().expect("moves array");
    assert_eq!(moves.len(), 3);
    assert!(moves[0]["nodes"].is_u64());
}

#[test]
fn sweep_reports_a_depth_table() {
    let mut cmd = Command::cargo_bin("sweep").expect("binary built");
    cmd.args(["--max-depth", "2", "--threads", "2"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("sweep: depths 1..=2"))
        .stdout(predicate::str::contains("nodes/s"));
}
