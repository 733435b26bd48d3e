//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with an isolated HOME and verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(home: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_floxhub"))
        .args(args)
        .env("HOME", home)
        .env_remove("FLOXHUB_ENV")
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("stdout is not JSON")
}

#[test]
fn test_board_show_demo_day() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["board", "show"]);
    assert_eq!(code, 0);

    let out = json(&stdout);
    let ids: Vec<&str> = out["board"]["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    // deadline order, ties in list order
    assert_eq!(ids, ["4", "1", "2", "5", "3"]);
    assert_eq!(out["board"]["score"], 30);
    assert_eq!(out["board"]["percentage"], 6);
}

#[test]
fn test_board_show_filter_and_sort() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(
        home.path(),
        &["board", "show", "--filter", "frontend", "--sort", "weight"],
    );
    assert_eq!(code, 0);

    let out = json(&stdout);
    let tasks = out["board"]["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0]["id"], "1");
    assert_eq!(out["board"]["filter"], "FRONTEND");
    assert_eq!(out["board"]["sort"], "WEIGHT");
    assert_eq!(out["board"]["completion"]["total"], 5);
}

#[test]
fn test_board_show_rejects_unknown_filter() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(home.path(), &["board", "show", "--filter", "SALES"]);
    assert_ne!(code, 0);
}

#[test]
fn test_board_toggle_updates_score_and_syncs() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(
        home.path(),
        &["config", "set", "sync.simulated_latency_ms", "0"],
    );
    assert_eq!(code, 0);

    let (code, stdout, _) = run_cli(home.path(), &["board", "toggle", "4", "2"]);
    assert_eq!(code, 0);

    let out = json(&stdout);
    assert_eq!(out["board"]["score"], 130);
    assert_eq!(out["gains"].as_array().unwrap().len(), 1);
    assert_eq!(out["sync"]["delivered"], 1);
}

#[test]
fn test_board_toggle_unknown_id_warns() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, stderr) = run_cli(home.path(), &["board", "toggle", "99"]);
    assert_eq!(code, 0);
    assert!(stderr.contains("99"));
    assert_eq!(json(&stdout)["board"]["score"], 30);
}

#[test]
fn test_board_toggle_from_file() {
    let home = tempfile::tempdir().unwrap();
    let tasks = home.path().join("tasks.json");
    std::fs::write(
        &tasks,
        r#"[{"id":"a","description":"Deploy","weight":40,
            "category":"BACKEND","deadline":"2024-10-24"}]"#,
    )
    .unwrap();

    let (code, stdout, _) = run_cli(
        home.path(),
        &["board", "toggle", "a", "--tasks", tasks.to_str().unwrap(), "--idle", "10"],
    );
    assert_eq!(code, 0);

    let out = json(&stdout);
    assert_eq!(out["board"]["score"], 40);
    assert_eq!(out["session_score"], 35);
}

#[test]
fn test_score_session() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(
        home.path(),
        &["score", "session", "--weight", "50", "--weight", "30", "--idle", "20"],
    );
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["score"], 70);
}

#[test]
fn test_score_progress() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["score", "progress", "130"]);
    assert_eq!(code, 0);

    let out = json(&stdout);
    assert_eq!(out["percentage"], 26);
    assert_eq!(out["remaining"], 370);
}

#[test]
fn test_score_progress_uses_configured_max() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(home.path(), &["config", "set", "score.max_score", "1000"]);
    assert_eq!(code, 0);

    let (code, stdout, _) = run_cli(home.path(), &["score", "progress", "130"]);
    assert_eq!(code, 0);
    let out = json(&stdout);
    assert_eq!(out["max_score"], 1000);
    assert_eq!(out["percentage"], 13);

    let (_, stdout, _) = run_cli(home.path(), &["score", "progress", "130", "--max", "260"]);
    assert_eq!(json(&stdout)["percentage"], 50);
}

#[test]
fn test_board_show_groups_by_priority() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["board", "show", "--by-priority"]);
    assert_eq!(code, 0);

    let out = json(&stdout);
    assert_eq!(
        out["by_priority"],
        serde_json::json!([
            { "priority": "HIGH", "tasks": ["4", "2"] },
            { "priority": "MEDIUM", "tasks": ["1", "5"] },
            { "priority": "LOW", "tasks": ["3"] },
        ])
    );
    assert_eq!(out["board"]["filter"], "ALL");
}

#[test]
fn test_config_get_set() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["config", "get", "score.max_score"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "500");

    let (code, _, _) = run_cli(home.path(), &["config", "set", "score.max_score", "800"]);
    assert_eq!(code, 0);

    let (_, stdout, _) = run_cli(home.path(), &["config", "get", "score.max_score"]);
    assert_eq!(stdout.trim(), "800");
}

#[test]
fn test_config_unknown_key_fails() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["config", "get", "score.bogus"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_config_path() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["config", "path"]);
    assert_eq!(code, 0);
    assert!(stdout.trim().ends_with("floxhub/config.toml"));
}
