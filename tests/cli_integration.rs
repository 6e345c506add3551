//! Integration tests for the `mt` CLI.
//!
//! These run `mt` as a subprocess. Nothing here needs a live task store:
//! store-backed commands are covered against the in-memory store in
//! `session_store.rs`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Get the path to the built `mt` binary.
fn mt_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("mt");
    path
}

/// Run `mt` with the given args in the given directory, returning (stdout, stderr, success).
fn run_mt(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(mt_bin())
        .args(args)
        .current_dir(dir)
        .env_remove("MICROTASK_API_URL")
        .env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", dir)
        .output()
        .expect("failed to run mt");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

#[test]
fn test_help_lists_commands() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (stdout, _, success) = run_mt(tmp.path(), &["--help"]);
    assert!(success);
    for cmd in ["list", "show", "add", "edit", "done", "rm", "step"] {
        assert!(stdout.contains(cmd), "missing {} in help:\n{}", cmd, stdout);
    }
}

#[test]
fn test_step_help_lists_actions() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (stdout, _, success) = run_mt(tmp.path(), &["step", "--help"]);
    assert!(success);
    for cmd in ["add", "rm", "title", "toggle", "drag", "mv"] {
        assert!(stdout.contains(cmd), "missing {} in help:\n{}", cmd, stdout);
    }
}

#[test]
fn test_unreachable_store_reports_error() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_mt(
        tmp.path(),
        &["--api-url", "http://127.0.0.1:9", "list"],
    );
    assert!(!success);
    assert!(stderr.contains("error:"), "stderr: {}", stderr);
}

#[test]
fn test_missing_explicit_config_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let missing = tmp.path().join("nope.toml");
    let (_, stderr, success) = run_mt(
        tmp.path(),
        &["--config", missing.to_str().unwrap(), "list"],
    );
    assert!(!success);
    assert!(stderr.contains("error:"));
    assert!(stderr.contains("nope.toml"), "stderr: {}", stderr);
}

#[test]
fn test_malformed_config_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("config.toml");
    fs::write(&path, "[list]\nsort = \"alphabetical\"\n").unwrap();
    let (_, stderr, success) = run_mt(tmp.path(), &["--config", path.to_str().unwrap(), "list"]);
    assert!(!success);
    assert!(stderr.contains("config.toml"), "stderr: {}", stderr);
}

#[test]
fn test_invalid_arguments_rejected_by_parser() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, _, success) = run_mt(tmp.path(), &["step", "mv", "1", "first", "2"]);
    assert!(!success);
    let (_, _, success) = run_mt(tmp.path(), &["list", "--completed", "--all"]);
    assert!(!success);
}
