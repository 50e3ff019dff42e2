//! CLI integration tests for the liveroute command-line interface.
//!
//! These tests cover argument parsing, help output and the status command
//! against an address where nothing listens.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a command for the liveroute binary with an isolated config dir.
fn liveroute(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("liveroute").unwrap();
    cmd.env("LIVEROUTE_CONFIG_DIR", config_dir.path());
    cmd.env_remove("LIVEROUTE_SERVER_URL");
    cmd
}

/// An address that refuses connections.
fn dead_server_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    liveroute(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("start"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn test_version_displays() {
    let dir = TempDir::new().unwrap();
    liveroute(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("liveroute"));
}

#[test]
fn test_start_help_shows_overrides() {
    let dir = TempDir::new().unwrap();
    liveroute(&dir)
        .args(["start", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--bind"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn test_start_rejects_bad_port() {
    let dir = TempDir::new().unwrap();
    liveroute(&dir)
        .args(["start", "--port", "not-a-port"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_start_missing_config_file() {
    let dir = TempDir::new().unwrap();
    liveroute(&dir)
        .args(["start", "--config"])
        .arg(dir.path().join("absent.toml"))
        .assert()
        .failure();
}

#[test]
fn test_unknown_subcommand() {
    let dir = TempDir::new().unwrap();
    liveroute(&dir).arg("teleport").assert().failure();
}

// ─────────────────────────────────────────────────────────────────────────────
// Status Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_status_json_when_not_running() {
    let dir = TempDir::new().unwrap();
    liveroute(&dir)
        .args(["--json", "--server", &dead_server_url(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"running\": false"));
}

#[test]
fn test_status_human_when_not_running() {
    let dir = TempDir::new().unwrap();
    liveroute(&dir)
        .args(["--server", &dead_server_url(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not running"));
}
