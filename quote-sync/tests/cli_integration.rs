//! Integration tests for quote-sync

use assert_cmd::Command;
use libquotebox::db::keys;
use libquotebox::sources::simulated::server_quotes;
use libquotebox::types::default_quotes;
use libquotebox::{Database, KeyValueStore, Quote};
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

struct TestEnv {
    temp_dir: TempDir,
    config_path: PathBuf,
    db_path: PathBuf,
}

impl TestEnv {
    fn new(enabled: bool) -> Self {
        Self::with_interval(enabled, 10)
    }

    fn with_interval(enabled: bool, interval_secs: u64) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let db_path = temp_dir.path().join("quotes.db");

        let config_content = format!(
            r#"
[storage]
path = "{}"

[sync]
enabled = {}
interval_secs = {}
delay_ms = 0
"#,
            db_path.display().to_string().replace('\\', "/"),
            enabled,
            interval_secs
        );
        fs::write(&config_path, config_content).unwrap();

        Self {
            temp_dir,
            config_path,
            db_path,
        }
    }

    fn write_file(&self, name: &str, content: &str) -> String {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, content).unwrap();
        path.to_string_lossy().to_string()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("quote-sync").unwrap();
        cmd.env("QUOTEBOX_CONFIG", &self.config_path);
        cmd
    }

    async fn stored_quotes(&self) -> Option<Vec<Quote>> {
        let db = Database::new(self.db_path.to_str().unwrap()).await.unwrap();
        let json = db.get(keys::QUOTES).await.unwrap()?;
        Some(serde_json::from_str(&json).unwrap())
    }
}

#[tokio::test]
async fn test_once_merges_server_quotes() {
    let env = TestEnv::new(true);

    env.cmd()
        .arg("--once")
        .assert()
        .success()
        .stdout(
            "[info] Syncing data with server...\n[success] Sync complete! 3 new quotes added.\n",
        );

    let expected: Vec<Quote> = default_quotes().into_iter().chain(server_quotes()).collect();
    assert_eq!(env.stored_quotes().await.unwrap(), expected);
}

#[tokio::test]
async fn test_second_sync_finds_nothing_new() {
    let env = TestEnv::new(true);

    env.cmd().arg("--once").assert().success();
    env.cmd()
        .arg("--once")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "[info] Sync complete. No new quotes found.",
        ));

    assert_eq!(env.stored_quotes().await.unwrap().len(), 9);
}

#[tokio::test]
async fn test_once_from_source_file() {
    let env = TestEnv::new(true);
    let source = env.write_file(
        "server.json",
        r#"[
            {"text": "Server only", "category": "Remote"},
            {"text": "Believe you can and you're halfway there.", "category": "Belief"}
        ]"#,
    );

    env.cmd()
        .args(["--once", "--source-file", &source])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sync complete! 1 new quotes added."));

    let quotes = env.stored_quotes().await.unwrap();
    assert_eq!(quotes.len(), 7);
    assert_eq!(quotes[6], Quote::new("Server only", "Remote"));
}

#[tokio::test]
async fn test_unreachable_source_fails_without_changes() {
    let env = TestEnv::new(true);
    let missing = env.temp_dir.path().join("missing.json");

    env.cmd()
        .args(["--once", "--source-file", missing.to_str().unwrap()])
        .assert()
        .code(2)
        .stdout(predicate::str::contains(
            "[error] Sync failed. Check your connection.",
        ));

    assert_eq!(env.stored_quotes().await, None);
}

#[tokio::test]
async fn test_invalid_server_response_fails() {
    let env = TestEnv::new(true);
    let source = env.write_file("server.json", r#"{"quotes": []}"#);

    env.cmd()
        .args(["--once", "--source-file", &source])
        .assert()
        .code(2);

    assert_eq!(env.stored_quotes().await, None);
}

#[test]
fn test_daemon_refuses_when_disabled() {
    let env = TestEnv::new(false);

    env.cmd()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Periodic sync is disabled"));
}

#[test]
fn test_invalid_interval_is_rejected() {
    let env = TestEnv::new(true);

    env.cmd()
        .args(["--interval", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--interval"));
}

#[test]
fn test_zero_interval_flag_is_rejected() {
    let env = TestEnv::new(true);

    env.cmd()
        .args(["--interval", "0s"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("interval must be greater than zero"));
}

#[test]
fn test_zero_interval_in_config_is_rejected() {
    let env = TestEnv::with_interval(true, 0);

    env.cmd()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("sync.interval_secs must be greater than zero"));
}
