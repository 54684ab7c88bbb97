//! Integration tests for quote-show

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const BELIEF: &str = "\"Believe you can and you're halfway there.\" - Belief";

/// Isolated config and database for one test
struct TestEnv {
    _temp_dir: TempDir,
    config_path: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let db_path = temp_dir.path().join("quotes.db");

        let config_content = format!(
            r#"
[storage]
path = "{}"

[sync]
enabled = false
interval_secs = 10
delay_ms = 0
"#,
            db_path.display().to_string().replace('\\', "/")
        );
        fs::write(&config_path, config_content).unwrap();

        Self {
            _temp_dir: temp_dir,
            config_path,
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("quote-show").unwrap();
        cmd.env("QUOTEBOX_CONFIG", &self.config_path);
        cmd
    }
}

#[test]
fn test_show_random_quote() {
    let env = TestEnv::new();

    env.cmd()
        .assert()
        .success()
        .stdout(predicate::str::starts_with("\"").and(predicate::str::contains("\" - ")));
}

#[test]
fn test_show_single_quote_category() {
    let env = TestEnv::new();

    env.cmd()
        .args(["--category", "Belief"])
        .assert()
        .success()
        .stdout(predicate::str::diff(format!("{}\n", BELIEF)));
}

#[test]
fn test_show_empty_category() {
    let env = TestEnv::new();

    env.cmd()
        .args(["--category", "Nope"])
        .assert()
        .success()
        .stdout("No quotes in this category.\n");
}

#[test]
fn test_restore_uses_last_category() {
    let env = TestEnv::new();

    env.cmd().args(["--category", "Belief"]).assert().success();

    env.cmd()
        .arg("--restore")
        .assert()
        .success()
        .stdout(predicate::str::diff(format!("{}\n", BELIEF)));
}

#[test]
fn test_restore_without_saved_category() {
    let env = TestEnv::new();

    env.cmd()
        .arg("--restore")
        .assert()
        .success()
        .stdout(predicate::str::contains("\" - "));
}

#[test]
fn test_list_categories() {
    let env = TestEnv::new();

    env.cmd()
        .arg("--categories")
        .assert()
        .success()
        .stdout("all\nWork\nInnovation\nLife\nMotivation\nBelief\n");
}

#[test]
fn test_json_output() {
    let env = TestEnv::new();

    let output = env
        .cmd()
        .args(["--category", "Work", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["filter"], "Work");
    assert_eq!(value["quote"]["category"], "Work");
    assert_eq!(
        value["quote"]["text"],
        "The only way to do great work is to love what you do."
    );
}

#[test]
fn test_category_and_restore_conflict() {
    let env = TestEnv::new();

    env.cmd()
        .args(["--category", "Life", "--restore"])
        .assert()
        .failure();
}

#[test]
fn test_interactive_session() {
    let env = TestEnv::new();

    env.cmd()
        .arg("--interactive")
        .write_stdin("category Career\nadd Stay hungry. | Career\nlast\nadd |\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No quotes in this category."))
        .stdout(predicate::str::contains("\"Stay hungry.\" - Career").count(2))
        .stderr(predicate::str::contains("[success] Quote added."))
        .stderr(predicate::str::contains(
            "[error] Invalid input: Please enter both a quote and a category.",
        ));

    // The added quote outlives the session
    env.cmd()
        .args(["--category", "Career"])
        .assert()
        .success()
        .stdout("\"Stay hungry.\" - Career\n");
}

#[test]
fn test_interactive_import_shows_quote_from_current_category() {
    let env = TestEnv::new();
    let import_path = env._temp_dir.path().join("import.json");
    fs::write(
        &import_path,
        r#"[{"text": "Ship it.", "category": "Career"}]"#,
    )
    .unwrap();

    env.cmd()
        .arg("--interactive")
        .write_stdin(format!(
            "category Career\nimport {}\nlast\nquit\n",
            import_path.display()
        ))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Ship it.\" - Career").count(2))
        .stderr(predicate::str::contains("[success] 1 quotes imported successfully!"));
}
