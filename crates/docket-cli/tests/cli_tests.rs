use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Nothing listens on the discard port, so remote calls fail fast.
const OFFLINE_URL: &str = "http://127.0.0.1:9";

/// Helper function to create a temporary directory for CLI tests
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// A `docket` command isolated from the user's config and database.
fn docket_cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("docket").expect("Failed to find docket binary");
    cmd.env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env_remove("DOCKET_API_URL")
        .arg("--no-color")
        .args([
            "--database-file",
            home.join("cli_test.db").to_str().unwrap(),
            "--api-url",
            OFFLINE_URL,
        ]);
    cmd
}

#[test]
fn test_cli_help() {
    let temp_dir = create_cli_test_environment();

    docket_cmd(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("case"))
        .stdout(predicate::str::contains("step"))
        .stdout(predicate::str::contains("evidence"));
}

#[test]
fn test_cli_step_preview_parses_strategy() {
    let temp_dir = create_cli_test_environment();

    docket_cmd(temp_dir.path())
        .args([
            "step",
            "preview",
            "1. Send notice: write to the landlord. 2. File suit: go to court.",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. **Send notice**"))
        .stdout(predicate::str::contains("2. **File suit**"))
        .stdout(predicate::str::contains("Active"))
        .stdout(predicate::str::contains("Locked"));
}

#[test]
fn test_cli_step_preview_without_numbering() {
    let temp_dir = create_cli_test_environment();

    docket_cmd(temp_dir.path())
        .args(["step", "preview", "Talk to a lawyer about the lease"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. **"));
}

#[test]
fn test_cli_jurisdiction_round_trip() {
    let temp_dir = create_cli_test_environment();

    docket_cmd(temp_dir.path())
        .args(["jurisdiction", "set", "Maharashtra", "Pune"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pune, Maharashtra"));

    docket_cmd(temp_dir.path())
        .args(["jurisdiction", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pune, Maharashtra"));
}

#[test]
fn test_cli_jurisdiction_defaults_to_not_set() {
    let temp_dir = create_cli_test_environment();

    docket_cmd(temp_dir.path())
        .args(["jurisdiction", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not set"));
}

#[test]
fn test_cli_auth_status_without_session() {
    let temp_dir = create_cli_test_environment();

    docket_cmd(temp_dir.path())
        .args(["auth", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in"))
        .stdout(predicate::str::contains(OFFLINE_URL));
}

#[test]
fn test_cli_logout_without_session() {
    let temp_dir = create_cli_test_environment();

    docket_cmd(temp_dir.path())
        .args(["auth", "logout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No session was stored"));
}

#[test]
fn test_cli_case_list_requires_login() {
    let temp_dir = create_cli_test_environment();

    docket_cmd(temp_dir.path())
        .args(["case", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn test_cli_default_command_lists_cases() {
    let temp_dir = create_cli_test_environment();

    docket_cmd(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to list cases"));
}

#[test]
fn test_cli_case_delete_requires_confirm() {
    let temp_dir = create_cli_test_environment();

    docket_cmd(temp_dir.path())
        .args(["case", "delete", "abc123"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--confirm"));
}

#[test]
fn test_cli_case_show_unknown_case_is_placeholder() {
    let temp_dir = create_cli_test_environment();

    docket_cmd(temp_dir.path())
        .args(["case", "show", "abc123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Case `abc123`"))
        .stdout(predicate::str::contains("## Roadmap"))
        .stdout(predicate::str::contains("1. **"));
}

#[test]
fn test_cli_step_show_locked_or_missing() {
    let temp_dir = create_cli_test_environment();

    docket_cmd(temp_dir.path())
        .args(["step", "show", "abc123", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_cli_step_complete_requires_login() {
    let temp_dir = create_cli_test_environment();

    docket_cmd(temp_dir.path())
        .args(["step", "complete", "abc123"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn test_cli_facts_set_and_show() {
    let temp_dir = create_cli_test_environment();

    docket_cmd(temp_dir.path())
        .args([
            "case",
            "facts",
            "abc123",
            "--set",
            "incident_date=12/03/2024",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("| incident date | 12/03/2024 |"));

    docket_cmd(temp_dir.path())
        .args(["case", "timeline", "abc123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("12/03/2024"));
}

#[test]
fn test_cli_facts_rejects_malformed_pair() {
    let temp_dir = create_cli_test_environment();

    docket_cmd(temp_dir.path())
        .args(["case", "facts", "abc123", "--set", "no-equals-sign"])
        .assert()
        .failure();
}

#[test]
fn test_cli_general_chat_history_starts_with_intro() {
    let temp_dir = create_cli_test_environment();

    docket_cmd(temp_dir.path())
        .args(["chat", "history"])
        .assert()
        .success()
        .stdout(predicate::str::contains("**Assistant:**"));
}

#[test]
fn test_cli_draft_show_without_draft() {
    let temp_dir = create_cli_test_environment();

    docket_cmd(temp_dir.path())
        .args(["draft", "show", "abc123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No draft saved"));
}

#[test]
fn test_cli_draft_load_then_show() {
    let temp_dir = create_cli_test_environment();
    let draft_path = temp_dir.path().join("notice.md");
    std::fs::write(&draft_path, "LEGAL NOTICE\n\nTo the landlord.").unwrap();

    docket_cmd(temp_dir.path())
        .args(["draft", "load", "abc123", draft_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Success:"));

    docket_cmd(temp_dir.path())
        .args(["draft", "show", "abc123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("LEGAL NOTICE"));
}
