use assert_cmd::Command;
use predicates::prelude::*;

/// Without credentials the process must exit non-zero before touching the
/// network or the filesystem.
#[test]
fn sync_cli_fails_fast_without_required_configuration() {
    let mut cmd = Command::cargo_bin("notion-sync").expect("binary exists");

    cmd.arg("sync")
        .env_remove("NOTION_TOKEN")
        .env_remove("NOTION_ROOT_PAGE_ID");

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("NOTION_TOKEN"));
}

#[test]
fn sync_cli_reports_missing_env_file() {
    let mut cmd = Command::cargo_bin("notion-sync").expect("binary exists");

    cmd.arg("sync")
        .arg("--env-file")
        .arg("/nonexistent/.env")
        .env_remove("NOTION_TOKEN")
        .env_remove("NOTION_ROOT_PAGE_ID");

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("env file"));
}

#[test]
fn cli_help_names_the_sync_subcommand() {
    let mut cmd = Command::cargo_bin("notion-sync").expect("binary exists");
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("sync"));
}
