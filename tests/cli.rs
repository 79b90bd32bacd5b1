//! End-to-end CLI tests.
//!
//! These scrub the credential environment so no test ever reaches a network
//! endpoint; every run exercises the dry-run fallback.

use assert_cmd::Command;
use predicates::prelude::*;

fn cmdlens() -> Command {
    let mut cmd = Command::cargo_bin("cmdlens").unwrap();
    cmd.env_remove("CMDLENS_API_KEY")
        .env_remove("OPENAI_API_KEY")
        .env_remove("CMDLENS_API_URL");
    cmd
}

#[test]
fn dry_run_prints_prompt_without_api_key() {
    cmdlens()
        .args(["--cmd", "echo hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PROMPT"))
        .stdout(predicate::str::contains("echo hello"));
}

#[test]
fn missing_script_exits_with_code_2() {
    cmdlens()
        .args(["--script", "/no/such/cmdlens-script.sh"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Script not found"));
}

#[test]
fn script_contents_reach_the_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("probe.sh");
    std::fs::write(&path, "#!/bin/sh\necho from-script\n").unwrap();

    cmdlens()
        .arg("--script")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("echo from-script"));
}

#[test]
fn cmd_and_script_are_mutually_exclusive() {
    cmdlens()
        .args(["--cmd", "ls", "--script", "x.sh"])
        .assert()
        .failure();
}

#[test]
fn one_of_cmd_or_script_is_required() {
    cmdlens().assert().failure();
}

#[test]
fn executed_output_appears_in_dry_run() {
    cmdlens()
        .args(["--cmd", "echo cmdlens-marker", "--exec", "--no-confirm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("REAL EXECUTION OUTPUT"))
        .stdout(predicate::str::contains("cmdlens-marker"));
}

#[test]
fn declined_confirmation_continues_without_execution() {
    // "n" on stdin declines the confirmation; the run still succeeds and
    // produces a prompt with no execution-output section.
    cmdlens()
        .args(["--cmd", "echo should-not-run", "--exec"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("continuing without execution"))
        .stdout(predicate::str::contains("REAL EXECUTION OUTPUT").not());
}

#[test]
fn timed_out_execution_is_reported_in_output() {
    cmdlens()
        .args([
            "--cmd",
            "sleep 5",
            "--exec",
            "--no-confirm",
            "--timeout",
            "1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("timed out"))
        .stdout(predicate::str::contains("1s"));
}
