//! Tests for error handling and CLI flags.

use crate::skip_without_git;
use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    let t = Test::bare();

    let output = t.cmd().arg("--help").output().unwrap();
    assert_success(&output);
    for sub in ["init", "invite", "remove", "list", "push", "pull", "inspect", "hook"] {
        assert_stdout_contains(&output, sub);
    }
}

#[test]
fn test_unknown_command_fails() {
    let t = Test::bare();

    let output = t.cmd().arg("unknown-command").output().unwrap();
    assert_failure(&output);
}

#[test]
fn test_version_flag() {
    let t = Test::bare();

    let output = t.cmd().arg("--version").output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_commands_before_init_fail_with_hint() {
    skip_without_git!();
    let t = Test::new();

    for args in [&["list"][..], &["push"], &["pull"], &["inspect"], &["remove", "bob"]] {
        let output = t.cmd().args(args).output().unwrap();
        assert_failure(&output);
        assert_stderr_contains(&output, "✗ not initialized");
        assert_stderr_contains(&output, "→ run: ghost init");
        assert_eq!(output.status.code(), Some(1));
    }
}

#[test]
fn test_corrupted_config_fails() {
    skip_without_git!();
    let t = Test::init("alice", &ALICE);
    std::fs::write(t.file("ghost.toml"), "[ghost\nversion = ").unwrap();

    let output = t.list();
    assert_failure(&output);
    assert_stderr_contains(&output, "failed to parse config");
}

#[test]
fn test_completions() {
    let t = Test::bare();

    t.cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ghost").and(predicate::str::contains("invite")));
}

#[test]
fn test_not_a_recipient_hint() {
    skip_without_git!();
    let t = Test::init("alice", &ALICE);
    t.write_env(SAMPLE_ENV);
    assert_success(&t.push());

    t.cmd()
        .args(["pull", "--key"])
        .arg(t.key_file(&CAROL))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("✗ decryption failed: key "))
        .stderr(predicate::str::contains("→ not a recipient"));
}
