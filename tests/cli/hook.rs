//! Tests for `ghost hook`.

use crate::skip_without_git;
use crate::support::*;
use std::fs;

#[cfg(unix)]
#[test]
fn test_hook_blocks_env_without_envelope() {
    skip_without_git!();
    let t = Test::init("alice", &ALICE);
    assert_success(&t.hook("install"));
    t.write_env(SAMPLE_ENV);

    // .env is ignored, so it has to be forced in.
    assert!(t.git(&["add", "-f", ".env"]).status.success());
    let commit = t.git(&["commit", "-q", "-m", "leak"]);
    assert!(!commit.status.success());
    assert!(String::from_utf8_lossy(&commit.stderr).contains(".env is staged but .env.ghost"));

    assert_success(&t.push());
    let commit = t.git(&["commit", "-q", "-m", "with envelope"]);
    assert!(
        commit.status.success(),
        "{}",
        String::from_utf8_lossy(&commit.stderr)
    );
}

#[test]
fn test_hook_install_is_idempotent() {
    skip_without_git!();
    let t = Test::init("alice", &ALICE);

    let output = t.hook("install");
    assert_success(&output);
    assert_stdout_contains(&output, "installed pre-commit hook");

    let output = t.hook("install");
    assert_success(&output);
    assert_stdout_contains(&output, "updated pre-commit hook");

    let hook = fs::read_to_string(t.file(".git/hooks/pre-commit")).unwrap();
    assert!(hook.contains("# ghost pre-commit hook"));
}

#[test]
fn test_hook_leaves_foreign_hook_alone() {
    skip_without_git!();
    let t = Test::init("alice", &ALICE);
    let path = t.file(".git/hooks/pre-commit");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();

    let output = t.hook("install");
    assert_failure(&output);
    assert_stderr_contains(&output, "not installed by ghost");

    let output = t.hook("uninstall");
    assert_failure(&output);

    assert_eq!(fs::read_to_string(&path).unwrap(), "#!/bin/sh\nexit 0\n");
}

#[test]
fn test_hook_uninstall() {
    skip_without_git!();
    let t = Test::init("alice", &ALICE);
    assert_success(&t.hook("install"));

    let output = t.hook("uninstall");
    assert_success(&output);
    assert_stdout_contains(&output, "removed pre-commit hook");
    assert!(!t.file(".git/hooks/pre-commit").exists());

    let output = t.hook("uninstall");
    assert_success(&output);
    assert_stdout_contains(&output, "no pre-commit hook installed");
}
