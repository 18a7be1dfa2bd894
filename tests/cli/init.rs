//! Tests for `ghost init`.

use crate::skip_without_git;
use crate::support::*;
use std::fs;

#[test]
fn test_init_creates_config_and_registers_default_key() {
    skip_without_git!();
    let t = Test::new();
    t.install_home_key(&ALICE);

    let output = t.init_cmd("alice");
    assert_success(&output);
    assert_stdout_contains(&output, "created ghost.toml");
    assert_stdout_contains(&output, "added alice (ssh-ed25519");

    let config = fs::read_to_string(t.file("ghost.toml")).unwrap();
    assert!(config.contains("[ghost]"));
    assert!(config.contains("[[recipients]]"));
    assert!(config.contains("name = \"alice\""));
    let key: Vec<&str> = ALICE.public.split_whitespace().take(2).collect();
    assert!(config.contains(&format!("public_key = \"{}\"", key.join(" "))));
    assert!(!config.contains("alice@example.com"));
}

#[test]
fn test_init_updates_gitignore() {
    skip_without_git!();
    let t = Test::new();
    fs::write(t.file(".gitignore"), "target/\n.env\n").unwrap();

    assert_success(&t.init_cmd("alice"));

    let gitignore = fs::read_to_string(t.file(".gitignore")).unwrap();
    assert!(gitignore.starts_with("target/\n"));
    assert_eq!(gitignore.lines().filter(|l| *l == ".env").count(), 1);
    assert!(gitignore.lines().any(|l| l == ".env.local"));
    assert!(gitignore.lines().any(|l| l == ".env.*.local"));
}

#[test]
fn test_init_without_key_warns() {
    skip_without_git!();
    let t = Test::new();

    let output = t.init_cmd("alice");
    assert_success(&output);
    assert_stderr_contains(&output, "no public key found");

    let output = t.list_json();
    assert_success(&output);
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["count"], 0);
}

#[test]
fn test_init_with_explicit_key_text() {
    skip_without_git!();
    let t = Test::new();

    let output = t
        .cmd()
        .args(["init", "--name", "carol", "--key", CAROL.public.trim()])
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "added carol (ssh-rsa");
}

#[test]
fn test_init_twice_fails() {
    skip_without_git!();
    let t = Test::init("alice", &ALICE);

    let output = t.init_cmd("alice");
    assert_failure(&output);
    assert_stderr_contains(&output, "already initialized");
}

#[test]
fn test_init_outside_git_repo_fails() {
    skip_without_git!();
    let t = Test::bare();

    let output = t.init_cmd("alice");
    assert_failure(&output);
    assert_stderr_contains(&output, "not a git repository");
    assert_stderr_contains(&output, "git init");
    assert!(!t.file("ghost.toml").exists());
}

#[test]
fn test_commands_find_config_from_subdirectory() {
    skip_without_git!();
    let t = Test::init("alice", &ALICE);
    fs::create_dir_all(t.file("src/nested")).unwrap();

    let output = t
        .cmd()
        .current_dir(t.file("src/nested"))
        .arg("list")
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "alice");
}
