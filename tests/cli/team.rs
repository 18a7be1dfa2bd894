//! Tests for `ghost invite`, `ghost remove` and `ghost list`.

use crate::skip_without_git;
use crate::support::*;

#[test]
fn test_invite_and_list() {
    skip_without_git!();
    let t = Test::init("alice", &ALICE);

    let output = t.invite("bob", &BOB);
    assert_success(&output);
    assert_stdout_contains(&output, "invited bob");

    let output = t.list();
    assert_success(&output);
    assert_stdout_contains(&output, "2 recipients");
    assert_stdout_contains(&output, "alice");
    assert_stdout_contains(&output, "bob");
}

#[test]
fn test_list_json_keeps_insertion_order() {
    skip_without_git!();
    let t = Test::init("alice", &ALICE);
    assert_success(&t.invite("carol", &CAROL));
    assert_success(&t.invite("bob", &BOB));

    let output = t.list_json();
    assert_success(&output);
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();

    assert_eq!(json["count"], 3);
    let names: Vec<&str> = json["recipients"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["alice", "carol", "bob"]);
    assert_eq!(json["recipients"][1]["key_type"], "ssh-rsa");
    assert_eq!(
        json["recipients"][0]["fingerprint"].as_str().unwrap().len(),
        32
    );
}

#[test]
fn test_invite_same_key_twice_fails() {
    skip_without_git!();
    let t = Test::init("alice", &ALICE);

    let output = t.invite("alice-laptop", &ALICE);
    assert_failure(&output);
    assert_stderr_contains(&output, "already registered");
}

#[test]
fn test_invite_unsupported_key_type() {
    skip_without_git!();
    let t = Test::init("alice", &ALICE);

    let output = t.invite("dave", &DAVE);
    assert_failure(&output);
    assert_stderr_contains(&output, "unsupported key type");
}

#[test]
fn test_invite_malformed_key() {
    skip_without_git!();
    let t = Test::init("alice", &ALICE);

    let output = t
        .cmd()
        .args(["invite", "mallory", "--key", INVALID_PUBLIC_KEY])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "malformed key");
}

#[test]
fn test_invite_missing_key_file() {
    skip_without_git!();
    let t = Test::init("alice", &ALICE);

    let output = t
        .cmd()
        .args(["invite", "bob", "--key", "/no/such/bob.pub"])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "file not found");
}

#[test]
fn test_invite_from_private_key_file() {
    skip_without_git!();
    let t = Test::init("alice", &ALICE);
    let private = t.key_file(&BOB);

    // Protected key: the public half is readable without the passphrase.
    let output = t
        .cmd()
        .args(["invite", "bob", "--key"])
        .arg(&private)
        .output()
        .unwrap();
    assert_success(&output);

    let json: serde_json::Value = serde_json::from_str(&stdout(&t.list_json())).unwrap();
    assert_eq!(
        json["recipients"][1]["public_key"].as_str().unwrap(),
        BOB.public.split_whitespace().take(2).collect::<Vec<_>>().join(" ")
    );
}

#[test]
fn test_remove_by_name() {
    skip_without_git!();
    let t = Test::init("alice", &ALICE);
    assert_success(&t.invite("bob", &BOB));

    let output = t.remove("bob");
    assert_success(&output);
    assert_stdout_contains(&output, "removed bob");

    let output = t.list();
    assert_stdout_contains(&output, "1 recipient");
    assert_stdout_excludes(&output, "bob");
}

#[test]
fn test_remove_by_github_handle() {
    skip_without_git!();
    let t = Test::init("alice", &ALICE);
    let output = t
        .cmd()
        .args(["invite", "Robert", "--github", "@Bobby", "--key"])
        .arg(t.pub_file(&BOB))
        .output()
        .unwrap();
    assert_success(&output);

    let output = t.cmd().args(["rm", "@bobby"]).output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "removed Robert");
}

#[test]
fn test_remove_unknown_fails() {
    skip_without_git!();
    let t = Test::init("alice", &ALICE);

    let output = t.remove("nobody");
    assert_failure(&output);
    assert_stderr_contains(&output, "recipient not found: nobody");
}
