//! Test support utilities for ghost integration tests.
//!
//! Provides reusable test environment setup and helper commands.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;
pub mod skip;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::path::{Path, PathBuf};
use std::process::Command as StdCommand;

use tempfile::TempDir;

/// Test environment with isolated temp directories.
///
/// Each test gets its own git repository and home dir. No process-global
/// state is mutated; child processes use `.current_dir()` so tests can run
/// in parallel.
pub struct Test {
    /// Temporary git repository for the test project
    pub dir: TempDir,
    /// Temporary home directory
    pub home: TempDir,
}

impl Test {
    /// Create a fresh git repository with an empty home directory.
    pub fn new() -> Self {
        let t = Self::bare();
        t.git(&["init", "-q"]);
        t
    }

    /// Create temp directories without running `git init`.
    pub fn bare() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let home = TempDir::new().expect("failed to create temp home");
        Self { dir, home }
    }

    /// Create a project initialized by `name`, whose SSH key is `key`.
    pub fn init(name: &str, key: &KeyPair) -> Self {
        let t = Self::new();
        t.install_home_key(key);
        let output = t.init_cmd(name);
        assert!(
            output.status.success(),
            "Failed to initialize: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        t
    }

    /// Project path.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path inside the project.
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Install a key pair as `~/.ssh/id_ed25519` (or `id_rsa`) in the temp home.
    pub fn install_home_key(&self, key: &KeyPair) -> PathBuf {
        let ssh = self.home.path().join(".ssh");
        std::fs::create_dir_all(&ssh).unwrap();
        let path = ssh.join(key.default_name);
        write_private(&path, key.private);
        std::fs::write(path.with_extension("pub"), key.public).unwrap();
        path
    }

    /// Write a private key somewhere outside the project and return its path.
    pub fn key_file(&self, key: &KeyPair) -> PathBuf {
        let path = self.home.path().join(format!("{}-key", key.name));
        write_private(&path, key.private);
        path
    }

    /// Write a public key file and return its path.
    pub fn pub_file(&self, key: &KeyPair) -> PathBuf {
        let path = self.home.path().join(format!("{}.pub", key.name));
        std::fs::write(&path, key.public).unwrap();
        path
    }

    /// Write the project's `.env`.
    pub fn write_env(&self, contents: &str) {
        std::fs::write(self.file(".env"), contents).unwrap();
    }

    /// Read the project's `.env`.
    pub fn read_env(&self) -> String {
        std::fs::read_to_string(self.file(".env")).unwrap()
    }

    /// Run git in the project with a throwaway identity.
    pub fn git(&self, args: &[&str]) -> std::process::Output {
        StdCommand::new("git")
            .args(args)
            .current_dir(self.dir.path())
            .env("HOME", self.home.path())
            .env("GIT_AUTHOR_NAME", "ghost-test")
            .env("GIT_AUTHOR_EMAIL", "ghost@test.invalid")
            .env("GIT_COMMITTER_NAME", "ghost-test")
            .env("GIT_COMMITTER_EMAIL", "ghost@test.invalid")
            .output()
            .expect("failed to run git")
    }
}

fn write_private(path: &Path, contents: &str) {
    std::fs::write(path, contents).unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).unwrap();
    }
}
