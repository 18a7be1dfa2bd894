//! Command helper methods for Test.

use super::{KeyPair, Test};
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a ghost command with correct environment variables.
    ///
    /// Returns a Command configured with:
    /// - HOME set to the temporary home directory
    /// - NO_COLOR set so output can be matched verbatim
    /// - Current directory set to the test project directory
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("ghost").expect("failed to find ghost binary");
        cmd.env("HOME", self.home.path());
        // Windows uses USERPROFILE instead of HOME for home directory
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("GHOST_LOG");
        cmd.env_remove("GHOST_PASSPHRASE");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Shortcut for `ghost init --name <name>`.
    pub fn init_cmd(&self, name: &str) -> Output {
        self.cmd()
            .args(["init", "--name", name])
            .output()
            .expect("failed to run ghost init")
    }

    /// Shortcut for `ghost invite <name> --key <pubkey file>`.
    pub fn invite(&self, name: &str, key: &KeyPair) -> Output {
        let path = self.pub_file(key);
        self.cmd()
            .args(["invite", name, "--key"])
            .arg(path)
            .output()
            .expect("failed to run ghost invite")
    }

    /// Shortcut for `ghost remove <target>`.
    pub fn remove(&self, target: &str) -> Output {
        self.cmd()
            .args(["remove", target])
            .output()
            .expect("failed to run ghost remove")
    }

    /// Shortcut for `ghost list`.
    pub fn list(&self) -> Output {
        self.cmd()
            .arg("list")
            .output()
            .expect("failed to run ghost list")
    }

    /// Shortcut for `ghost list --json`.
    pub fn list_json(&self) -> Output {
        self.cmd()
            .args(["list", "--json"])
            .output()
            .expect("failed to run ghost list --json")
    }

    /// Shortcut for `ghost push`.
    pub fn push(&self) -> Output {
        self.cmd()
            .arg("push")
            .output()
            .expect("failed to run ghost push")
    }

    /// Shortcut for `ghost pull` with the default key.
    pub fn pull(&self) -> Output {
        self.cmd()
            .arg("pull")
            .output()
            .expect("failed to run ghost pull")
    }

    /// Shortcut for `ghost pull --key <private key file>`.
    pub fn pull_as(&self, key: &KeyPair) -> Output {
        let path = self.key_file(key);
        self.cmd()
            .args(["pull", "--key"])
            .arg(path)
            .output()
            .expect("failed to run ghost pull --key")
    }

    /// Shortcut for `ghost inspect`.
    pub fn inspect(&self) -> Output {
        self.cmd()
            .arg("inspect")
            .output()
            .expect("failed to run ghost inspect")
    }

    /// Shortcut for `ghost hook <action>`.
    pub fn hook(&self, action: &str) -> Output {
        self.cmd()
            .args(["hook", action])
            .output()
            .expect("failed to run ghost hook")
    }
}
