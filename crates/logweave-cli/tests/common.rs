//! Common test utilities shared across integration tests.
//!
//! Clippy cannot track usage across integration test files, hence the
//! `allow(dead_code)` annotation.
#![cfg(test)]
#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestFixture {
    _temp_dir: TempDir,
    root: PathBuf,
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    pub fn write_log(&self, name: &str, lines: &[&str]) -> PathBuf {
        let path = self.root.join(name);
        let mut content = lines.join("\n");
        content.push('\n');
        fs::write(&path, content).expect("Failed to write log file");
        path
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    pub fn write_config(&self, content: &str) -> PathBuf {
        let path = self.config_path();
        fs::write(&path, content).expect("Failed to write config");
        path
    }

    /// Command isolated from the user's config, with colors off.
    pub fn command(&self) -> Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("logweave");
        cmd.env("LOGWEAVE_CONFIG", self.config_path())
            .env_remove("RUST_LOG")
            .arg("--color")
            .arg("never");
        cmd
    }
}
