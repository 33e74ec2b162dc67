//! Common test utilities for evm integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't read the
//! user's `~/.config/evm-analyzer/config.kdl`.

#![allow(dead_code)]

use assert_cmd::Command;
use evm_analyzer::config::EVM_CONFIG_ENV;
use std::path::{Path, PathBuf};
pub use tempfile::TempDir;

/// A test environment with an isolated working directory and config file.
///
/// The `evm()` method returns a `Command` that points `EVM_CONFIG` at a
/// config file inside the temp directory, making tests parallel-safe.
pub struct TestEnv {
    pub dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Get a Command for the evm binary with an isolated config.
    pub fn evm(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_evm"));
        cmd.current_dir(self.dir.path());
        cmd.env(EVM_CONFIG_ENV, self.config_path());
        cmd.env_remove("EVM_API_KEY");
        cmd.env_remove("EVM_LOG");
        cmd
    }

    /// Path of the isolated config file (may not exist yet).
    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.kdl")
    }

    /// Write a file into the test directory and return its path.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse stdout of a successful command as JSON.
pub fn parse_json(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).expect("stdout should be valid JSON")
}
