//! TestWorld pattern for declarative integration test setup.
//!
//! Every world owns a temp directory used as the working directory, a
//! config file path inside it, and the environment variables passed to the
//! CLI. Nothing leaks in from the developer's own AWS or paramsync setup.

use anyhow::Result;
use assert_cmd::Command;
use paramsync_types::EnvEntry;
use predicates::Predicate;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Declarative test environment builder.
///
/// # Example
/// ```no_run
/// use paramsync_testing::TestWorld;
///
/// let world = TestWorld::new().with_env("DEV_DB_HOST", "localhost");
///
/// let result = world
///     .run(&["remapKeysInEnv", "-o", "out.env", "--oldprefix", "DEV_", "--newprefix", ""])
///     .unwrap();
/// assert!(result.success());
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    config_path: PathBuf,
    env_vars: HashMap<String, String>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    /// Create a new isolated test environment.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let base_path = temp_dir.path().to_path_buf();

        Self {
            config_path: base_path.join("paramsync.toml"),
            temp_dir,
            env_vars: HashMap::new(),
        }
    }

    /// Resolve a path relative to the working directory.
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.temp_dir.path().join(relative)
    }

    /// Set an environment variable for CLI execution.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Set every entry as an environment variable for CLI execution.
    pub fn with_env_entries(mut self, entries: &[EnvEntry]) -> Self {
        for entry in entries {
            self.env_vars.insert(entry.key.clone(), entry.value.clone());
        }
        self
    }

    /// Write the config file passed via `--config`.
    pub fn with_config(self, toml: &str) -> Self {
        std::fs::write(&self.config_path, toml).expect("Failed to write config");
        self
    }

    /// Write a file relative to the working directory.
    pub fn with_file(self, relative: &str, contents: &str) -> Self {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create directory");
        }
        std::fs::write(&path, contents).expect("Failed to write file");
        self
    }

    pub fn read_file(&self, relative: &str) -> Result<String> {
        Ok(std::fs::read_to_string(self.path(relative))?)
    }

    /// Configure a CLI command with this test environment's settings.
    ///
    /// The caller must provide the base command (e.g., from
    /// `cargo_bin_cmd!("paramsync")`).
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.arg("--config").arg(&self.config_path);
        cmd.current_dir(self.temp_dir.path());

        // Keep the developer's logging and AWS setup out of test runs
        cmd.env_remove("RUST_LOG")
            .env_remove("PARAMSYNC_CONFIG")
            .env("AWS_EC2_METADATA_DISABLED", "true");

        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        cmd
    }

    /// Execute the `paramsync` binary with `args` in this environment.
    ///
    /// Uses `Command::cargo_bin()`, which needs the binary built by
    /// `cargo test`.
    #[allow(deprecated)]
    pub fn run(&self, args: &[&str]) -> Result<CliResult> {
        let mut cmd = Command::cargo_bin("paramsync")
            .map_err(|e| anyhow::anyhow!("Failed to find paramsync binary: {}", e))?;

        self.configure_command(&mut cmd);
        cmd.args(args);

        let output = cmd.output()?;

        Ok(CliResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Result of a CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// Evaluate a predicate against stderr.
    pub fn stderr_matches(&self, predicate: impl Predicate<str>) -> bool {
        predicate.eval(self.stderr.as_str())
    }
}
