//! Helper functions for CLI tests

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Every variable the CLI reads from the environment
const PIPS3_VARS: &[&str] = &[
    "PIPS3_ENDPOINT",
    "PIPS3_BUCKET",
    "PIPS3_PREFIX",
    "PIPS3_PUBLIC",
    "PIPS3_BUCKET_OWNER_FULL_CONTROL",
    "PIPS3_PACKAGE",
    "PIPS3_DIST",
    "PIPS3_REGION",
    "PIPS3_S3_ENDPOINT_URL",
    "PIPS3_FORCE_PATH_STYLE",
    "PIPS3_STORAGE",
    "PIPS3_LOCAL_ROOT",
];

pub const ENDPOINT: &str = "https://pypi.example.com";
pub const BUCKET: &str = "pypi";

/// Outcome of one CLI run
pub struct CommandResult {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Run the pips3 binary with a clean environment.
///
/// `PIPS3_*` variables of the calling process are removed, user config
/// lookups point into `cwd` and the working directory is `cwd` when given.
pub fn run_pips3(args: &[&str], env: &[(&str, &str)], cwd: Option<&Path>) -> CommandResult {
    let mut command = Command::new(env!("CARGO_BIN_EXE_pips3"));
    command.args(args);

    for var in PIPS3_VARS {
        command.env_remove(var);
    }
    command.env_remove("RUST_LOG");

    if let Some(cwd) = cwd {
        command
            .current_dir(cwd)
            .env("HOME", cwd)
            .env("XDG_CONFIG_HOME", cwd.join(".config"));
    }

    for (key, value) in env {
        command.env(key, value);
    }

    let output = command.output().expect("Failed to execute pips3");
    CommandResult {
        success: output.status.success(),
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

/// Scratch workspace with a dist directory and a local bucket root
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("dist")).unwrap();
        std::fs::create_dir_all(dir.path().join("bucket")).unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn dist(&self) -> PathBuf {
        self.path().join("dist")
    }

    pub fn local_root(&self) -> PathBuf {
        self.path().join("bucket")
    }

    /// Path of an object stored by the local backend
    pub fn object(&self, key: &str) -> PathBuf {
        self.local_root().join(BUCKET).join(key)
    }

    pub fn add_package(&self, filename: &str) {
        std::fs::write(self.dist().join(filename), format!("contents of {}", filename)).unwrap();
    }

    /// Flags selecting the local backend rooted in this workspace
    pub fn local_args(&self) -> Vec<String> {
        vec![
            "--storage".to_string(),
            "local".to_string(),
            "--local-root".to_string(),
            self.local_root().to_string_lossy().to_string(),
        ]
    }
}
