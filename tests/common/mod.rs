//! Shared testing utilities for era CLI tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Testing harness providing an isolated working directory for CLI exercises.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
    work_dir: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    /// Create a new isolated environment.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let work_dir = root.path().join("work");
        fs::create_dir_all(&work_dir).expect("Failed to create test work directory");
        Self { root, work_dir }
    }

    /// Path to the workspace directory used for CLI invocations.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Directory the dated download folders live in.
    pub fn downloads(&self) -> PathBuf {
        let path = self.work_dir.join("downloads");
        fs::create_dir_all(&path).expect("Failed to create downloads directory");
        path
    }

    /// Build a command for invoking the compiled `era` binary within the workspace.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("era").expect("Failed to locate era binary");
        cmd.current_dir(&self.work_dir).env_remove("ERA_PORTAL_PASSWORD").env_remove("RUST_LOG");
        cmd
    }

    /// Create `count` monthly folders named `<prefix>YYYYMM01_000000`, starting January 2023.
    pub fn monthly_folders(&self, prefix: &str, count: u32) -> Vec<PathBuf> {
        let base = self.downloads();
        (0..count)
            .map(|i| {
                let path =
                    base.join(format!("{}{}{:02}01_000000", prefix, 2023 + i / 12, i % 12 + 1));
                fs::create_dir_all(&path).expect("Failed to create dated folder");
                path
            })
            .collect()
    }

    /// Names of the entries under the downloads directory, sorted.
    pub fn download_names(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.downloads())
            .expect("Failed to read downloads directory")
            .map(|entry| {
                entry.expect("Failed to read entry").file_name().to_string_lossy().into_owned()
            })
            .collect();
        names.sort();
        names
    }

    /// Write a file relative to the work directory.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.work_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&path, content).expect("Failed to write file");
        path
    }
}
