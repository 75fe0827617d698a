#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use stashwatch::git::GitClient;
use stashwatch_test_utils::FakeRunner;
use tempfile::TempDir;

pub use stashwatch_test_utils::{init_tracing, with_timeout};

/// A temporary directory laid out like a repository root with `.git/refs`.
pub fn fake_repository() -> TempDir {
    let dir = tempfile::tempdir().expect("create tempdir");
    fs::create_dir_all(dir.path().join(".git").join("refs").join("heads"))
        .expect("create .git/refs");
    dir
}

/// Canonical path of a temp dir, so it matches paths reported by the OS.
pub fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

pub fn fake_git(runner: &FakeRunner) -> GitClient {
    GitClient::new(Arc::new(runner.clone()))
}
