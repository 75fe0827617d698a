#![allow(dead_code)]

use std::path::{Path, PathBuf};

use stashwatch::config::{DebugSection, RawConfigFile, RawGitSection};
use stashwatch::git::StashRecord;
use stashwatch::node::{FileNode, FileNodeType, StashNode};

/// Argument keys of the git invocations issued during one refresh, in the
/// form `FakeRunner` matches on.
pub mod git_args {
    pub const CURRENT_BRANCH: &str = "rev-parse --abbrev-ref HEAD";
    pub const IS_REPOSITORY: &str = "rev-parse --is-inside-work-tree";
    pub const STASH_LIST: &str = "stash list --format=%gd%x1f%h%x1f%H%x1f%ct%x1f%s";

    pub fn stash_files(index: usize) -> String {
        format!("stash show --name-status -z stash@{{{index}}}")
    }

    pub fn stash_untracked(index: usize) -> String {
        format!("show --format= --name-only -z stash@{{{index}}}^3")
    }
}

/// A stash record with a derived full hash and a fixed timestamp.
pub fn record(index: usize, short_hash: &str, message: &str) -> StashRecord {
    StashRecord {
        index,
        short_hash: short_hash.to_string(),
        hash: format!("{short_hash}{}", "0".repeat(40 - short_hash.len().min(40))),
        timestamp: 1_700_000_000 + index as i64,
        message: message.to_string(),
    }
}

/// `git stash list` output for `records`, in the listing format.
pub fn stash_list_output(records: &[StashRecord]) -> String {
    records
        .iter()
        .map(|r| {
            format!(
                "stash@{{{}}}\u{1f}{}\u{1f}{}\u{1f}{}\u{1f}{}\n",
                r.index, r.short_hash, r.hash, r.timestamp, r.message
            )
        })
        .collect()
}

/// `-z` style output: every token followed by a NUL byte.
///
/// For `--name-status` pass the status letter before its path(s), e.g.
/// `["M", "src/lib.rs", "R100", "old.txt", "new.txt"]`.
pub fn nul_terminated(tokens: &[&str]) -> String {
    tokens.iter().map(|t| format!("{t}\0")).collect()
}

/// Builder for stash nodes with files.
pub struct StashNodeBuilder {
    repository: PathBuf,
    record: StashRecord,
    files: Vec<(FileNodeType, String, String)>,
}

impl StashNodeBuilder {
    pub fn new(repository: impl AsRef<Path>, index: usize, short_hash: &str) -> Self {
        Self {
            repository: repository.as_ref().to_path_buf(),
            record: record(index, short_hash, &format!("WIP on main: {index}")),
            files: Vec::new(),
        }
    }

    pub fn message(mut self, message: &str) -> Self {
        self.record.message = message.to_string();
        self
    }

    pub fn file(mut self, kind: FileNodeType, sub_path: &str, file_name: &str) -> Self {
        self.files.push((kind, sub_path.to_string(), file_name.to_string()));
        self
    }

    pub fn build(self) -> StashNode {
        let stash = StashNode::new(self.repository.clone(), self.record);
        let files = self
            .files
            .iter()
            .map(|(kind, sub, name)| FileNode::new(*kind, &stash, sub.as_str(), name.as_str()))
            .collect();
        stash.with_files(files)
    }
}

/// Builder for `RawConfigFile` to simplify test setup.
pub struct RawConfigBuilder {
    config: RawConfigFile,
}

impl RawConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn repository(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.repositories.push(path.into());
        self
    }

    pub fn git(mut self, binary: &str, timeout: Option<&str>, encoding: Option<&str>) -> Self {
        self.config.git = RawGitSection {
            binary: binary.to_string(),
            timeout: timeout.map(str::to_string),
            encoding: encoding.map(str::to_string),
        };
        self
    }

    pub fn debug_exec(mut self, exec: bool) -> Self {
        self.config.debug = DebugSection { exec };
        self
    }

    pub fn build(self) -> RawConfigFile {
        self.config
    }
}

impl Default for RawConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
