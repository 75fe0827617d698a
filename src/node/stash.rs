// src/node/stash.rs

use std::path::{Path, PathBuf};

use super::file::FileNode;
use super::make_id;
use crate::git::{stash_reference, StashRecord};

/// A single stash entry and the files it touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StashNode {
    id: String,
    repository: PathBuf,
    index: usize,
    short_hash: String,
    hash: String,
    message: String,
    timestamp: i64,
    files: Vec<FileNode>,
}

impl StashNode {
    pub fn new(repository: impl Into<PathBuf>, record: StashRecord) -> Self {
        let repository = repository.into();
        let id = stash_id(&repository, record.index, &record.short_hash);
        Self {
            id,
            repository,
            index: record.index,
            short_hash: record.short_hash,
            hash: record.hash,
            message: record.message,
            timestamp: record.timestamp,
            files: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn repository(&self) -> &Path {
        &self.repository
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn short_hash(&self) -> &str {
        &self.short_hash
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// `stash@{<index>}`.
    pub fn reference(&self) -> String {
        stash_reference(self.index)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Seconds since the unix epoch.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn files(&self) -> &[FileNode] {
        &self.files
    }

    /// Attach the file nodes. Callers build them with [`FileNode::new`] on
    /// this stash so their ids carry the right short hash.
    pub fn with_files(mut self, files: Vec<FileNode>) -> Self {
        self.files = files;
        self
    }
}

fn stash_id(repository: &Path, index: usize, short_hash: &str) -> String {
    let repo = repository.to_string_lossy();
    make_id(&["s", &*repo, index.to_string().as_str(), short_hash])
}
