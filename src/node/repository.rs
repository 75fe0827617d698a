// src/node/repository.rs

use std::path::{Path, PathBuf};

use super::make_id;

/// Root of a repository tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryNode {
    id: String,
    path: PathBuf,
    name: String,
    branch: Option<String>,
}

impl RepositoryNode {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        let repo = path.to_string_lossy();
        let id = make_id(&["r", &*repo]);
        Self {
            id,
            path,
            name,
            branch: None,
        }
    }

    /// Current branch, shown next to the repository name. Not part of the id.
    pub fn with_branch(mut self, branch: Option<String>) -> Self {
        self.branch = branch;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }
}
