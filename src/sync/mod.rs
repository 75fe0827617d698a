// src/sync/mod.rs

//! Re-querying repositories and publishing rebuilt trees.
//!
//! - [`load`] turns git output for one repository into a `RepositoryTree`.
//! - [`synchronizer`] keeps the latest tree per repository and reacts to
//!   watch notifications.
//!
//! Trees are replaced wholesale; consumers compare old and new by id.

pub mod load;
pub mod synchronizer;

use std::path::PathBuf;

use crate::node::{RepositoryTree, TreeDiff};

pub use load::load_tree;
pub use synchronizer::StashTreeSynchronizer;

/// Result of one refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeUpdate {
    pub repository: PathBuf,
    /// Tree from the previous cycle, `None` on the first refresh.
    pub previous: Option<RepositoryTree>,
    pub current: RepositoryTree,
}

impl TreeUpdate {
    /// Ids added, removed and kept since the previous cycle. On the first
    /// refresh everything counts as added.
    pub fn diff(&self) -> TreeDiff {
        match &self.previous {
            Some(previous) => previous.diff(&self.current),
            None => TreeDiff {
                added: self.current.ids().into_iter().map(str::to_string).collect(),
                ..TreeDiff::default()
            },
        }
    }
}
