// src/sync/synchronizer.rs

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tracing::{debug, info};

use super::load::load_tree;
use super::TreeUpdate;
use crate::errors::{Result, StashwatchError};
use crate::git::GitClient;
use crate::node::RepositoryTree;
use crate::watch::RepositoryChanged;

/// Keeps the latest tree per repository and rebuilds it on demand.
pub struct StashTreeSynchronizer {
    git: GitClient,
    trees: HashMap<PathBuf, RepositoryTree>,
}

impl fmt::Debug for StashTreeSynchronizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StashTreeSynchronizer")
            .field("git", &self.git)
            .field("repositories", &self.trees.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl StashTreeSynchronizer {
    pub fn new(git: GitClient) -> Self {
        Self {
            git,
            trees: HashMap::new(),
        }
    }

    /// Latest tree built for `repository`.
    pub fn tree(&self, repository: &Path) -> Option<&RepositoryTree> {
        self.trees.get(repository)
    }

    /// Rebuild the tree of `repository`, replacing the stored one.
    pub async fn refresh(&mut self, repository: &Path) -> TreeUpdate {
        let current = load_tree(&self.git, repository).await;
        let previous = self.trees.insert(repository.to_path_buf(), current.clone());

        debug!(
            repository = ?repository,
            stashes = current.stashes().count(),
            "repository tree rebuilt"
        );

        TreeUpdate {
            repository: repository.to_path_buf(),
            previous,
            current,
        }
    }

    /// Drop the stored tree of a repository that is no longer open.
    pub fn forget(&mut self, repository: &Path) -> Option<RepositoryTree> {
        self.trees.remove(repository)
    }

    /// Main loop.
    ///
    /// - Refreshes every repository in `initial` once.
    /// - Refreshes a repository once per `RepositoryChanged` received.
    /// - Sends each result on `updates`.
    ///
    /// Returns when `changes` closes; fails if the update receiver is gone.
    pub async fn run(
        mut self,
        initial: Vec<PathBuf>,
        mut changes: mpsc::UnboundedReceiver<RepositoryChanged>,
        updates: mpsc::Sender<TreeUpdate>,
    ) -> Result<()> {
        info!(repositories = initial.len(), "synchronizer started");

        for repository in &initial {
            let update = self.refresh(repository).await;
            publish(&updates, update).await?;
        }

        while let Some(change) = changes.recv().await {
            debug!(repository = ?change.repository, kind = %change.kind, "stash refs changed");
            let update = self.refresh(&change.repository).await;
            publish(&updates, update).await?;
        }

        info!("change channel closed; synchronizer exiting");
        Ok(())
    }
}

async fn publish(updates: &mpsc::Sender<TreeUpdate>, update: TreeUpdate) -> Result<()> {
    updates.send(update).await.map_err(|err| {
        StashwatchError::ChannelClosed(format!(
            "tree update for {:?} was not delivered",
            err.0.repository
        ))
    })
}
