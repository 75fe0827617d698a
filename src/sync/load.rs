// src/sync/load.rs

//! One refresh of one repository: git queries in, `RepositoryTree` out.

use std::path::Path;

use tracing::{debug, warn};

use crate::exec::{Execution, ExecutionFailure};
use crate::git::{parse_name_status, parse_stash_list, parse_untracked, GitClient, StashRecord};
use crate::node::{FileNode, RepositoryNode, RepositoryTree, StashNode};

/// Query git for the stashes of `repository` and build its tree.
///
/// Never fails: a failing stash listing becomes a tree holding the error
/// text as a message node, and failing per-stash queries leave that stash
/// without files.
pub async fn load_tree(git: &GitClient, repository: &Path) -> RepositoryTree {
    let branch_exec = git.current_branch(repository);
    let list_exec = git.stash_list(repository);

    let branch = match branch_exec.await {
        Ok(result) => Some(result.stdout).filter(|b| !b.is_empty()),
        Err(failure) => {
            debug!(repository = ?repository, error = %failure, "could not read current branch");
            None
        }
    };
    let root = RepositoryNode::new(repository).with_branch(branch);

    let records = match list_exec.await {
        Ok(result) => parse_stash_list(&result.stdout),
        Err(failure) => {
            warn!(repository = ?repository, error = %failure, "stash list failed");
            return RepositoryTree::with_message(root, failure_text(&failure));
        }
    };

    // Start every detail query before awaiting any, so they run side by side.
    let pending: Vec<(StashRecord, Execution, Execution)> = records
        .into_iter()
        .map(|record| {
            let tracked = git.stash_files(repository, record.index);
            let untracked = git.stash_untracked_files(repository, record.index);
            (record, tracked, untracked)
        })
        .collect();

    let mut stashes = Vec::with_capacity(pending.len());
    for (record, tracked, untracked) in pending {
        let stash = StashNode::new(repository, record);

        let mut changes = match tracked.await {
            Ok(result) => parse_name_status(&result.stdout),
            Err(failure) => {
                warn!(stash = %stash.reference(), error = %failure, "stash show failed");
                Vec::new()
            }
        };

        match untracked.await {
            Ok(result) => changes.extend(parse_untracked(&result.stdout)),
            // No third parent: the stash was made without untracked files.
            Err(ExecutionFailure::NonZeroExit { .. }) => {
                debug!(stash = %stash.reference(), "stash has no untracked files");
            }
            Err(failure) => {
                warn!(stash = %stash.reference(), error = %failure, "listing untracked files failed");
            }
        }

        let files = changes.iter().map(|change| FileNode::from_change(&stash, change)).collect();
        stashes.push(stash.with_files(files));
    }

    RepositoryTree::build(root, stashes)
}

/// What to show the user for a failed listing.
fn failure_text(failure: &ExecutionFailure) -> String {
    let message = failure.message().trim();
    if message.is_empty() {
        failure.to_string()
    } else {
        message.to_string()
    }
}
