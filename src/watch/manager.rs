// src/watch/manager.rs

//! Per-repository watches on `.git/refs`, reduced to "stash changed" notifications.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use super::event::{is_stash_event, FsEvent, RepositoryChanged};
use super::path_watcher::{PathWatcher, WatchBackend};
use crate::logging::DebugLog;
use crate::notice::Notifier;

/// Directory monitored for a repository root: its ref storage, not the work tree.
pub fn refs_dir(repository: &Path) -> PathBuf {
    repository.join(".git").join("refs")
}

/// Owns the watches of every tracked repository.
///
/// This is the only long-lived mutable state of the watch layer; all
/// mutation goes through `&mut self`.
pub struct RepositoryWatchManager {
    backend: Arc<dyn WatchBackend>,
    watchers: HashMap<PathBuf, Vec<PathWatcher>>,
    /// Monitored paths whose creation failure was already shown to the user.
    warned: HashSet<PathBuf>,
    changes_tx: mpsc::UnboundedSender<RepositoryChanged>,
    notifier: Arc<dyn Notifier>,
    debug_log: Option<Arc<dyn DebugLog>>,
}

impl fmt::Debug for RepositoryWatchManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositoryWatchManager")
            .field("watchers", &self.watchers)
            .field("warned", &self.warned)
            .finish_non_exhaustive()
    }
}

impl RepositoryWatchManager {
    pub fn new(
        backend: Arc<dyn WatchBackend>,
        changes_tx: mpsc::UnboundedSender<RepositoryChanged>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            backend,
            watchers: HashMap::new(),
            warned: HashSet::new(),
            changes_tx,
            notifier,
            debug_log: None,
        }
    }

    pub fn with_debug_log(mut self, log: Arc<dyn DebugLog>) -> Self {
        self.debug_log = Some(log);
        self
    }

    /// Register every repository in `repositories`.
    pub fn initialize<I, P>(&mut self, repositories: I)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for repository in repositories {
            self.register(repository.as_ref());
        }
    }

    /// Apply a change in the set of open repositories.
    pub fn reconcile(&mut self, added: &[PathBuf], removed: &[PathBuf]) {
        for repository in added {
            self.register(repository);
        }
        for repository in removed {
            self.teardown(repository);
        }
    }

    /// Watch `repository`'s refs directory if it exists and is not watched yet.
    pub fn register(&mut self, repository: &Path) {
        self.debug(&format!("[FSWatch] Watch {} ...", repository.display()));

        let path_to_monitor = refs_dir(repository);
        if !path_to_monitor.exists() {
            debug!(repository = ?repository, "no .git/refs directory; not watching");
            return;
        }

        self.register_path_watcher(path_to_monitor, repository);
    }

    fn register_path_watcher(&mut self, path_to_monitor: PathBuf, repository: &Path) {
        let watchers = self.watchers.entry(repository.to_path_buf()).or_default();

        if watchers.iter().any(|w| w.matches(&path_to_monitor)) {
            debug!(path = ?path_to_monitor, "already watching");
            return;
        }

        let tx = self.changes_tx.clone();
        let repo = repository.to_path_buf();
        let debug_log = self.debug_log.clone();
        let on_event = move |event: FsEvent| {
            if !is_stash_event(&event) {
                return;
            }
            if let Some(log) = &debug_log {
                log.log(&format!(
                    "[FSWatch] {} {} in {}",
                    event.kind,
                    event.changed_name.as_deref().unwrap_or("?"),
                    repo.display()
                ));
            }
            let change = RepositoryChanged {
                kind: event.kind,
                repository: repo.clone(),
            };
            if tx.send(change).is_err() {
                debug!(repository = ?repo, "change receiver dropped; ignoring stash event");
            }
        };

        match PathWatcher::watch(self.backend.as_ref(), path_to_monitor.clone(), on_event) {
            Ok(watcher) => {
                info!(repository = ?repository, path = ?path_to_monitor, "watching stash refs");
                watchers.push(watcher);
            }
            Err(err) => {
                error!(path = ?path_to_monitor, error = %err, "unable to create stash monitor");
                if self.warned.insert(path_to_monitor.clone()) {
                    self.notifier.show_warning(&format!(
                        "Unable to create a stash monitor for {}. This can happen on NFS \
                         or when the path is a link. Stashes of this repository will not \
                         refresh automatically; see the log for details.",
                        path_to_monitor.display()
                    ));
                }
            }
        }
    }

    /// Stop watching `repository` and forget it. No-op for unknown roots.
    pub fn teardown(&mut self, repository: &Path) {
        self.debug(&format!("[FSWatch] Stop watching {} ...", repository.display()));

        if let Some(watchers) = self.watchers.remove(repository) {
            for watcher in watchers {
                watcher.dispose();
            }
            info!(repository = ?repository, "stopped watching");
        }
    }

    /// Tear down every repository. Safe to call more than once.
    pub fn dispose(&mut self) {
        let repositories: Vec<PathBuf> = self.watchers.keys().cloned().collect();
        for repository in repositories {
            self.teardown(&repository);
        }
    }

    pub fn repositories(&self) -> Vec<&Path> {
        self.watchers.keys().map(PathBuf::as_path).collect()
    }

    /// Paths currently watched for `repository`.
    pub fn watched_paths(&self, repository: &Path) -> Vec<&Path> {
        self.watchers
            .get(repository)
            .map(|ws| ws.iter().map(PathWatcher::path).collect())
            .unwrap_or_default()
    }

    fn debug(&self, line: &str) {
        if let Some(log) = &self.debug_log {
            log.log(line);
        }
    }
}

impl Drop for RepositoryWatchManager {
    fn drop(&mut self) {
        self.dispose();
    }
}
