// src/watch/path_watcher.rs

//! A single native directory watch tagged with the path it was created for.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use thiserror::Error;
use tracing::{debug, warn};

use super::event::FsEvent;

/// Observer invoked for every low-level change under a watched path.
///
/// Runs on whatever thread the platform backend delivers events on.
pub type EventCallback = Arc<dyn Fn(FsEvent) + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("failed to watch {path:?}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}

/// Native handle kept alive for as long as the watch should run.
pub trait NativeWatch: Send {
    /// Stop delivering events and release the OS resources.
    fn close(&mut self);
}

/// Creates native watches. [`NotifyBackend`] in production.
pub trait WatchBackend: Send + Sync {
    fn watch(&self, path: &Path, on_event: EventCallback) -> Result<Box<dyn NativeWatch>, WatchError>;
}

/// Backend based on `notify::RecommendedWatcher` (inotify, FSEvents,
/// ReadDirectoryChangesW).
#[derive(Debug, Clone, Copy, Default)]
pub struct NotifyBackend;

struct NotifyWatch {
    watcher: RecommendedWatcher,
    path: PathBuf,
}

impl NativeWatch for NotifyWatch {
    fn close(&mut self) {
        if let Err(err) = self.watcher.unwatch(&self.path) {
            debug!(path = ?self.path, error = %err, "unwatch failed; dropping watcher anyway");
        }
    }
}

impl WatchBackend for NotifyBackend {
    fn watch(&self, path: &Path, on_event: EventCallback) -> Result<Box<dyn NativeWatch>, WatchError> {
        let watched = path.to_path_buf();

        // Called synchronously by notify whenever an event arrives.
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    for fs_event in FsEvent::from_notify(&watched, &event) {
                        on_event(fs_event);
                    }
                }
                Err(err) => {
                    warn!(path = ?watched, error = %err, "file watch error");
                }
            },
            Config::default(),
        )
        .map_err(|source| WatchError::Create {
            path: path.to_path_buf(),
            source,
        })?;

        // refs/stash sits directly under refs/, so a flat watch is enough.
        watcher
            .watch(path, RecursiveMode::NonRecursive)
            .map_err(|source| WatchError::Create {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Box::new(NotifyWatch {
            watcher,
            path: path.to_path_buf(),
        }))
    }
}

/// One watch plus the path it was created for.
pub struct PathWatcher {
    path: PathBuf,
    handle: Box<dyn NativeWatch>,
}

impl fmt::Debug for PathWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathWatcher").field("path", &self.path).finish_non_exhaustive()
    }
}

impl PathWatcher {
    /// Start watching `path`, calling `on_event` for every change under it.
    pub fn watch<F>(backend: &dyn WatchBackend, path: impl Into<PathBuf>, on_event: F) -> Result<Self, WatchError>
    where
        F: Fn(FsEvent) + Send + Sync + 'static,
    {
        let path = path.into();
        let handle = backend.watch(&path, Arc::new(on_event))?;
        debug!(path = ?path, "path watcher created");
        Ok(Self { path, handle })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this is the watcher for `path`.
    pub fn matches(&self, path: &Path) -> bool {
        self.path == path
    }

    /// Detach the observer and close the native handle.
    pub fn dispose(mut self) {
        self.handle.close();
        debug!(path = ?self.path, "path watcher disposed");
    }
}
