// src/watch/event.rs

//! Filesystem events as seen by the stash watcher, and the stash filter.

use std::fmt;
use std::path::{Path, PathBuf};

use notify::event::ModifyKind;
use notify::{Event, EventKind};

/// Coarse kind of a low-level change, mirroring what directory watchers
/// typically report: entries appearing, disappearing or being renamed
/// (`Rename`) versus content or metadata changes (`Change`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WatchEventKind {
    Rename,
    Change,
}

impl WatchEventKind {
    /// `None` for pure access events, which never indicate a ref update.
    pub fn from_notify(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Access(_) => None,
            EventKind::Create(_) | EventKind::Remove(_) => Some(WatchEventKind::Rename),
            EventKind::Modify(ModifyKind::Name(_)) => Some(WatchEventKind::Rename),
            _ => Some(WatchEventKind::Change),
        }
    }
}

impl fmt::Display for WatchEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatchEventKind::Rename => f.write_str("rename"),
            WatchEventKind::Change => f.write_str("change"),
        }
    }
}

/// One change under a watched directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEvent {
    pub kind: WatchEventKind,
    /// Changed entry relative to the watched directory, `/` separated.
    /// Absent when the platform did not report a path.
    pub changed_name: Option<String>,
}

impl FsEvent {
    pub fn new(kind: WatchEventKind, changed_name: Option<&str>) -> Self {
        Self {
            kind,
            changed_name: changed_name.map(str::to_string),
        }
    }

    /// Split a notify event into one `FsEvent` per reported path.
    pub fn from_notify(watched: &Path, event: &Event) -> Vec<FsEvent> {
        let Some(kind) = WatchEventKind::from_notify(&event.kind) else {
            return Vec::new();
        };

        if event.paths.is_empty() {
            return vec![FsEvent {
                kind,
                changed_name: None,
            }];
        }

        event
            .paths
            .iter()
            .map(|path| FsEvent {
                kind,
                changed_name: changed_name(watched, path),
            })
            .collect()
    }
}

/// Whether `event` touches a stash ref (`refs/stash`, `stash.lock`, ...).
pub fn is_stash_event(event: &FsEvent) -> bool {
    match event.changed_name.as_deref() {
        Some(name) => name.contains("stash"),
        // Nothing to inspect: not reported as a stash change.
        None => false,
    }
}

/// "Something under this repository's stash refs changed."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryChanged {
    pub kind: WatchEventKind,
    pub repository: PathBuf,
}

/// Name of `path` relative to `watched`, with forward slashes.
///
/// Tries a direct `strip_prefix` first, then canonicalized paths (macOS
/// reports `/private/var/...` for `/var/...`), then just the file name.
fn changed_name(watched: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(watched) {
        return non_empty(rel);
    }

    if let (Ok(watched_canon), Ok(path_canon)) = (watched.canonicalize(), path.canonicalize()) {
        if let Ok(rel) = path_canon.strip_prefix(&watched_canon) {
            return non_empty(rel);
        }
    }

    path.file_name().map(|name| name.to_string_lossy().into_owned())
}

fn non_empty(rel: &Path) -> Option<String> {
    let s = rel.to_string_lossy().replace('\\', "/");
    (!s.is_empty()).then_some(s)
}
