// src/watch/mod.rs

//! Stash-aware file watching.
//!
//! This module is responsible for:
//! - Wrapping a native directory watch (`notify`) together with the path it
//!   was created for ([`path_watcher`]).
//! - Keeping one watch per repository on `.git/refs` and reducing raw
//!   filesystem events to [`RepositoryChanged`] notifications ([`manager`]).
//! - The event contract and the pure stash filter ([`event`]).
//!
//! It does **not** query git; the synchronizer reacts to the notifications.

pub mod event;
pub mod manager;
pub mod path_watcher;

pub use event::{is_stash_event, FsEvent, RepositoryChanged, WatchEventKind};
pub use manager::{refs_dir, RepositoryWatchManager};
pub use path_watcher::{
    EventCallback, NativeWatch, NotifyBackend, PathWatcher, WatchBackend, WatchError,
};
