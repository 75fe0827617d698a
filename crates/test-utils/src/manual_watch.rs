use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use stashwatch::watch::{EventCallback, FsEvent, NativeWatch, WatchBackend, WatchError};

#[derive(Default)]
struct State {
    callbacks: HashMap<PathBuf, EventCallback>,
    failing: HashSet<PathBuf>,
    opened: Vec<PathBuf>,
    closed: Vec<PathBuf>,
}

/// A watch backend driven by the test:
/// - `emit` delivers an event to the callback registered for a path
/// - `fail_for` makes watch creation fail for a path
/// - `opened` / `closed` record the watch lifecycle.
#[derive(Clone, Default)]
pub struct ManualWatchBackend {
    state: Arc<Mutex<State>>,
}

impl ManualWatchBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, path: impl Into<PathBuf>) -> &Self {
        self.state.lock().unwrap().failing.insert(path.into());
        self
    }

    /// Deliver `event` as if the OS had reported it under `path`.
    /// Returns false when no open watch exists for `path`.
    pub fn emit(&self, path: &Path, event: FsEvent) -> bool {
        let callback = self.state.lock().unwrap().callbacks.get(path).cloned();
        match callback {
            Some(callback) => {
                callback(event);
                true
            }
            None => false,
        }
    }

    /// Paths watches were created for, in creation order.
    pub fn opened(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().opened.clone()
    }

    pub fn closed(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().closed.clone()
    }

    pub fn active(&self) -> usize {
        self.state.lock().unwrap().callbacks.len()
    }
}

struct ManualWatch {
    path: PathBuf,
    state: Arc<Mutex<State>>,
}

impl NativeWatch for ManualWatch {
    fn close(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.callbacks.remove(&self.path);
        state.closed.push(self.path.clone());
    }
}

impl WatchBackend for ManualWatchBackend {
    fn watch(&self, path: &Path, on_event: EventCallback) -> Result<Box<dyn NativeWatch>, WatchError> {
        let mut state = self.state.lock().unwrap();
        if state.failing.contains(path) {
            return Err(WatchError::Create {
                path: path.to_path_buf(),
                source: notify::Error::generic("watch limit reached"),
            });
        }

        state.callbacks.insert(path.to_path_buf(), on_event);
        state.opened.push(path.to_path_buf());
        Ok(Box::new(ManualWatch {
            path: path.to_path_buf(),
            state: Arc::clone(&self.state),
        }))
    }
}
