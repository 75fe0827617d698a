use std::sync::{Arc, Mutex};

use stashwatch::logging::DebugLog;
use stashwatch::notice::Notifier;

/// Debug log sink that keeps every line.
#[derive(Clone, Default)]
pub struct RecordingLog {
    lines: Arc<Mutex<Vec<String>>>,
}

impl RecordingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl DebugLog for RecordingLog {
    fn log(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}

/// Notifier that keeps every warning instead of showing it.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    warnings: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn show_warning(&self, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }
}
