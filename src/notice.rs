// src/notice.rs

//! User-visible notices, separate from the diagnostic log.

/// Surfaces warnings to the person running stashwatch.
pub trait Notifier: Send + Sync {
    fn show_warning(&self, message: &str);
}

/// Writes notices to stderr, keeping stdout for rendered trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn show_warning(&self, message: &str) {
        eprintln!("[stashwatch] warning: {message}");
    }
}
