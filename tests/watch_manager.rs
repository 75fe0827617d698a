// tests/watch_manager.rs

mod common;
use crate::common::{canonical, fake_repository, init_tracing, with_timeout};

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use stashwatch::watch::{
    refs_dir, FsEvent, NotifyBackend, RepositoryChanged, RepositoryWatchManager, WatchEventKind,
};
use stashwatch_test_utils::{ManualWatchBackend, RecordingLog, RecordingNotifier};

struct Harness {
    backend: ManualWatchBackend,
    notifier: RecordingNotifier,
    manager: RepositoryWatchManager,
    changes: mpsc::UnboundedReceiver<RepositoryChanged>,
}

fn harness() -> Harness {
    init_tracing();
    let backend = ManualWatchBackend::new();
    let notifier = RecordingNotifier::new();
    let (tx, rx) = mpsc::unbounded_channel();
    let manager = RepositoryWatchManager::new(
        Arc::new(backend.clone()),
        tx,
        Arc::new(notifier.clone()),
    );
    Harness {
        backend,
        notifier,
        manager,
        changes: rx,
    }
}

#[test]
fn repository_without_refs_is_not_watched() {
    let mut h = harness();
    let dir = tempfile::tempdir().unwrap();

    h.manager.register(dir.path());

    assert!(h.backend.opened().is_empty());
    assert!(h.manager.watched_paths(dir.path()).is_empty());
    assert!(h.notifier.warnings().is_empty());
}

#[test]
fn registering_twice_creates_one_watch() {
    let mut h = harness();
    let repo = fake_repository();

    h.manager.register(repo.path());
    h.manager.register(repo.path());

    assert_eq!(h.backend.opened(), vec![refs_dir(repo.path())]);
    assert_eq!(h.manager.watched_paths(repo.path()), vec![refs_dir(repo.path()).as_path()]);
}

#[test]
fn only_stash_events_are_forwarded() {
    let mut h = harness();
    let repo = fake_repository();
    h.manager.register(repo.path());
    let refs = refs_dir(repo.path());

    assert!(h.backend.emit(&refs, FsEvent::new(WatchEventKind::Change, Some("heads/main"))));
    assert!(h.backend.emit(&refs, FsEvent::new(WatchEventKind::Change, None)));
    assert!(h.changes.try_recv().is_err());

    assert!(h.backend.emit(&refs, FsEvent::new(WatchEventKind::Rename, Some("stash"))));
    assert_eq!(
        h.changes.try_recv().unwrap(),
        RepositoryChanged {
            kind: WatchEventKind::Rename,
            repository: repo.path().to_path_buf(),
        }
    );
    assert!(h.changes.try_recv().is_err());
}

#[test]
fn watch_failure_warns_once_and_spares_other_repositories() {
    let mut h = harness();
    let broken = fake_repository();
    let healthy = fake_repository();
    h.backend.fail_for(refs_dir(broken.path()));

    h.manager.initialize([broken.path(), healthy.path()]);
    h.manager.register(broken.path());

    let warnings = h.notifier.warnings();
    assert_eq!(warnings.len(), 1, "{warnings:?}");
    assert!(warnings[0].contains(&refs_dir(broken.path()).display().to_string()));

    assert!(h.manager.watched_paths(broken.path()).is_empty());
    assert_eq!(h.manager.watched_paths(healthy.path()).len(), 1);

    let refs = refs_dir(healthy.path());
    assert!(h.backend.emit(&refs, FsEvent::new(WatchEventKind::Change, Some("stash"))));
    assert_eq!(h.changes.try_recv().unwrap().repository, healthy.path().to_path_buf());
}

#[test]
fn reconcile_adds_and_removes_roots() {
    let mut h = harness();
    let first = fake_repository();
    let second = fake_repository();
    h.manager.initialize([first.path()]);

    h.manager
        .reconcile(&[second.path().to_path_buf()], &[first.path().to_path_buf()]);

    assert!(h.manager.watched_paths(first.path()).is_empty());
    assert_eq!(h.manager.watched_paths(second.path()).len(), 1);
    assert_eq!(h.backend.closed(), vec![refs_dir(first.path())]);
    assert_eq!(h.backend.active(), 1);
}

#[test]
fn teardown_of_unknown_root_is_a_no_op() {
    let mut h = harness();
    h.manager.teardown(&PathBuf::from("/does/not/exist"));
    assert!(h.backend.closed().is_empty());
}

#[test]
fn dispose_closes_everything_and_is_idempotent() {
    let mut h = harness();
    let a = fake_repository();
    let b = fake_repository();
    h.manager.initialize([a.path(), b.path()]);
    assert_eq!(h.backend.active(), 2);

    h.manager.dispose();
    h.manager.dispose();

    assert_eq!(h.backend.active(), 0);
    assert_eq!(h.backend.closed().len(), 2);
    assert!(h.manager.repositories().is_empty());

    // Closed watches deliver nothing.
    let refs = refs_dir(a.path());
    assert!(!h.backend.emit(&refs, FsEvent::new(WatchEventKind::Change, Some("stash"))));
}

#[test]
fn dropping_the_manager_closes_watches() {
    let h = harness();
    let repo = fake_repository();
    let Harness { backend, mut manager, .. } = h;
    manager.register(repo.path());

    drop(manager);

    assert_eq!(backend.active(), 0);
    assert_eq!(backend.closed(), vec![refs_dir(repo.path())]);
}

#[test]
fn debug_log_sees_watch_lifecycle_and_stash_events() {
    let h = harness();
    let log = RecordingLog::new();
    let Harness { backend, manager, .. } = h;
    let mut manager = manager.with_debug_log(Arc::new(log.clone()));
    let repo = fake_repository();

    manager.register(repo.path());
    backend.emit(&refs_dir(repo.path()), FsEvent::new(WatchEventKind::Change, Some("stash")));
    manager.teardown(repo.path());

    let lines = log.lines();
    assert!(lines[0].starts_with("[FSWatch] Watch "), "{lines:?}");
    assert!(lines.iter().any(|l| l.starts_with("[FSWatch] change stash in ")), "{lines:?}");
    assert!(lines.last().unwrap().starts_with("[FSWatch] Stop watching "), "{lines:?}");
}

#[tokio::test]
async fn native_watch_reports_stash_ref_writes() {
    init_tracing();
    let repo = fake_repository();
    let root = canonical(repo.path());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut manager =
        RepositoryWatchManager::new(Arc::new(NotifyBackend), tx, Arc::new(RecordingNotifier::new()));
    manager.register(&root);
    assert_eq!(manager.watched_paths(&root).len(), 1);

    // Give the backend a moment to arm before writing.
    tokio::time::sleep(Duration::from_millis(100)).await;
    // A top-level ref the flat watch does see, but which is not a stash.
    fs::write(refs_dir(&root).join("ORIG"), "0000\n").unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(rx.try_recv().is_err(), "non-stash ref write was forwarded");

    fs::write(refs_dir(&root).join("stash"), "1234\n").unwrap();

    let change = with_timeout(rx.recv()).await.expect("a stash change");
    assert_eq!(change.repository, root);

    manager.dispose();
}
