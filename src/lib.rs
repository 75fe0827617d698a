// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod git;
pub mod logging;
pub mod node;
pub mod notice;
pub mod sync;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::loader::{default_config_path, load_and_validate, load_or_default};
use crate::config::model::ConfigFile;
use crate::errors::StashwatchError;
use crate::exec::ProcessExecutor;
use crate::git::GitClient;
use crate::logging::{DebugLog, TracingDebugLog};
use crate::node::RepositoryTree;
use crate::notice::StderrNotifier;
use crate::sync::{StashTreeSynchronizer, TreeUpdate};
use crate::watch::{NotifyBackend, RepositoryWatchManager};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and repository resolution
/// - the process executor and git client
/// - the synchronizer task
/// - (optional) stash ref watchers
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let candidates = resolve_repositories(&args, &cfg);

    if args.dry_run {
        print_dry_run(&cfg, &candidates);
        return Ok(());
    }

    let debug_log: Option<Arc<dyn DebugLog>> = if args.debug_exec || cfg.debug.exec {
        Some(Arc::new(TracingDebugLog))
    } else {
        None
    };

    let executor = match &debug_log {
        Some(log) => ProcessExecutor::with_debug_log(log.clone()),
        None => ProcessExecutor::new(),
    };
    let git = GitClient::from_settings(Arc::new(executor), &cfg.git);

    let repositories = filter_repositories(&git, candidates).await;
    if repositories.is_empty() {
        bail!("no git repositories to track");
    }
    info!(?repositories, "tracking repositories");

    if args.once {
        let mut sync = StashTreeSynchronizer::new(git);
        for repository in &repositories {
            let update = sync.refresh(repository).await;
            print_tree(&update.current);
        }
        return Ok(());
    }

    let (changes_tx, changes_rx) = mpsc::unbounded_channel();
    let (updates_tx, mut updates_rx) = mpsc::channel::<TreeUpdate>(16);

    let mut manager =
        RepositoryWatchManager::new(Arc::new(NotifyBackend), changes_tx, Arc::new(StderrNotifier));
    if let Some(log) = &debug_log {
        manager = manager.with_debug_log(log.clone());
    }
    manager.initialize(&repositories);

    let sync = StashTreeSynchronizer::new(git);
    let sync_task = tokio::spawn(sync.run(repositories.clone(), changes_rx, updates_tx));

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            update = updates_rx.recv() => match update {
                Some(update) => render_update(&update),
                None => break,
            },
            res = &mut ctrl_c => {
                res.context("failed to listen for Ctrl+C")?;
                info!("shutdown requested");
                break;
            }
        }
    }

    // Dropping the manager closes the change channel, which ends the
    // synchronizer loop.
    manager.dispose();
    drop(manager);
    drop(updates_rx);

    match sync_task.await.context("synchronizer task panicked")? {
        Ok(()) => Ok(()),
        Err(StashwatchError::ChannelClosed(reason)) => {
            debug!(%reason, "synchronizer stopped after shutdown");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

/// Explicit `--config` paths must exist; the default one is optional.
fn load_config(path: Option<&Path>) -> Result<ConfigFile> {
    match path {
        Some(path) => load_and_validate(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => {
            let path = default_config_path();
            load_or_default(&path)
                .with_context(|| format!("failed to load config {}", path.display()))
        }
    }
}

/// `--repo` flags win over the config file; with neither, use the current directory.
fn resolve_repositories(args: &CliArgs, cfg: &ConfigFile) -> Vec<PathBuf> {
    let chosen = if !args.repos.is_empty() {
        args.repos.clone()
    } else if !cfg.repositories.is_empty() {
        cfg.repositories.clone()
    } else {
        vec![PathBuf::from(".")]
    };

    let mut out: Vec<PathBuf> = Vec::with_capacity(chosen.len());
    for path in chosen {
        let path = std::fs::canonicalize(&path).unwrap_or(path);
        if !out.contains(&path) {
            out.push(path);
        }
    }
    out
}

/// Drop candidates that are not git work trees, with a warning each.
async fn filter_repositories(git: &GitClient, candidates: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut out = Vec::with_capacity(candidates.len());
    for path in candidates {
        match git.is_repository(&path).await {
            Ok(result) if result.stdout == "true" => out.push(path),
            Ok(result) => warn!(path = ?path, output = %result.out(), "not inside a work tree; skipping"),
            Err(failure) => warn!(path = ?path, error = %failure, "not a git repository; skipping"),
        }
    }
    out
}

fn render_update(update: &TreeUpdate) {
    if update.previous.is_some() && update.diff().is_unchanged() {
        debug!(repository = ?update.repository, "stash tree unchanged");
        return;
    }
    print_tree(&update.current);
}

/// Print a tree to stdout, two spaces of indent per level.
pub fn print_tree(tree: &RepositoryTree) {
    for (depth, node) in tree.walk() {
        println!("{}{}", "  ".repeat(depth), node.label());
    }
    println!();
}

/// Simple dry-run output: print the effective configuration.
fn print_dry_run(cfg: &ConfigFile, repositories: &[PathBuf]) {
    println!("stashwatch dry-run");
    println!("  git.binary = {}", cfg.git.binary);
    match cfg.git.timeout {
        Some(timeout) => println!("  git.timeout = {timeout:?}"),
        None => println!("  git.timeout = none"),
    }
    println!(
        "  git.encoding = {}",
        cfg.git.encoding.as_deref().unwrap_or("utf-8")
    );
    println!("  debug.exec = {}", cfg.debug.exec);
    println!();

    println!("repositories ({}):", repositories.len());
    for repository in repositories {
        println!("  - {}", repository.display());
    }

    debug!("dry-run complete (no git commands run)");
}
