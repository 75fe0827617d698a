// src/git/mod.rs

//! Git command layer.
//!
//! Wraps a [`CommandRunner`](crate::exec::CommandRunner) with the git
//! executable and exposes one method per operation. Post-processing of the
//! textual output only ever runs on successful results; failures reach the
//! caller exactly as the executor produced them.

pub mod branch;
pub mod client;
pub mod stash;

pub use branch::{branch_names, strip_branch_refs};
pub use client::{GitClient, GIT_BINARY};
pub use stash::{
    parse_name_status, parse_stash_list, parse_untracked, stash_reference, FileChange,
    StashRecord,
};
