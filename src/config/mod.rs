// src/config/mod.rs

//! Configuration loading and validation for stashwatch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate git settings and repository paths (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_or_default};
pub use model::{ConfigFile, DebugSection, GitSettings, RawConfigFile, RawGitSection};
pub use validate::parse_duration;
