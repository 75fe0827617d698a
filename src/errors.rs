// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::exec::ExecutionFailure;
use crate::watch::WatchError;

#[derive(Error, Debug)]
pub enum StashwatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("git failed: {0}")]
    Execution(#[from] ExecutionFailure),

    #[error(transparent)]
    Watch(#[from] WatchError),

    #[error("Channel closed: {0}")]
    ChannelClosed(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, StashwatchError>;
