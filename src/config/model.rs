// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::git::GIT_BINARY;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// repositories = ["~/src/app", "."]
///
/// [git]
/// binary = "git"
/// timeout = "30s"
/// encoding = "utf-8"
///
/// [debug]
/// exec = true
/// ```
///
/// Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    /// Repository roots to track. The CLI `--repo` flag overrides this list.
    #[serde(default)]
    pub repositories: Vec<PathBuf>,

    #[serde(default)]
    pub git: RawGitSection,

    #[serde(default)]
    pub debug: DebugSection,
}

/// `[git]` section as written by the user.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawGitSection {
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Duration string such as `"500ms"` or `"30s"`. No timeout when absent.
    #[serde(default)]
    pub timeout: Option<String>,

    /// Output encoding label understood by `encoding_rs` (e.g. `"latin1"`).
    #[serde(default)]
    pub encoding: Option<String>,
}

fn default_binary() -> String {
    GIT_BINARY.to_string()
}

impl Default for RawGitSection {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            timeout: None,
            encoding: None,
        }
    }
}

/// `[debug]` section.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DebugSection {
    /// Log every git invocation and stash event.
    #[serde(default)]
    pub exec: bool,
}

/// Validated git settings handed to `GitClient::from_settings`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitSettings {
    pub binary: String,
    pub timeout: Option<Duration>,
    pub encoding: Option<String>,
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            timeout: None,
            encoding: None,
        }
    }
}

/// Validated configuration.
///
/// Built from [`RawConfigFile`] through `TryFrom` (see `validate.rs`).
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    pub repositories: Vec<PathBuf>,
    pub git: GitSettings,
    pub debug: DebugSection,
}
