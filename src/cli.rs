// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `stashwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "stashwatch",
    version,
    about = "Watch git repositories and print their stashes as they change.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Stashwatch.toml` in the current working directory. A
    /// missing default file is not an error.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Repository root to track (repeatable). Overrides `repositories` from
    /// the config file; defaults to the current directory.
    #[arg(long = "repo", value_name = "PATH")]
    pub repos: Vec<PathBuf>,

    /// Print the stash trees once and exit, no watching.
    #[arg(long)]
    pub once: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `STASHWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Log every git invocation with its duration, and every stash event.
    #[arg(long)]
    pub debug_exec: bool,

    /// Resolve config and repositories, print them, but don't run git.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_flag_is_repeatable() {
        let args = CliArgs::parse_from(["stashwatch", "--repo", "a", "--repo", "b", "--once"]);
        assert_eq!(args.repos, vec![PathBuf::from("a"), PathBuf::from("b")]);
        assert!(args.once);
        assert!(args.config.is_none());
        assert!(!args.debug_exec);
    }

    #[test]
    fn log_level_parses_value_enum() {
        let args = CliArgs::parse_from(["stashwatch", "--log-level", "debug"]);
        assert!(matches!(args.log_level, Some(LogLevel::Debug)));
    }
}
