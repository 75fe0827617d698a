// src/git/stash.rs

//! Stash queries and the parsers for their output.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::client::{args, GitClient};
use crate::exec::Execution;
use crate::node::FileNodeType;

/// Field separator used in the `stash list` format string (ASCII unit separator).
const FIELD_SEP: char = '\u{1f}';

const STASH_LIST_FORMAT: &str = "--format=%gd%x1f%h%x1f%H%x1f%ct%x1f%s";

static SELECTOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:refs/)?stash@\{(\d+)\}$").expect("valid stash selector regex"));

/// One line of `git stash list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StashRecord {
    pub index: usize,
    pub short_hash: String,
    pub hash: String,
    /// Commit time, seconds since the unix epoch.
    pub timestamp: i64,
    pub message: String,
}

/// One file touched by a stash, with `/` separated repository-relative paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub kind: FileNodeType,
    pub path: String,
    /// Source path of a rename or copy.
    pub old_path: Option<String>,
}

impl GitClient {
    /// True when `cwd` is inside a git work tree.
    pub fn is_repository(&self, cwd: &Path) -> Execution {
        let params = args(["rev-parse", "--is-inside-work-tree"]);
        self.exec_with(params, cwd, |result| {
            result.stdout = result.stdout.trim().to_string();
        })
    }

    pub fn stash_list(&self, cwd: &Path) -> Execution {
        self.exec(args(["stash", "list", STASH_LIST_FORMAT]), cwd)
    }

    /// Tracked files changed by `stash@{index}`, as `--name-status -z` output.
    pub fn stash_files(&self, cwd: &Path, index: usize) -> Execution {
        let reference = stash_reference(index);
        self.exec(args(["stash", "show", "--name-status", "-z", &reference]), cwd)
    }

    /// Untracked files saved by `stash@{index}` (its third parent).
    ///
    /// Fails with a non-zero exit when the stash was created without
    /// untracked files.
    pub fn stash_untracked_files(&self, cwd: &Path, index: usize) -> Execution {
        let reference = format!("{}^3", stash_reference(index));
        self.exec(args(["show", "--format=", "--name-only", "-z", &reference]), cwd)
    }
}

pub fn stash_reference(index: usize) -> String {
    format!("stash@{{{index}}}")
}

/// Parse the output of [`GitClient::stash_list`].
pub fn parse_stash_list(raw: &str) -> Vec<StashRecord> {
    raw.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let record = parse_stash_line(line);
            if record.is_none() {
                debug!(line, "skipping unparsable stash list line");
            }
            record
        })
        .collect()
}

fn parse_stash_line(line: &str) -> Option<StashRecord> {
    let mut fields = line.splitn(5, FIELD_SEP);
    let selector = fields.next()?.trim();
    let short_hash = fields.next()?.trim();
    let hash = fields.next()?.trim();
    let timestamp = fields.next()?.trim().parse::<i64>().ok()?;
    let message = fields.next().unwrap_or("").trim();

    let index = SELECTOR_RE
        .captures(selector)?
        .get(1)?
        .as_str()
        .parse::<usize>()
        .ok()?;

    if short_hash.is_empty() || hash.is_empty() {
        return None;
    }

    Some(StashRecord {
        index,
        short_hash: short_hash.to_string(),
        hash: hash.to_string(),
        timestamp,
        message: message.to_string(),
    })
}

/// Parse `--name-status -z` output: a status token followed by one path, or
/// two paths (source then destination) for renames and copies.
pub fn parse_name_status(raw: &str) -> Vec<FileChange> {
    let mut tokens = raw.split('\0').filter(|t| !t.is_empty());
    let mut changes = Vec::new();

    while let Some(status) = tokens.next() {
        let status = status.trim();
        let Some(letter) = status.chars().next() else {
            continue;
        };

        let change = match letter {
            'R' | 'C' => {
                let (Some(old), Some(new)) = (tokens.next(), tokens.next()) else {
                    debug!(status, "truncated rename/copy entry");
                    break;
                };
                FileChange {
                    kind: if letter == 'R' {
                        FileNodeType::Renamed
                    } else {
                        FileNodeType::Added
                    },
                    path: new.to_string(),
                    old_path: (letter == 'R').then(|| old.to_string()),
                }
            }
            _ => {
                let Some(path) = tokens.next() else {
                    debug!(status, "status without a path");
                    break;
                };
                let kind = match letter {
                    'A' => FileNodeType::Added,
                    'D' => FileNodeType::Deleted,
                    'M' | 'T' | 'U' => FileNodeType::Modified,
                    other => {
                        debug!(status = %other, path, "skipping unknown file status");
                        continue;
                    }
                };
                FileChange {
                    kind,
                    path: path.to_string(),
                    old_path: None,
                }
            }
        };

        changes.push(change);
    }

    changes
}

/// Parse `--name-only -z` output of the untracked-files commit.
///
/// Paths are taken verbatim; only the separator git may print after the
/// empty commit header is skipped.
pub fn parse_untracked(raw: &str) -> Vec<FileChange> {
    let raw = raw.strip_prefix('\n').unwrap_or(raw);
    raw.split('\0')
        .filter(|p| !p.is_empty())
        .map(|path| FileChange {
            kind: FileNodeType::Untracked,
            path: path.to_string(),
            old_path: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stash_list_lines() {
        let raw = "stash@{0}\u{1f}1a2b3c4\u{1f}1a2b3c4d5e6f\u{1f}1700000000\u{1f}On main: wip\n\
                   stash@{1}\u{1f}9f8e7d6\u{1f}9f8e7d6c5b4a\u{1f}1690000000\u{1f}WIP on dev: 123abc fix\n";
        let stashes = parse_stash_list(raw);
        assert_eq!(stashes.len(), 2);
        assert_eq!(
            stashes[0],
            StashRecord {
                index: 0,
                short_hash: "1a2b3c4".into(),
                hash: "1a2b3c4d5e6f".into(),
                timestamp: 1_700_000_000,
                message: "On main: wip".into(),
            }
        );
        assert_eq!(stashes[1].index, 1);
        assert_eq!(stashes[1].message, "WIP on dev: 123abc fix");
    }

    #[test]
    fn message_may_contain_separator_like_text() {
        let raw = "stash@{3}\u{1f}abc\u{1f}abcdef\u{1f}1\u{1f}On main: a\u{1f}b";
        let stashes = parse_stash_list(raw);
        assert_eq!(stashes[0].index, 3);
        assert_eq!(stashes[0].message, "On main: a\u{1f}b");
    }

    #[test]
    fn skips_malformed_stash_lines() {
        let raw = "garbage\nstash@{x}\u{1f}a\u{1f}b\u{1f}1\u{1f}m\n\n";
        assert!(parse_stash_list(raw).is_empty());
    }

    #[test]
    fn parses_name_status_with_renames() {
        let raw = "M\0src/lib.rs\0A\0README.md\0R100\0old/name.txt\0new/name.txt\0D\0gone.txt\0";
        let changes = parse_name_status(raw);
        assert_eq!(changes.len(), 4);
        assert_eq!(changes[0].kind, FileNodeType::Modified);
        assert_eq!(changes[0].path, "src/lib.rs");
        assert_eq!(changes[1].kind, FileNodeType::Added);
        assert_eq!(
            changes[2],
            FileChange {
                kind: FileNodeType::Renamed,
                path: "new/name.txt".into(),
                old_path: Some("old/name.txt".into()),
            }
        );
        assert_eq!(changes[3].kind, FileNodeType::Deleted);
    }

    #[test]
    fn copies_become_additions() {
        let changes = parse_name_status("C075\0a.txt\0b.txt\0");
        assert_eq!(changes[0].kind, FileNodeType::Added);
        assert_eq!(changes[0].path, "b.txt");
        assert_eq!(changes[0].old_path, None);
    }

    #[test]
    fn untracked_paths_are_all_untracked() {
        let changes = parse_untracked("notes.txt\0tmp/scratch.rs\0");
        assert_eq!(changes.len(), 2);
        assert!(changes.iter().all(|c| c.kind == FileNodeType::Untracked));
        assert_eq!(changes[1].path, "tmp/scratch.rs");
    }

    #[test]
    fn untracked_paths_keep_surrounding_whitespace() {
        let untracked = parse_untracked(" notes.txt \0");
        assert_eq!(untracked.len(), 1);
        assert_eq!(untracked[0].path, " notes.txt ");

        let tracked = parse_name_status("A\0 notes.txt \0");
        assert_eq!(tracked[0].path, untracked[0].path);

        let with_header = parse_untracked("\nsrc/a.rs\0");
        assert_eq!(with_header[0].path, "src/a.rs");
    }

    #[test]
    fn stash_reference_format() {
        assert_eq!(stash_reference(2), "stash@{2}");
    }
}
