// src/node/file.rs

use std::fmt;
use std::path::{is_separator, Path, PathBuf, MAIN_SEPARATOR};

use super::make_id;
use super::stash::StashNode;
use crate::git::FileChange;

/// How a stash touched a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileNodeType {
    Added,
    Deleted,
    Modified,
    Renamed,
    Untracked,
}

impl FileNodeType {
    /// One-letter tag used in node ids.
    pub fn tag(self) -> char {
        match self {
            FileNodeType::Added => 'A',
            FileNodeType::Deleted => 'D',
            FileNodeType::Modified => 'M',
            FileNodeType::Renamed => 'R',
            FileNodeType::Untracked => 'U',
        }
    }
}

impl fmt::Display for FileNodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// A file changed by a stash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    id: String,
    kind: FileNodeType,
    repository: PathBuf,
    stash_short_hash: String,
    sub_path: String,
    file_name: String,
    old_sub_path: Option<String>,
    old_file_name: Option<String>,
}

impl FileNode {
    pub fn new(
        kind: FileNodeType,
        stash: &StashNode,
        sub_path: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self::from_parts(kind, stash.repository(), stash.short_hash(), sub_path, file_name)
    }

    /// Like [`FileNode::new`] without needing the stash itself.
    pub fn from_parts(
        kind: FileNodeType,
        repository: &Path,
        stash_short_hash: &str,
        sub_path: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        let sub_path = sub_path.into();
        let file_name = file_name.into();
        let relative = normalize_relative(&sub_path, &file_name);
        let tag = format!("f{}", kind.tag());
        let repo = repository.to_string_lossy();
        let id = make_id(&[tag.as_str(), &*repo, stash_short_hash, relative.as_str()]);

        Self {
            id,
            kind,
            repository: repository.to_path_buf(),
            stash_short_hash: stash_short_hash.to_string(),
            sub_path,
            file_name,
            old_sub_path: None,
            old_file_name: None,
        }
    }

    /// Build a node from a parsed `git stash show` entry.
    pub fn from_change(stash: &StashNode, change: &FileChange) -> Self {
        let (sub_path, file_name) = split_path(&change.path);
        let node = Self::new(change.kind, stash, sub_path, file_name);
        match &change.old_path {
            Some(old) => {
                let (old_sub, old_name) = split_path(old);
                node.with_old(old_sub, old_name)
            }
            None => node,
        }
    }

    /// Record the pre-rename location. Does not affect the id.
    pub fn with_old(mut self, sub_path: impl Into<String>, file_name: impl Into<String>) -> Self {
        self.old_sub_path = Some(sub_path.into());
        self.old_file_name = Some(file_name.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> FileNodeType {
        self.kind
    }

    pub fn repository(&self) -> &Path {
        &self.repository
    }

    pub fn stash_short_hash(&self) -> &str {
        &self.stash_short_hash
    }

    /// Directory part of the relative path; `.` for files at the root.
    pub fn sub_path(&self) -> &str {
        &self.sub_path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// `sub/path/file.ext`, relative to the repository.
    pub fn relative_path(&self) -> String {
        normalize_relative(&self.sub_path, &self.file_name)
    }

    /// Absolute path of the file in the work tree.
    pub fn path(&self) -> PathBuf {
        self.repository.join(self.relative_path())
    }

    pub fn old_sub_path(&self) -> Option<&str> {
        self.old_sub_path.as_deref()
    }

    pub fn old_file_name(&self) -> Option<&str> {
        self.old_file_name.as_deref()
    }

    pub fn old_relative_path(&self) -> Option<String> {
        let name = self.old_file_name.as_deref()?;
        Some(normalize_relative(self.old_sub_path.as_deref().unwrap_or("."), name))
    }

    pub fn old_path(&self) -> Option<PathBuf> {
        self.old_relative_path().map(|rel| self.repository.join(rel))
    }

    pub fn is_added(&self) -> bool {
        self.kind == FileNodeType::Added
    }

    pub fn is_deleted(&self) -> bool {
        self.kind == FileNodeType::Deleted
    }

    pub fn is_modified(&self) -> bool {
        self.kind == FileNodeType::Modified
    }

    pub fn is_renamed(&self) -> bool {
        self.kind == FileNodeType::Renamed
    }

    pub fn is_untracked(&self) -> bool {
        self.kind == FileNodeType::Untracked
    }
}

/// Join `sub_path` and `file_name` and normalize the result.
///
/// Empty and `.` segments are dropped, `..` removes the previous segment,
/// and segments are joined with the platform separator. An empty result is `.`.
pub fn normalize_relative(sub_path: &str, file_name: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in sub_path.split(is_separator).chain(file_name.split(is_separator)) {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        return ".".to_string();
    }
    segments.join(&MAIN_SEPARATOR.to_string())
}

/// Split a `/` separated git path into (sub path, file name).
pub fn split_path(path: &str) -> (String, String) {
    match path.rsplit_once('/') {
        Some((dir, name)) if !dir.is_empty() => (dir.to_string(), name.to_string()),
        Some((_, name)) => (".".to_string(), name.to_string()),
        None => (".".to_string(), path.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sep(parts: &[&str]) -> String {
        parts.join(&MAIN_SEPARATOR.to_string())
    }

    #[test]
    fn trailing_separator_does_not_change_relative_path() {
        assert_eq!(normalize_relative("a/b", "c.txt"), normalize_relative("a/b/", "c.txt"));
        assert_eq!(normalize_relative("a/b", "c.txt"), sep(&["a", "b", "c.txt"]));
    }

    #[test]
    fn dot_segments_are_resolved() {
        assert_eq!(normalize_relative(".", "c.txt"), "c.txt");
        assert_eq!(normalize_relative("a/./b/..", "c.txt"), sep(&["a", "c.txt"]));
        assert_eq!(normalize_relative("..", "c.txt"), sep(&["..", "c.txt"]));
        assert_eq!(normalize_relative("", ""), ".");
    }

    #[test]
    fn split_path_handles_root_files() {
        assert_eq!(split_path("src/node/file.rs"), ("src/node".into(), "file.rs".into()));
        assert_eq!(split_path("README.md"), (".".into(), "README.md".into()));
        assert_eq!(split_path("/top"), (".".into(), "top".into()));
    }

    #[test]
    fn id_is_derived_from_type_repo_hash_and_path() {
        let a = FileNode::from_parts(FileNodeType::Modified, Path::new("/r"), "abc1234", "a/b", "c.txt");
        let b = FileNode::from_parts(FileNodeType::Modified, Path::new("/r"), "abc1234", "a/b/", "c.txt");
        assert_eq!(a.id(), b.id());
        assert_eq!(a.id(), format!("fM./r.abc1234.{}", sep(&["a", "b", "c.txt"])));

        let other_type = FileNode::from_parts(FileNodeType::Added, Path::new("/r"), "abc1234", "a/b", "c.txt");
        let other_repo = FileNode::from_parts(FileNodeType::Modified, Path::new("/s"), "abc1234", "a/b", "c.txt");
        let other_hash = FileNode::from_parts(FileNodeType::Modified, Path::new("/r"), "def5678", "a/b", "c.txt");
        let other_path = FileNode::from_parts(FileNodeType::Modified, Path::new("/r"), "abc1234", "a/b", "d.txt");
        for other in [other_type, other_repo, other_hash, other_path] {
            assert_ne!(a.id(), other.id());
        }
    }

    #[test]
    fn old_paths_only_exist_for_renames() {
        let plain = FileNode::from_parts(FileNodeType::Modified, Path::new("/r"), "abc", "src", "a.rs");
        assert_eq!(plain.old_relative_path(), None);
        assert_eq!(plain.old_path(), None);

        let renamed = FileNode::from_parts(FileNodeType::Renamed, Path::new("/r"), "abc", "src", "b.rs")
            .with_old("src/", "a.rs");
        assert_eq!(renamed.old_relative_path(), Some(sep(&["src", "a.rs"])));
        assert_eq!(renamed.old_path(), Some(Path::new("/r").join(sep(&["src", "a.rs"]))));
        assert_eq!(renamed.path(), Path::new("/r").join(sep(&["src", "b.rs"])));
    }

    #[test]
    fn predicates_follow_the_type_tag() {
        let node = |kind| FileNode::from_parts(kind, Path::new("/r"), "abc", ".", "f");
        assert!(node(FileNodeType::Added).is_added());
        assert!(node(FileNodeType::Deleted).is_deleted());
        assert!(node(FileNodeType::Modified).is_modified());
        assert!(node(FileNodeType::Renamed).is_renamed());
        assert!(node(FileNodeType::Untracked).is_untracked());
        assert!(!node(FileNodeType::Untracked).is_added());
    }
}
