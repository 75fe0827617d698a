// src/node/tree.rs

//! Per-repository node tree and id-based diffing.

use std::collections::{HashMap, HashSet};

use super::{FileNode, MessageNode, Node, RepositoryNode, StashNode, NO_STASHES};

/// Borrowed view of any node in a [`RepositoryTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef<'a> {
    Repository(&'a RepositoryNode),
    Stash(&'a StashNode),
    File(&'a FileNode),
    Message(&'a MessageNode),
}

impl<'a> NodeRef<'a> {
    pub fn id(self) -> &'a str {
        match self {
            NodeRef::Repository(n) => n.id(),
            NodeRef::Stash(n) => n.id(),
            NodeRef::File(n) => n.id(),
            NodeRef::Message(n) => n.id(),
        }
    }

    /// Single-line text for plain renderers.
    pub fn label(self) -> String {
        match self {
            NodeRef::Repository(n) => match n.branch() {
                Some(branch) => format!("{} ({branch})", n.name()),
                None => n.name().to_string(),
            },
            NodeRef::Stash(n) => format!("#{}: {} [{}]", n.index(), n.message(), n.short_hash()),
            NodeRef::File(n) => match n.old_relative_path() {
                Some(old) if n.is_renamed() => {
                    format!("{} {old} -> {}", n.kind(), n.relative_path())
                }
                _ => format!("{} {}", n.kind(), n.relative_path()),
            },
            NodeRef::Message(n) => n.message().to_string(),
        }
    }

    pub fn to_node(self) -> Node {
        match self {
            NodeRef::Repository(n) => Node::Repository(n.clone()),
            NodeRef::Stash(n) => Node::Stash(n.clone()),
            NodeRef::File(n) => Node::File(n.clone()),
            NodeRef::Message(n) => Node::Message(n.clone()),
        }
    }
}

/// The whole tree for one repository, rebuilt on every refresh.
///
/// Children of the root are stash nodes, or a single message node when
/// there is nothing to list. Parent links live in `parents` (child id to
/// parent id) rather than in the nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryTree {
    root: RepositoryNode,
    children: Vec<Node>,
    parents: HashMap<String, String>,
}

impl RepositoryTree {
    /// Tree listing `stashes`; an empty list yields a "No stashes" message.
    pub fn build(root: RepositoryNode, stashes: Vec<StashNode>) -> Self {
        if stashes.is_empty() {
            return Self::with_message(root, NO_STASHES);
        }

        let mut parents = HashMap::new();
        for stash in &stashes {
            parents.insert(stash.id().to_string(), root.id().to_string());
            for file in stash.files() {
                parents.insert(file.id().to_string(), stash.id().to_string());
            }
        }

        Self {
            root,
            children: stashes.into_iter().map(Node::Stash).collect(),
            parents,
        }
    }

    /// Tree whose only child is an informational message.
    pub fn with_message(root: RepositoryNode, message: impl Into<String>) -> Self {
        let message = MessageNode::new(message);
        let mut parents = HashMap::new();
        parents.insert(message.id().to_string(), root.id().to_string());
        Self {
            root,
            children: vec![Node::Message(message)],
            parents,
        }
    }

    pub fn root(&self) -> &RepositoryNode {
        &self.root
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn stashes(&self) -> impl Iterator<Item = &StashNode> {
        self.children.iter().filter_map(|node| match node {
            Node::Stash(stash) => Some(stash),
            _ => None,
        })
    }

    /// Every node with its depth, root first, in display order.
    pub fn walk(&self) -> Vec<(usize, NodeRef<'_>)> {
        let mut out = vec![(0, NodeRef::Repository(&self.root))];
        for child in &self.children {
            match child {
                Node::Stash(stash) => {
                    out.push((1, NodeRef::Stash(stash)));
                    out.extend(stash.files().iter().map(|f| (2, NodeRef::File(f))));
                }
                other => out.push((1, other.as_node_ref())),
            }
        }
        out
    }

    pub fn ids(&self) -> Vec<&str> {
        self.walk().into_iter().map(|(_, node)| node.id()).collect()
    }

    pub fn find(&self, id: &str) -> Option<NodeRef<'_>> {
        self.walk().into_iter().map(|(_, node)| node).find(|node| node.id() == id)
    }

    pub fn parent_id(&self, id: &str) -> Option<&str> {
        self.parents.get(id).map(String::as_str)
    }

    pub fn parent(&self, id: &str) -> Option<NodeRef<'_>> {
        self.find(self.parent_id(id)?)
    }

    /// Compare against a newer tree by id.
    pub fn diff(&self, next: &RepositoryTree) -> TreeDiff {
        let old_ids: HashSet<&str> = self.ids().into_iter().collect();
        let new_ids: HashSet<&str> = next.ids().into_iter().collect();

        TreeDiff {
            added: next
                .ids()
                .into_iter()
                .filter(|id| !old_ids.contains(id))
                .map(str::to_string)
                .collect(),
            removed: self
                .ids()
                .into_iter()
                .filter(|id| !new_ids.contains(id))
                .map(str::to_string)
                .collect(),
            retained: next
                .ids()
                .into_iter()
                .filter(|id| old_ids.contains(id))
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Id-level difference between two trees of one repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeDiff {
    /// Ids only in the newer tree, in its display order.
    pub added: Vec<String>,
    /// Ids only in the older tree.
    pub removed: Vec<String>,
    pub retained: Vec<String>,
}

impl TreeDiff {
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::StashRecord;
    use crate::node::FileNodeType;

    fn stash(index: usize, short_hash: &str, files: &[(&str, &str)]) -> StashNode {
        let node = StashNode::new(
            "/r",
            StashRecord {
                index,
                short_hash: short_hash.into(),
                hash: format!("{short_hash}ffff"),
                timestamp: 0,
                message: format!("On main: {index}"),
            },
        );
        let files = files
            .iter()
            .map(|(sub, name)| FileNode::new(FileNodeType::Modified, &node, *sub, *name))
            .collect();
        node.with_files(files)
    }

    #[test]
    fn empty_repository_gets_a_message_child() {
        let tree = RepositoryTree::build(RepositoryNode::new("/r"), vec![]);
        assert_eq!(tree.children().len(), 1);
        assert_eq!(tree.children()[0].id(), "M.No stashes");
        assert_eq!(tree.parent_id("M.No stashes"), Some("r./r"));
        assert_eq!(tree.stashes().count(), 0);
    }

    #[test]
    fn parents_are_tracked_in_the_side_index() {
        let tree = RepositoryTree::build(
            RepositoryNode::new("/r"),
            vec![stash(0, "aaa", &[("src", "a.rs")]), stash(1, "bbb", &[])],
        );
        let file_id = tree.stashes().next().unwrap().files()[0].id().to_string();

        assert_eq!(tree.parent_id(&file_id), Some("s./r.0.aaa"));
        match tree.parent(&file_id) {
            Some(NodeRef::Stash(parent)) => assert_eq!(parent.short_hash(), "aaa"),
            other => panic!("expected stash parent, got {other:?}"),
        }
        assert_eq!(tree.parent_id("s./r.1.bbb"), Some("r./r"));
        assert_eq!(tree.parent_id("r./r"), None);
    }

    #[test]
    fn walk_lists_root_stashes_then_files() {
        let tree = RepositoryTree::build(
            RepositoryNode::new("/r").with_branch(Some("main".into())),
            vec![stash(0, "aaa", &[("src", "a.rs"), (".", "b.rs")])],
        );
        let labels: Vec<(usize, String)> =
            tree.walk().into_iter().map(|(depth, n)| (depth, n.label())).collect();
        assert_eq!(labels[0], (0, "r (main)".to_string()));
        assert_eq!(labels[1], (1, "#0: On main: 0 [aaa]".to_string()));
        assert_eq!(labels[3], (2, "M b.rs".to_string()));
        assert_eq!(labels.len(), 4);
    }

    #[test]
    fn rebuilding_unchanged_state_is_an_empty_diff() {
        let build = || {
            RepositoryTree::build(
                RepositoryNode::new("/r"),
                vec![stash(0, "aaa", &[("src", "a.rs")])],
            )
        };
        let diff = build().diff(&build());
        assert!(diff.is_unchanged());
        assert_eq!(diff.retained.len(), 3);
    }

    #[test]
    fn new_stash_shows_up_as_added() {
        let before = RepositoryTree::build(
            RepositoryNode::new("/r"),
            vec![stash(0, "aaa", &[("src", "a.rs")])],
        );
        // `git stash push` shifts the old entry to index 1.
        let after = RepositoryTree::build(
            RepositoryNode::new("/r"),
            vec![stash(0, "ccc", &[(".", "n.rs")]), stash(1, "aaa", &[("src", "a.rs")])],
        );
        let diff = before.diff(&after);
        assert!(diff.added.contains(&"s./r.0.ccc".to_string()));
        assert!(diff.added.contains(&"s./r.1.aaa".to_string()));
        assert_eq!(diff.removed, vec!["s./r.0.aaa".to_string()]);
        // The file of the shifted stash keeps its id.
        assert!(diff.retained.iter().any(|id| id.starts_with("fM./r.aaa.")));
    }
}
