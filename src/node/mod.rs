// src/node/mod.rs

//! Identity-stable tree entities.
//!
//! Every node carries an id derived only from its content (never a random
//! token), so two refreshes over unchanged git state produce identical ids
//! and a consumer can diff trees by id equality.
//!
//! Id layout, segments joined with `.`:
//! - repository: `r.<repo path>`
//! - stash: `s.<repo path>.<index>.<short hash>`
//! - file: `f<type tag>.<repo path>.<stash short hash>.<relative path>`
//! - message: `M.<message>`
//!
//! Nodes never point at their parent; the parent relation is kept by
//! [`RepositoryTree`] as a side index.

pub mod file;
pub mod message;
pub mod repository;
pub mod stash;
pub mod tree;

pub use file::{normalize_relative, split_path, FileNode, FileNodeType};
pub use message::{MessageNode, NO_STASHES};
pub use repository::RepositoryNode;
pub use stash::StashNode;
pub use tree::{NodeRef, RepositoryTree, TreeDiff};

const ID_SEP: &str = ".";

fn make_id(parts: &[&str]) -> String {
    parts.join(ID_SEP)
}

/// Owned tree entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Repository(RepositoryNode),
    Stash(StashNode),
    File(FileNode),
    Message(MessageNode),
}

impl Node {
    pub fn id(&self) -> &str {
        self.as_node_ref().id()
    }

    pub fn label(&self) -> String {
        self.as_node_ref().label()
    }

    pub fn as_node_ref(&self) -> NodeRef<'_> {
        match self {
            Node::Repository(n) => NodeRef::Repository(n),
            Node::Stash(n) => NodeRef::Stash(n),
            Node::File(n) => NodeRef::File(n),
            Node::Message(n) => NodeRef::Message(n),
        }
    }
}

impl From<StashNode> for Node {
    fn from(node: StashNode) -> Self {
        Node::Stash(node)
    }
}

impl From<FileNode> for Node {
    fn from(node: FileNode) -> Self {
        Node::File(node)
    }
}

impl From<MessageNode> for Node {
    fn from(node: MessageNode) -> Self {
        Node::Message(node)
    }
}

impl From<RepositoryNode> for Node {
    fn from(node: RepositoryNode) -> Self {
        Node::Repository(node)
    }
}
