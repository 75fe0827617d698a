// src/node/message.rs

use super::make_id;

pub const NO_STASHES: &str = "No stashes";

/// Informational leaf, e.g. "No stashes" or an error text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageNode {
    id: String,
    message: String,
}

impl MessageNode {
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            id: make_id(&["M", &message]),
            message,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_is_the_prefixed_message() {
        assert_eq!(MessageNode::new(NO_STASHES).id(), "M.No stashes");
        assert_eq!(MessageNode::new("x").id(), MessageNode::new("x").id());
    }
}
