// src/git/branch.rs

//! Branch related git operations.

use std::path::Path;

use super::client::{args, GitClient};
use crate::exec::{Execution, ExecutionResult};

const HEADS_PREFIX: &str = "refs/heads/";

impl GitClient {
    /// Lists local branches; the result's stdout holds one branch name per line.
    pub fn branches(&self, cwd: &Path) -> Execution {
        let params = args(["for-each-ref", "--format=%(refname)", HEADS_PREFIX]);
        self.exec_with(params, cwd, |result| {
            result.stdout = strip_branch_refs(&result.stdout);
        })
    }

    /// Name of the checked out branch (`HEAD` when detached).
    pub fn current_branch(&self, cwd: &Path) -> Execution {
        let params = args(["rev-parse", "--abbrev-ref", "HEAD"]);
        self.exec_with(params, cwd, |result| {
            result.stdout = result.stdout.trim().to_string();
        })
    }

    pub fn checkout(&self, cwd: &Path, branch: &str) -> Execution {
        self.exec(args(["checkout", branch]), cwd)
    }
}

/// Remove the `refs/heads/` prefix from every line and trim the output.
pub fn strip_branch_refs(raw: &str) -> String {
    raw.lines()
        .map(|line| line.trim().replace(HEADS_PREFIX, ""))
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Branch names from a post-processed [`GitClient::branches`] result.
pub fn branch_names(result: &ExecutionResult) -> Vec<String> {
    result.lines()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_heads_prefix_and_whitespace() {
        let raw = "refs/heads/main\nrefs/heads/dev\n";
        assert_eq!(strip_branch_refs(raw), "main\ndev");

        let result = ExecutionResult::new(strip_branch_refs(raw), "", 4);
        assert_eq!(branch_names(&result), vec!["main", "dev"]);
    }

    #[test]
    fn keeps_nested_branch_names() {
        let raw = "  refs/heads/feature/login  \r\nrefs/heads/fix/refs\n\n";
        assert_eq!(strip_branch_refs(raw), "feature/login\nfix/refs");
    }

    #[test]
    fn empty_output_stays_empty() {
        assert_eq!(strip_branch_refs(""), "");
        assert!(branch_names(&ExecutionResult::new("", "", 0)).is_empty());
    }
}
