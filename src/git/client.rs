// src/git/client.rs

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::config::GitSettings;
use crate::exec::{CommandRunner, ExecRequest, Execution, ExecutionResult};

/// Default name of the git executable.
pub const GIT_BINARY: &str = "git";

/// Builds git invocations and hands them to a [`CommandRunner`].
///
/// Operation-specific methods live in [`super::branch`] and [`super::stash`].
#[derive(Clone)]
pub struct GitClient {
    runner: Arc<dyn CommandRunner>,
    binary: String,
    timeout: Option<Duration>,
    encoding: Option<String>,
}

impl fmt::Debug for GitClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitClient")
            .field("binary", &self.binary)
            .field("timeout", &self.timeout)
            .field("encoding", &self.encoding)
            .finish_non_exhaustive()
    }
}

impl GitClient {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            binary: GIT_BINARY.to_string(),
            timeout: None,
            encoding: None,
        }
    }

    /// Client configured from the `[git]` config section.
    pub fn from_settings(runner: Arc<dyn CommandRunner>, settings: &GitSettings) -> Self {
        Self {
            runner,
            binary: settings.binary.clone(),
            timeout: settings.timeout,
            encoding: settings.encoding.clone(),
        }
    }

    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Run git with `args` in `cwd`.
    pub fn exec(&self, args: Vec<String>, cwd: &Path) -> Execution {
        let request = ExecRequest::new(self.binary.clone(), args, cwd)
            .encoding(self.encoding.clone())
            .timeout(self.timeout);
        debug!(command = %request.display(), cwd = ?cwd, "running git");
        self.runner.run(request)
    }

    /// Run git and post-process the successful result before the caller sees it.
    pub fn exec_with<P>(&self, args: Vec<String>, cwd: &Path, post: P) -> Execution
    where
        P: FnOnce(&mut ExecutionResult) + Send + 'static,
    {
        self.exec(args, cwd).map_result(post)
    }
}

/// Turn a literal argument list into owned strings.
pub(crate) fn args<const N: usize>(parts: [&str; N]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}
