// src/exec/backend.rs

//! Pluggable command runner abstraction.
//!
//! The git layer talks to a `CommandRunner` instead of spawning processes
//! itself. Production code uses [`ProcessExecutor`](super::ProcessExecutor);
//! tests can provide their own runner that returns canned outputs and
//! records which argument lists were requested.

use std::collections::BTreeMap;
use std::future::{Future, IntoFuture};
use std::path::PathBuf;
use std::pin::Pin;
use std::time::Duration;

use tokio::task::JoinHandle;

use super::result::{ExecOutcome, ExecutionFailure, ExecutionResult};

/// Everything needed to start one external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecRequest {
    pub command: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    /// Merged over the ambient environment of this process.
    pub env: BTreeMap<String, String>,
    /// Encoding label understood by `encoding_rs` (e.g. `"latin1"`).
    /// `None` means UTF-8.
    pub encoding: Option<String>,
    /// Kill the child and fail with `TimedOut` when exceeded.
    pub timeout: Option<Duration>,
}

impl ExecRequest {
    pub fn new<I, S>(command: impl Into<String>, args: I, cwd: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: command.into(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: cwd.into(),
            env: BTreeMap::new(),
            encoding: None,
            timeout: None,
        }
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn encoding(mut self, label: Option<String>) -> Self {
        self.encoding = label;
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// `command arg1 arg2 ...`, used in logs and failure messages.
    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.command.clone()
        } else {
            format!("{} {}", self.command, self.args.join(" "))
        }
    }
}

/// Trait abstracting how a command invocation is carried out.
pub trait CommandRunner: Send + Sync {
    /// Start the command described by `request`.
    ///
    /// The invocation is already in flight when this returns; awaiting the
    /// [`Execution`] only observes its outcome.
    fn run(&self, request: ExecRequest) -> Execution;
}

/// An in-flight (or finished) invocation plus the arguments it was started with.
#[derive(Debug)]
pub struct Execution {
    command: String,
    args: Vec<String>,
    handle: JoinHandle<ExecOutcome>,
}

impl Execution {
    /// Drive `fut` on the Tokio runtime and wrap it as an execution.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<F>(command: impl Into<String>, args: Vec<String>, fut: F) -> Self
    where
        F: Future<Output = ExecOutcome> + Send + 'static,
    {
        Self {
            command: command.into(),
            args,
            handle: tokio::spawn(fut),
        }
    }

    /// An execution that is already complete.
    pub fn ready(command: impl Into<String>, args: Vec<String>, outcome: ExecOutcome) -> Self {
        Self::spawn(command, args, async move { outcome })
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Apply `post` to the successful result once the process has exited.
    /// Failures pass through untouched.
    pub fn map_result<P>(self, post: P) -> Self
    where
        P: FnOnce(&mut ExecutionResult) + Send + 'static,
    {
        let Execution {
            command,
            args,
            handle,
        } = self;
        let join_command = command.clone();

        Self::spawn(command, args, async move {
            let mut result = join(join_command, handle).await?;
            post(&mut result);
            Ok(result)
        })
    }

    /// Wait for the invocation to finish.
    pub async fn result(self) -> ExecOutcome {
        join(self.command, self.handle).await
    }
}

impl IntoFuture for Execution {
    type Output = ExecOutcome;
    type IntoFuture = Pin<Box<dyn Future<Output = ExecOutcome> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.result())
    }
}

async fn join(command: String, handle: JoinHandle<ExecOutcome>) -> ExecOutcome {
    match handle.await {
        Ok(outcome) => outcome,
        Err(err) => Err(ExecutionFailure::Spawn {
            command,
            message: format!("execution task failed: {err}"),
        }),
    }
}
