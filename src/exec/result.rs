// src/exec/result.rs

//! Outcome types for a single external command invocation.

use thiserror::Error;

/// Output of a process that exited with status 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    /// Wall-clock time from spawn to exit, rounded to the nearest millisecond.
    pub elapsed_ms: u64,
}

impl ExecutionResult {
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>, elapsed_ms: u64) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            elapsed_ms,
        }
    }

    /// Standard output followed by error output.
    pub fn out(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }

    /// Non-empty, trimmed lines of standard output.
    pub fn lines(&self) -> Vec<String> {
        self.stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Why an invocation did not produce an [`ExecutionResult`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionFailure {
    /// The process could not be started, or its pipes could not be read.
    #[error("failed to run `{command}`: {message}")]
    Spawn { command: String, message: String },

    #[error("`{command}` exited with status {code}: {message}")]
    NonZeroExit {
        command: String,
        code: i32,
        /// Captured standard error.
        message: String,
        /// Captured standard output.
        partial_output: String,
    },

    /// The process was terminated by a signal and has no exit code.
    #[error("`{command}` was terminated by a signal: {message}")]
    Signalled {
        command: String,
        message: String,
        partial_output: String,
    },

    #[error("`{command}` timed out after {after_ms}ms")]
    TimedOut {
        command: String,
        after_ms: u64,
        partial_output: String,
    },
}

impl ExecutionFailure {
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ExecutionFailure::NonZeroExit { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ExecutionFailure::Spawn { message, .. }
            | ExecutionFailure::NonZeroExit { message, .. }
            | ExecutionFailure::Signalled { message, .. } => message,
            ExecutionFailure::TimedOut { .. } => "timed out",
        }
    }

    pub fn partial_output(&self) -> Option<&str> {
        match self {
            ExecutionFailure::Spawn { .. } => None,
            ExecutionFailure::NonZeroExit { partial_output, .. }
            | ExecutionFailure::Signalled { partial_output, .. }
            | ExecutionFailure::TimedOut { partial_output, .. } => Some(partial_output),
        }
    }

    pub fn command(&self) -> &str {
        match self {
            ExecutionFailure::Spawn { command, .. }
            | ExecutionFailure::NonZeroExit { command, .. }
            | ExecutionFailure::Signalled { command, .. }
            | ExecutionFailure::TimedOut { command, .. } => command,
        }
    }
}

pub type ExecOutcome = std::result::Result<ExecutionResult, ExecutionFailure>;
