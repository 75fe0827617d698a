// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for running external commands with
//! `tokio::process::Command` and handing their output back to the caller.
//!
//! - [`backend`] provides the `CommandRunner` trait, the `ExecRequest`
//!   description of an invocation, and the `Execution` handle.
//! - [`process`] contains `ProcessExecutor`, the production runner.
//! - [`result`] holds `ExecutionResult` and the typed `ExecutionFailure`.

pub mod backend;
pub mod process;
pub mod result;

pub use backend::{CommandRunner, ExecRequest, Execution};
pub use process::ProcessExecutor;
pub use result::{ExecOutcome, ExecutionFailure, ExecutionResult};
