// src/exec/process.rs

//! Real process execution via `tokio::process::Command`.

use std::fmt;
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};

use encoding_rs::{Encoding, UTF_8};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::logging::DebugLog;

use super::backend::{CommandRunner, ExecRequest, Execution};
use super::result::{ExecOutcome, ExecutionFailure, ExecutionResult};

/// Spawns one child process per request and collects its output.
///
/// Holds no state between invocations apart from the optional debug log.
#[derive(Clone, Default)]
pub struct ProcessExecutor {
    debug_log: Option<Arc<dyn DebugLog>>,
}

impl fmt::Debug for ProcessExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessExecutor")
            .field("debug_log", &self.debug_log.is_some())
            .finish()
    }
}

impl ProcessExecutor {
    pub fn new() -> Self {
        Self { debug_log: None }
    }

    /// Executor that writes a line per finished invocation to `log`.
    pub fn with_debug_log(log: Arc<dyn DebugLog>) -> Self {
        Self {
            debug_log: Some(log),
        }
    }
}

impl CommandRunner for ProcessExecutor {
    fn run(&self, request: ExecRequest) -> Execution {
        let command = request.command.clone();
        let args = request.args.clone();
        let debug_log = self.debug_log.clone();
        Execution::spawn(command, args, run_process(request, debug_log))
    }
}

/// How long a killed process's pipes may take to reach EOF.
const READ_GRACE: Duration = Duration::from_millis(250);

/// Run `request` to completion.
pub async fn run_process(request: ExecRequest, debug_log: Option<Arc<dyn DebugLog>>) -> ExecOutcome {
    let shown = request.display();
    let encoding = resolve_encoding(request.encoding.as_deref());

    let mut cmd = Command::new(&request.command);
    cmd.args(&request.args)
        .current_dir(&request.cwd)
        .envs(&request.env)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let started = Instant::now();
    let mut child = cmd.spawn().map_err(|err| ExecutionFailure::Spawn {
        command: shown.clone(),
        message: err.to_string(),
    })?;

    debug!(command = %shown, cwd = ?request.cwd, pid = ?child.id(), "spawned process");

    // Drain both pipes while waiting so a chatty child never blocks on a full buffer.
    let stdout_task = spawn_reader(child.stdout.take());
    let stderr_task = spawn_reader(child.stderr.take());

    let status = match request.timeout {
        Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
            Ok(status) => status,
            Err(_) => {
                warn!(command = %shown, timeout_ms = millis(limit), "command timed out; killing it");
                if let Err(err) = child.kill().await {
                    warn!(command = %shown, error = %err, "failed to kill timed-out process");
                }
                // Grandchildren may still hold the pipe open; don't wait on them.
                let stdout = match tokio::time::timeout(READ_GRACE, collect(stdout_task)).await {
                    Ok(Ok(bytes)) => bytes,
                    _ => Vec::new(),
                };
                return Err(ExecutionFailure::TimedOut {
                    command: shown,
                    after_ms: millis(limit),
                    partial_output: decode(encoding, &stdout),
                });
            }
        },
        None => child.wait().await,
    };

    let elapsed_ms = millis(started.elapsed());

    let status = status.map_err(|err| ExecutionFailure::Spawn {
        command: shown.clone(),
        message: err.to_string(),
    })?;

    let read_failure = |err: std::io::Error| ExecutionFailure::Spawn {
        command: shown.clone(),
        message: format!("reading output: {err}"),
    };
    let stdout = decode(encoding, &collect(stdout_task).await.map_err(read_failure)?);
    let stderr = decode(encoding, &collect(stderr_task).await.map_err(read_failure)?);

    if let Some(log) = &debug_log {
        log.log(&format!("> {shown} [{elapsed_ms}ms]"));
    }

    if status.success() {
        return Ok(ExecutionResult {
            stdout,
            stderr,
            elapsed_ms,
        });
    }

    debug!(command = %shown, status = %status, "process exited unsuccessfully");

    match status.code() {
        Some(code) => Err(ExecutionFailure::NonZeroExit {
            command: shown,
            code,
            message: stderr,
            partial_output: stdout,
        }),
        None => Err(ExecutionFailure::Signalled {
            command: shown,
            message: stderr,
            partial_output: stdout,
        }),
    }
}

fn spawn_reader<R>(pipe: Option<R>) -> JoinHandle<std::io::Result<Vec<u8>>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf).await?;
        }
        Ok(buf)
    })
}

async fn collect(task: JoinHandle<std::io::Result<Vec<u8>>>) -> std::io::Result<Vec<u8>> {
    task.await.map_err(std::io::Error::other)?
}

/// Look up an encoding label, falling back to UTF-8.
fn resolve_encoding(label: Option<&str>) -> &'static Encoding {
    match label {
        None => UTF_8,
        Some(label) => Encoding::for_label(label.trim().as_bytes()).unwrap_or_else(|| {
            warn!(encoding = %label, "unknown encoding label; decoding as utf-8");
            UTF_8
        }),
    }
}

fn decode(encoding: &'static Encoding, bytes: &[u8]) -> String {
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

/// Round a duration to the nearest whole millisecond.
fn millis(duration: Duration) -> u64 {
    (duration.as_secs_f64() * 1000.0).round() as u64
}
