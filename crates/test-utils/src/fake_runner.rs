use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use stashwatch::exec::{
    CommandRunner, ExecOutcome, ExecRequest, Execution, ExecutionFailure, ExecutionResult,
};

/// A fake command runner that:
/// - answers invocations from canned outcomes keyed by their argument list
///   (joined with single spaces, command name excluded)
/// - records every request it receives
/// - fails unknown invocations with exit code 128, like git does for bad
///   revisions.
#[derive(Clone, Default)]
pub struct FakeRunner {
    responses: Arc<Mutex<HashMap<String, ExecOutcome>>>,
    requests: Arc<Mutex<Vec<ExecRequest>>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `args` with a successful result carrying `stdout`.
    pub fn respond(&self, args: &str, stdout: &str) -> &Self {
        self.set(args, Ok(ExecutionResult::new(stdout, "", 1)))
    }

    /// Answer `args` with a non-zero exit.
    pub fn fail(&self, args: &str, code: i32, stderr: &str) -> &Self {
        self.set(
            args,
            Err(ExecutionFailure::NonZeroExit {
                command: format!("git {args}"),
                code,
                message: stderr.to_string(),
                partial_output: String::new(),
            }),
        )
    }

    pub fn set(&self, args: &str, outcome: ExecOutcome) -> &Self {
        self.responses.lock().unwrap().insert(args.to_string(), outcome);
        self
    }

    /// Every request received so far, in call order.
    pub fn requests(&self) -> Vec<ExecRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Argument lists of every request, joined like the response keys.
    pub fn calls(&self) -> Vec<String> {
        self.requests().iter().map(|r| r.args.join(" ")).collect()
    }

    pub fn call_count(&self, args: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == args).count()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, request: ExecRequest) -> Execution {
        let key = request.args.join(" ");
        let outcome = self.responses.lock().unwrap().get(&key).cloned().unwrap_or_else(|| {
            Err(ExecutionFailure::NonZeroExit {
                command: request.display(),
                code: 128,
                message: format!("fatal: no canned response for `{key}`"),
                partial_output: String::new(),
            })
        });

        let command = request.command.clone();
        let args = request.args.clone();
        self.requests.lock().unwrap().push(request);
        Execution::ready(command, args, outcome)
    }
}
