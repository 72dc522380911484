//! Command runner abstraction.
//!
//! `CommandRunner` is the trait task orchestration code executes commands
//! through. `ProcessRunner` is the production implementation: it delegates
//! to `exec::run` and, when the child exits non-zero, prints a delimited
//! diagnostic block (exit code plus the full combined output) before
//! re-signaling the unchanged failure. `MockRunner` is the test double that
//! records calls and returns preset responses.

use std::cell::RefCell;

use crate::command::CommandLine;
use crate::env::Env;
use crate::exec::{self, ExecError};

/// Trait for executing a command against an optional explicit environment.
pub trait CommandRunner {
    fn run(&self, cmd: &CommandLine, env: Option<&Env>) -> Result<String, ExecError>;
}

// ---------------------------------------------------------------------------
// ProcessRunner
// ---------------------------------------------------------------------------

/// Production runner: spawns real processes and reports failures on stdout.
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, cmd: &CommandLine, env: Option<&Env>) -> Result<String, ExecError> {
        let result = exec::run(cmd, env);
        if let Err(ExecError::Failed { code, output }) = &result {
            println!("{}", diagnostic_block(*code, output));
        }
        result
    }
}

/// Render the failure diagnostic: a delimited header carrying the exit code
/// followed by the full combined output. Signal deaths have no code and
/// render as `signal`.
fn diagnostic_block(code: Option<i32>, output: &str) -> String {
    let code = match code {
        Some(c) => c.to_string(),
        None => "signal".to_string(),
    };
    format!(
        "******************** Terminal ($? = {}) ********************\n{}",
        code, output
    )
}

// ---------------------------------------------------------------------------
// MockRunner
// ---------------------------------------------------------------------------

/// Test-double runner that records invocations and serves pre-configured
/// responses in order. Once the responses are exhausted it keeps answering
/// with empty success.
pub struct MockRunner {
    responses: RefCell<Vec<Result<String, ExecError>>>,
    calls: RefCell<Vec<(CommandLine, Option<Env>)>>,
}

impl MockRunner {
    pub fn new() -> Self {
        MockRunner {
            responses: RefCell::new(Vec::new()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_responses(responses: Vec<Result<String, ExecError>>) -> Self {
        let mut reversed = responses;
        reversed.reverse();
        MockRunner {
            responses: RefCell::new(reversed),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Every command executed so far, in order, rendered as display strings.
    pub fn executed_commands(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|(cmd, _)| cmd.to_string())
            .collect()
    }

    /// The environment recorded with the nth call: outer `None` when no
    /// such call happened, `Some(None)` when the call passed no explicit
    /// environment.
    pub fn env_of_call(&self, n: usize) -> Option<Option<Env>> {
        self.calls.borrow().get(n).map(|(_, env)| env.clone())
    }

    /// Number of calls recorded.
    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, cmd: &CommandLine, env: Option<&Env>) -> Result<String, ExecError> {
        self.calls.borrow_mut().push((cmd.clone(), env.cloned()));
        let mut responses = self.responses.borrow_mut();
        if let Some(response) = responses.pop() {
            response
        } else {
            Ok(String::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_runner_records_commands_in_order() {
        let runner = MockRunner::with_responses(vec![Ok("ok".into()), Ok("ok2".into())]);
        assert!(runner.run(&CommandLine::shell("/bin/echo one"), None).is_ok());
        assert!(runner.run(&CommandLine::shell("/bin/echo two"), None).is_ok());
        assert_eq!(
            runner.executed_commands(),
            vec!["/bin/echo one", "/bin/echo two"]
        );
    }

    #[test]
    fn mock_runner_returns_responses_in_order() {
        let runner = MockRunner::with_responses(vec![
            Ok("first".into()),
            Err(ExecError::Failed {
                code: Some(1),
                output: "fail".into(),
            }),
        ]);
        assert_eq!(
            runner.run(&CommandLine::shell("/bin/true"), None).unwrap(),
            "first"
        );
        assert!(runner.run(&CommandLine::shell("/bin/true"), None).is_err());
    }

    #[test]
    fn mock_runner_defaults_to_empty_ok() {
        let runner = MockRunner::new();
        assert_eq!(runner.run(&CommandLine::shell("/bin/true"), None).unwrap(), "");
    }

    #[test]
    fn mock_runner_records_environment() {
        let runner = MockRunner::new();
        let env = Env::empty().set("K", "v");
        let _ = runner.run(&CommandLine::shell("/bin/true"), Some(&env));
        let _ = runner.run(&CommandLine::shell("/bin/true"), None);
        assert_eq!(runner.env_of_call(0).unwrap().unwrap().get("K"), Some("v"));
        // Second call happened but carried no explicit env; a third call
        // never happened at all.
        assert_eq!(runner.env_of_call(1), Some(None));
        assert_eq!(runner.env_of_call(2), None);
    }

    #[test]
    fn diagnostic_block_contains_exact_code_and_output() {
        assert_eq!(
            diagnostic_block(Some(3), "boom\n"),
            "******************** Terminal ($? = 3) ********************\nboom\n"
        );
    }

    #[test]
    fn diagnostic_block_renders_signal_deaths() {
        assert_eq!(
            diagnostic_block(None, "killed\n"),
            "******************** Terminal ($? = signal) ********************\nkilled\n"
        );
    }

    #[test]
    fn process_runner_returns_combined_output() {
        let runner = ProcessRunner;
        let out = runner
            .run(&CommandLine::argv(["/bin/sh", "-c", "echo a; echo b >&2"]), None)
            .unwrap();
        assert!(out.contains("a\n"));
        assert!(out.contains("b\n"));
    }

    #[test]
    fn process_runner_re_signals_failures() {
        let runner = ProcessRunner;
        let err = runner
            .run(&CommandLine::argv(["/bin/sh", "-c", "exit 7"]), None)
            .unwrap_err();
        match err {
            ExecError::Failed { code, .. } => assert_eq!(code, Some(7)),
            other => panic!("expected Failed, got {:?}", other),
        }
    }
}
