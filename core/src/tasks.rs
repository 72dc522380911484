//! The fixed check-task sequence.
//!
//! Runs the project's external checks in order: pytest (optional), sphinx
//! doctest, sphinx html, setup.py version query, sdist, bdist, and an
//! optional flake8 pass. Straight-line execution; the first failing step
//! aborts the whole sequence and its error propagates unchanged.

use crate::command::CommandLine;
use crate::docs::sphinx_cmd;
use crate::env::Env;
use crate::exec::ExecError;
use crate::runner::CommandRunner;
use crate::toolchain::Toolchain;

/// Which optional steps to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskOptions {
    /// Run the test suite as the first step.
    pub tests: bool,
    /// Run flake8 as the last step. Also requires `COVERAGE=true` in the
    /// base environment snapshot.
    pub lint: bool,
}

impl Default for TaskOptions {
    fn default() -> Self {
        TaskOptions {
            tests: true,
            lint: true,
        }
    }
}

/// Run the full task sequence through `runner`, aborting on the first
/// failure.
///
/// `base_env` is the caller's environment snapshot: the pytest step runs
/// with it merged with `PYTHONPATH=src`, the lint gate reads `COVERAGE`
/// from it, and every other step inherits the process environment.
pub fn run_common_tasks(
    runner: &dyn CommandRunner,
    toolchain: &Toolchain,
    base_env: &Env,
    opts: TaskOptions,
) -> Result<(), ExecError> {
    let python = toolchain.python.display();

    if opts.tests {
        let env = base_env.merged([("PYTHONPATH", "src")]);
        runner.run(
            &CommandLine::shell(format!("{} -m pytest", python)),
            Some(&env),
        )?;
    }

    runner.run(&CommandLine::shell(sphinx_cmd(&toolchain.python, "doctest")), None)?;
    runner.run(&CommandLine::shell(sphinx_cmd(&toolchain.python, "html")), None)?;

    runner.run(
        &CommandLine::shell(format!("{} setup.py --version", python)),
        None,
    )?;
    runner.run(&CommandLine::shell(format!("{} setup.py sdist", python)), None)?;
    runner.run(&CommandLine::shell(format!("{} setup.py bdist", python)), None)?;

    if opts.lint && base_env.get("COVERAGE") == Some("true") {
        runner.run(
            &CommandLine::shell(format!("{} -m flake8 --count", python)),
            None,
        )?;
    }

    Ok(())
}
