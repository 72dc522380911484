//! relcheck core — normalized subprocess invocation for project checks.
//!
//! Shells out to a project's external check tools (test runner, sphinx,
//! setup.py packaging, flake8) one at a time, synchronously, with combined
//! stdout/stderr capture and structured error reporting. The task sequence
//! aborts on the first failure; nothing is retried or swallowed.

pub mod command;
pub mod docs;
pub mod env;
pub mod exec;
pub mod runner;
pub mod settings;
pub mod tasks;
pub mod toolchain;

pub use command::{CommandError, CommandLine};
pub use env::Env;
pub use exec::{run, ExecError};
pub use runner::{CommandRunner, MockRunner, ProcessRunner};
pub use settings::Settings;
pub use tasks::{run_common_tasks, TaskOptions};
pub use toolchain::Toolchain;
