//! relcheck CLI — run the project's check-task sequence.
//!
//! # Usage
//!
//! ```text
//! relcheck [--no-tests] [--no-lint] [--python PATH]
//! ```
//!
//! Runs pytest, the sphinx doctest and html builds, the setup.py version
//! query, sdist and bdist, and (when enabled and `COVERAGE=true`) flake8,
//! stopping at the first failure.

use std::path::{Path, PathBuf};
use std::process;

use relcheck_core::env::Env;
use relcheck_core::runner::ProcessRunner;
use relcheck_core::settings::{self, Settings, SETTINGS_FILE};
use relcheck_core::tasks::{run_common_tasks, TaskOptions};
use relcheck_core::toolchain::Toolchain;

const USAGE: &str = "Usage: relcheck [--no-tests] [--no-lint] [--python PATH]";

/// Parsed command-line arguments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct CliArgs {
    no_tests: bool,
    no_lint: bool,
    python: Option<PathBuf>,
    help: bool,
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let arg_refs: Vec<&str> = args[1..].iter().map(|s| s.as_str()).collect();

    let cli = match parse_args(&arg_refs) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("relcheck: {}", e);
            eprintln!("{}", USAGE);
            process::exit(1);
        }
    };
    if cli.help {
        println!("{}", USAGE);
        return;
    }

    let settings = match settings::load(Path::new(SETTINGS_FILE)) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("relcheck: {}", e);
            process::exit(1);
        }
    };

    let env = Env::snapshot();
    let toolchain = match resolve_toolchain(&cli, &settings, &env) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("relcheck: {}", e);
            process::exit(1);
        }
    };

    let opts = TaskOptions {
        tests: settings.tests && !cli.no_tests,
        lint: settings.lint && !cli.no_lint,
    };
    if let Err(e) = run_common_tasks(&ProcessRunner, &toolchain, &env, opts) {
        eprintln!("relcheck: {}", e);
        process::exit(1);
    }
}

/// Parse CLI arguments (without the program name) into `CliArgs`.
fn parse_args(args: &[&str]) -> Result<CliArgs, String> {
    let mut cli = CliArgs::default();
    let mut it = args.iter();
    while let Some(arg) = it.next() {
        match *arg {
            "--no-tests" => cli.no_tests = true,
            "--no-lint" => cli.no_lint = true,
            "--python" => {
                let path = it
                    .next()
                    .ok_or_else(|| "--python requires a path argument".to_string())?;
                cli.python = Some(PathBuf::from(path));
            }
            "--help" | "-h" | "help" => cli.help = true,
            other => return Err(format!("unknown argument: '{}'", other)),
        }
    }
    Ok(cli)
}

/// Interpreter precedence: CLI flag, then settings file, then env
/// resolution (`PYTHON`, then the active virtualenv).
fn resolve_toolchain(cli: &CliArgs, settings: &Settings, env: &Env) -> Result<Toolchain, String> {
    if let Some(python) = &cli.python {
        return Ok(Toolchain::new(python.clone()));
    }
    if let Some(python) = &settings.python {
        return Ok(Toolchain::new(python.clone()));
    }
    Toolchain::resolve(env).map_err(|e| e.to_string())
}
