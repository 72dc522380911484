//! Pinned interpreter resolution.
//!
//! All task commands run through one explicitly pinned Python interpreter
//! instead of whatever `python` happens to be first on PATH. Resolution
//! reads only the environment snapshot handed in, never ambient state.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::env::Env;

/// The external toolchain the task sequence drives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    /// Explicit path to the interpreter used for pytest, sphinx, setup.py
    /// and flake8 invocations.
    pub python: PathBuf,
}

impl Toolchain {
    pub fn new(python: impl Into<PathBuf>) -> Self {
        Toolchain {
            python: python.into(),
        }
    }

    /// Resolve the interpreter from an environment snapshot: the `PYTHON`
    /// variable if set, else the active virtualenv's interpreter.
    pub fn resolve(env: &Env) -> Result<Self, ToolchainError> {
        if let Some(python) = env.get("PYTHON") {
            return Ok(Toolchain::new(python));
        }
        if let Some(venv) = env.get("VIRTUAL_ENV") {
            return Ok(Toolchain::new(Path::new(venv).join("bin").join("python")));
        }
        Err(ToolchainError::NoInterpreter)
    }
}

/// Toolchain resolution failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolchainError {
    /// Neither `PYTHON` nor `VIRTUAL_ENV` was set.
    NoInterpreter,
}

impl fmt::Display for ToolchainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolchainError::NoInterpreter => write!(
                f,
                "no interpreter pinned; set PYTHON to an explicit interpreter path \
                 or activate a virtualenv"
            ),
        }
    }
}

impl std::error::Error for ToolchainError {}
