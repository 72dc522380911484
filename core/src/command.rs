//! Command representation and normalization.
//!
//! A command arrives either as one shell-syntax string or as an already
//! tokenized argument vector. `CommandLine::tokens` resolves both to a
//! canonical token sequence at the execution boundary, rejecting commands
//! that cannot be spawned safely before any process is created.

use std::fmt;

/// Bare tool names that must not be used as a program. Callers are forced
/// to pin the executable actually in use (e.g. the interpreter inside the
/// active virtualenv) instead of whichever one happens to be on PATH.
pub const BARE_TOOL_NAMES: &[&str] = &["python", "putup", "pip", "tox", "pytest", "pre-commit"];

// ---------------------------------------------------------------------------
// CommandLine
// ---------------------------------------------------------------------------

/// A command to execute: a shell-syntax string or a token vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandLine {
    /// One string, tokenized with POSIX shell quoting rules.
    Shell(String),
    /// Program plus arguments, passed through as-is.
    Argv(Vec<String>),
}

impl CommandLine {
    /// Convenience constructor for shell-syntax strings.
    pub fn shell(cmd: impl Into<String>) -> Self {
        CommandLine::Shell(cmd.into())
    }

    /// Convenience constructor for token vectors.
    pub fn argv<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandLine::Argv(tokens.into_iter().map(|s| s.into()).collect())
    }

    /// Resolve to the canonical token sequence and validate it.
    ///
    /// Fails (without spawning anything) when the shell string cannot be
    /// tokenized, when no tokens remain, or when the first token is one of
    /// the disallowed bare tool names.
    pub fn tokens(&self) -> Result<Vec<String>, CommandError> {
        let tokens = match self {
            CommandLine::Shell(s) => {
                shlex::split(s).ok_or_else(|| CommandError::UnparsableShell(s.clone()))?
            }
            CommandLine::Argv(v) => v.clone(),
        };
        let program = tokens.first().ok_or(CommandError::Empty)?;
        if BARE_TOOL_NAMES.contains(&program.as_str()) {
            return Err(CommandError::BareToolName(program.clone()));
        }
        Ok(tokens)
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandLine::Shell(s) => write!(f, "{}", s),
            CommandLine::Argv(v) => write!(f, "{}", v.join(" ")),
        }
    }
}

// ---------------------------------------------------------------------------
// CommandError
// ---------------------------------------------------------------------------

/// Configuration errors caught before a process is spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The command had no tokens at all.
    Empty,
    /// The shell string could not be tokenized (e.g. unterminated quote).
    UnparsableShell(String),
    /// The program was a disallowed bare tool name.
    BareToolName(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Empty => write!(f, "empty command"),
            CommandError::UnparsableShell(s) => {
                write!(f, "cannot tokenize shell command: {}", s)
            }
            CommandError::BareToolName(name) => write!(
                f,
                "'{}' is ambiguous; please specify an executable with explicit path",
                name
            ),
        }
    }
}

impl std::error::Error for CommandError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_string_splits_on_whitespace() {
        let cmd = CommandLine::shell("/bin/echo hello world");
        assert_eq!(cmd.tokens().unwrap(), vec!["/bin/echo", "hello", "world"]);
    }

    #[test]
    fn quoted_whitespace_stays_one_token() {
        let cmd = CommandLine::shell("/bin/echo 'hello world' \"a b\"");
        assert_eq!(
            cmd.tokens().unwrap(),
            vec!["/bin/echo", "hello world", "a b"]
        );
    }

    #[test]
    fn argv_passes_through_unchanged() {
        let cmd = CommandLine::argv(["/bin/echo", "a b", "c"]);
        assert_eq!(cmd.tokens().unwrap(), vec!["/bin/echo", "a b", "c"]);
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        let cmd = CommandLine::shell("/bin/echo 'unterminated");
        assert!(matches!(cmd.tokens(), Err(CommandError::UnparsableShell(_))));
    }

    #[test]
    fn empty_command_is_an_error() {
        assert_eq!(CommandLine::shell("").tokens(), Err(CommandError::Empty));
        assert_eq!(
            CommandLine::argv(Vec::<String>::new()).tokens(),
            Err(CommandError::Empty)
        );
    }

    #[test]
    fn bare_tool_names_are_rejected() {
        for name in BARE_TOOL_NAMES {
            let cmd = CommandLine::shell(format!("{} --version", name));
            assert_eq!(
                cmd.tokens(),
                Err(CommandError::BareToolName(name.to_string())),
                "expected '{}' to be rejected",
                name
            );
        }
    }

    #[test]
    fn explicit_paths_to_the_same_tools_pass() {
        let cmd = CommandLine::shell("/usr/bin/python -m pytest");
        assert!(cmd.tokens().is_ok());
        let cmd = CommandLine::argv(["./python", "--version"]);
        assert!(cmd.tokens().is_ok());
    }

    #[test]
    fn bare_name_only_checked_in_program_position() {
        // "pytest" as an argument is fine; only the program is validated.
        let cmd = CommandLine::shell("/usr/bin/python -m pytest");
        assert_eq!(
            cmd.tokens().unwrap(),
            vec!["/usr/bin/python", "-m", "pytest"]
        );
    }
}
