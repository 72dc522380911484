//! Synchronous command execution with combined output capture.
//!
//! `run` spawns one child process, blocks until it exits, and captures its
//! standard output and standard error interleaved through a single shared
//! pipe — the "combined output". Failure is returned as data
//! (`ExecError::Failed` carries the exit code and the full output); printing
//! diagnostics is the caller's decision, see `runner::ProcessRunner`.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::os::unix::io::FromRawFd;
use std::process::{Command, Stdio};

use crate::command::{CommandError, CommandLine};
use crate::env::Env;

// ---------------------------------------------------------------------------
// ExecError
// ---------------------------------------------------------------------------

/// Failure modes of a single command execution.
#[derive(Debug)]
pub enum ExecError {
    /// The command was rejected before anything was spawned.
    Config(CommandError),
    /// The child process could not be started.
    Spawn { program: String, source: io::Error },
    /// Pipe setup or output capture failed.
    Io(io::Error),
    /// The child exited with a non-zero status. `code` is `None` when the
    /// child was killed by a signal.
    Failed { code: Option<i32>, output: String },
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecError::Config(e) => write!(f, "{}", e),
            ExecError::Spawn { program, source } => {
                write!(f, "failed to run '{}': {}", program, source)
            }
            ExecError::Io(e) => write!(f, "I/O error: {}", e),
            ExecError::Failed { code: Some(code), .. } => {
                write!(f, "command exited with status {}", code)
            }
            ExecError::Failed { code: None, .. } => {
                write!(f, "command was killed by a signal")
            }
        }
    }
}

impl std::error::Error for ExecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExecError::Config(e) => Some(e),
            ExecError::Spawn { source, .. } => Some(source),
            ExecError::Io(e) => Some(e),
            ExecError::Failed { .. } => None,
        }
    }
}

impl From<CommandError> for ExecError {
    fn from(e: CommandError) -> Self {
        ExecError::Config(e)
    }
}

impl From<io::Error> for ExecError {
    fn from(e: io::Error) -> Self {
        ExecError::Io(e)
    }
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

/// Execute `cmd` synchronously and return its combined output.
///
/// When `env` is given the child receives exactly that mapping; otherwise it
/// inherits the parent's environment. On a zero exit the exact combined
/// stdout/stderr text is returned with no transformation; on a non-zero exit
/// the same text travels in `ExecError::Failed` together with the exit code.
pub fn run(cmd: &CommandLine, env: Option<&Env>) -> Result<String, ExecError> {
    let tokens = cmd.tokens()?;
    let program = &tokens[0];

    let (mut reader, writer) = merged_capture_pipe()?;
    let writer_err = writer.try_clone()?;

    let mut command = Command::new(program);
    command
        .args(&tokens[1..])
        .stdin(Stdio::null())
        .stdout(Stdio::from(writer))
        .stderr(Stdio::from(writer_err));
    if let Some(env) = env {
        command.env_clear();
        for (k, v) in env.vars() {
            command.env(k, v);
        }
    }

    let mut child = command.spawn().map_err(|source| ExecError::Spawn {
        program: program.clone(),
        source,
    })?;
    // The Command still holds the write ends; drop it so the pipe sees EOF
    // once the child exits.
    drop(command);

    let mut raw = Vec::new();
    reader.read_to_end(&mut raw)?;
    let status = child.wait()?;
    let output = String::from_utf8_lossy(&raw).into_owned();

    if status.success() {
        Ok(output)
    } else {
        Err(ExecError::Failed {
            code: status.code(),
            output,
        })
    }
}

/// One pipe whose write end is handed to both of the child's output
/// streams, so stdout and stderr interleave exactly as the child emitted
/// them. Created close-on-exec so a child spawned elsewhere in the process
/// cannot inherit the write end and hold the capture open past its exit;
/// `Stdio::from` still dups the intended ends into this pipe's own child.
fn merged_capture_pipe() -> io::Result<(File, File)> {
    let mut fds: [libc::c_int; 2] = [0; 2];
    if unsafe { libc::pipe2(fds.as_mut_ptr(), libc::O_CLOEXEC) } != 0 {
        return Err(io::Error::last_os_error());
    }
    let reader = unsafe { File::from_raw_fd(fds[0]) };
    let writer = unsafe { File::from_raw_fd(fds[1]) };
    Ok((reader, writer))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_exit_returns_exact_output() {
        let cmd = CommandLine::shell("/bin/echo hello");
        assert_eq!(run(&cmd, None).unwrap(), "hello\n");
    }

    #[test]
    fn quoted_arguments_survive_tokenization() {
        let cmd = CommandLine::shell("/bin/echo 'hello world'");
        assert_eq!(run(&cmd, None).unwrap(), "hello world\n");
    }

    #[test]
    fn stderr_is_merged_into_the_capture() {
        let cmd = CommandLine::argv(["/bin/sh", "-c", "echo out; echo err >&2"]);
        let output = run(&cmd, None).unwrap();
        assert!(output.contains("out\n"));
        assert!(output.contains("err\n"));
    }

    #[test]
    fn nonzero_exit_carries_code_and_output() {
        let cmd = CommandLine::argv(["/bin/sh", "-c", "echo boom; exit 3"]);
        match run(&cmd, None) {
            Err(ExecError::Failed { code, output }) => {
                assert_eq!(code, Some(3));
                assert_eq!(output, "boom\n");
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn capture_pipe_is_close_on_exec() {
        use std::os::unix::io::AsRawFd;

        let (reader, writer) = merged_capture_pipe().unwrap();
        for end in [&reader, &writer] {
            let flags = unsafe { libc::fcntl(end.as_raw_fd(), libc::F_GETFD) };
            assert_ne!(flags & libc::FD_CLOEXEC, 0);
        }
    }

    #[test]
    fn bare_tool_name_fails_before_spawning() {
        let cmd = CommandLine::shell("pytest -x");
        assert!(matches!(
            run(&cmd, None),
            Err(ExecError::Config(CommandError::BareToolName(_)))
        ));
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let cmd = CommandLine::shell("/no/such/program-xyz");
        assert!(matches!(run(&cmd, None), Err(ExecError::Spawn { .. })));
    }

    #[test]
    fn explicit_env_replaces_inherited_environment() {
        let env = Env::empty()
            .set("RELCHECK_EXEC_PROBE", "42")
            .set("PATH", "/usr/bin:/bin");
        let cmd = CommandLine::argv(["/bin/sh", "-c", "echo ${RELCHECK_EXEC_PROBE}-${HOME:-unset}"]);
        assert_eq!(run(&cmd, Some(&env)).unwrap(), "42-unset\n");
    }

    #[test]
    fn inherited_environment_is_visible_without_explicit_env() {
        std::env::set_var("RELCHECK_INHERIT_PROBE", "inherited");
        let cmd = CommandLine::argv(["/bin/sh", "-c", "echo $RELCHECK_INHERIT_PROBE"]);
        assert_eq!(run(&cmd, None).unwrap(), "inherited\n");
        std::env::remove_var("RELCHECK_INHERIT_PROBE");
    }
}
