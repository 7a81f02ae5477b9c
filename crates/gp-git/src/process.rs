//! Synchronous external process execution.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use thiserror::Error;

/// An external command that could not be run to a successful exit.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The program could not be started (not found, permission denied, ...).
    #[error("failed to start `{command}` in {}: {source}", dir.display())]
    Spawn {
        command: String,
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The program ran but exited unsuccessfully.
    #[error("`{command}` in {} exited with {status}: {}", dir.display(), stderr.trim())]
    Exited {
        command: String,
        dir: PathBuf,
        status: ExitStatus,
        stderr: String,
    },
}

impl ProcessError {
    /// Exit code of the failed process, if it exited normally.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Spawn { .. } => None,
            Self::Exited { status, .. } => status.code(),
        }
    }
}

/// Runs a command to completion and returns its standard output.
pub trait ProcessInvoker {
    fn run(&self, working_dir: &Path, program: &str, args: &[&str])
    -> Result<String, ProcessError>;
}

/// [`ProcessInvoker`] backed by [`std::process::Command`].
///
/// Blocks until the child exits. There is no timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemInvoker;

impl ProcessInvoker for SystemInvoker {
    fn run(
        &self,
        working_dir: &Path,
        program: &str,
        args: &[&str],
    ) -> Result<String, ProcessError> {
        let command = display_command(program, args);
        tracing::debug!(%command, dir = %working_dir.display(), "running command");

        let output = Command::new(program)
            .args(args)
            .current_dir(working_dir)
            .output()
            .map_err(|source| ProcessError::Spawn {
                command: command.clone(),
                dir: working_dir.to_path_buf(),
                source,
            })?;

        if !output.status.success() {
            return Err(ProcessError::Exited {
                command,
                dir: working_dir.to_path_buf(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        match String::from_utf8(output.stdout) {
            Ok(stdout) => Ok(stdout),
            Err(err) => {
                tracing::warn!(%command, "command output is not valid UTF-8, decoding lossily");
                Ok(String::from_utf8_lossy(err.as_bytes()).into_owned())
            }
        }
    }
}

fn display_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}
