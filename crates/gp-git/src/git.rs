//! The git commands gitpulse needs: history log, pull and clone.

use std::path::Path;

use gp_core::history_log_format;

use crate::process::{ProcessError, ProcessInvoker, SystemInvoker};

/// Default git program, resolved through `PATH`.
pub const DEFAULT_GIT_PROGRAM: &str = "git";

/// Runs git through a [`ProcessInvoker`].
#[derive(Debug, Clone)]
pub struct Git<I = SystemInvoker> {
    program: String,
    invoker: I,
}

impl Git {
    /// Git backed by real child processes.
    pub fn new(program: impl Into<String>) -> Self {
        Self::with_invoker(program, SystemInvoker)
    }
}

impl Default for Git {
    fn default() -> Self {
        Self::new(DEFAULT_GIT_PROGRAM)
    }
}

impl<I: ProcessInvoker> Git<I> {
    pub fn with_invoker(program: impl Into<String>, invoker: I) -> Self {
        Self {
            program: program.into(),
            invoker,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub const fn invoker(&self) -> &I {
        &self.invoker
    }

    /// Full history of all branches with changed paths, in the format
    /// expected by [`gp_core::scan`].
    ///
    /// `core.quotepath` is disabled so non-ASCII file names are printed as-is
    /// instead of octal-escaped.
    pub fn history_log(&self, repo_dir: &Path) -> Result<String, ProcessError> {
        let pretty = format!("--pretty=format:{}", history_log_format());
        self.invoker.run(
            repo_dir,
            &self.program,
            &[
                "-c",
                "core.quotepath=off",
                "log",
                "--name-status",
                "--all",
                pretty.as_str(),
            ],
        )
    }

    /// `git pull` inside an existing checkout.
    pub fn pull(&self, repo_dir: &Path) -> Result<(), ProcessError> {
        self.invoker.run(repo_dir, &self.program, &["pull"])?;
        Ok(())
    }

    /// `git clone <url>` inside `parent_dir`.
    pub fn clone_into(&self, parent_dir: &Path, url: &str) -> Result<(), ProcessError> {
        self.invoker.run(parent_dir, &self.program, &["clone", url])?;
        Ok(())
    }
}
