//! CLI command implementations.

use gp_core::RepoId;
use thiserror::Error;

pub mod update_repos;
pub mod write_events;

/// Repository-level failures that abort a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The history log stopped right after a record separator.
    #[error("history of {repo} ended unexpectedly (blank revision line after separator)")]
    HistoryTruncated { repo: RepoId },
}
