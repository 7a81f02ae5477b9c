//! Implementation of the `gp update-repos` command.
//!
//! Pulls every configured repository that already has a local checkout and
//! clones the ones that don't.

use std::fs;

use anyhow::{Context, Result};
use gp_git::{Git, ProcessInvoker};

use crate::config::Workspace;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct UpdateReport {
    pub pulled: usize,
    pub cloned: usize,
}

/// Run the update-repos command.
pub fn run<I: ProcessInvoker>(workspace: &Workspace, git: &Git<I>) -> Result<UpdateReport> {
    let repos: Vec<_> = workspace.repos().collect();
    let mut report = UpdateReport::default();

    for (idx, entry) in repos.iter().enumerate() {
        println!("{}/{}) {}", idx + 1, repos.len(), entry.repo);

        if let Some(repo_dir) = workspace.find_checkout(entry.repo) {
            println!("  git pull {}", repo_dir.display());
            git.pull(&repo_dir)
                .with_context(|| format!("failed to pull {}", entry.repo))?;
            report.pulled += 1;
        } else {
            let parent = workspace.clone_target(entry.repo)?;
            fs::create_dir_all(&parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
            let url = workspace.clone_url(entry.repo);
            println!("  git clone {url}");
            git.clone_into(&parent, &url)
                .with_context(|| format!("failed to clone {}", entry.repo))?;
            report.cloned += 1;
        }
    }

    tracing::debug!(
        pulled = report.pulled,
        cloned = report.cloned,
        "repositories updated"
    );
    Ok(report)
}
