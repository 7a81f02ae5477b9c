//! Implementation of the `gp write-events` command.
//!
//! Reads the full history of every configured repository, turns each changed
//! path into an event and writes all events, sorted by timestamp, as JSONL.

use std::path::PathBuf;

use anyhow::{Context, Result};
use gp_core::{Event, EventBuilder, MissingAuthors};
use gp_git::{Git, ProcessInvoker};

use crate::commands::CommandError;
use crate::config::{CONFIG_FILE_NAMES, Workspace};

/// Summary of a `write-events` run.
#[derive(Debug)]
pub struct WriteReport {
    pub repos: usize,
    pub events: usize,
    pub malformed_records: usize,
    pub missing_authors: MissingAuthors,
    pub output: PathBuf,
}

/// Events gathered from all repositories, not yet sorted.
#[derive(Debug, Default)]
pub struct CollectedEvents {
    pub events: Vec<Event>,
    pub missing_authors: MissingAuthors,
    pub malformed_records: usize,
}

/// Scans every configured repository and builds its events.
///
/// Any git failure, missing checkout or truncated history aborts the run.
pub fn collect_events<I: ProcessInvoker>(
    workspace: &Workspace,
    git: &Git<I>,
) -> Result<CollectedEvents> {
    let config = &workspace.config;
    let builder = EventBuilder::new(&config.user_map, &config.ignore_if_containing);
    let repos: Vec<_> = workspace.repos().collect();
    let mut collected = CollectedEvents::default();
    tracing::debug!(
        repos = repos.len(),
        time_basis = %config.time_basis,
        "collecting events"
    );

    for (idx, entry) in repos.iter().enumerate() {
        println!("{}/{}) {}", idx + 1, repos.len(), entry.repo);

        let repo_dir = workspace.locate(entry.repo)?;
        let log = git
            .history_log(&repo_dir)
            .with_context(|| format!("failed to read history of {}", entry.repo))?;

        let before = collected.events.len();
        let mut scanner = gp_core::scan(&log, config.time_basis);
        for raw in scanner.by_ref() {
            if let Some(event) = builder.build(raw, entry.project, &mut collected.missing_authors)
            {
                collected.events.push(event);
            }
        }
        collected.malformed_records += scanner.malformed_records();

        if scanner.ended_early() {
            return Err(CommandError::HistoryTruncated {
                repo: entry.repo.clone(),
            }
            .into());
        }

        tracing::debug!(
            repo = %entry.repo,
            dir = %repo_dir.display(),
            events = collected.events.len() - before,
            malformed = scanner.malformed_records(),
            "scanned history"
        );
    }

    Ok(collected)
}

/// Run the write-events command.
pub fn run<I: ProcessInvoker>(workspace: &Workspace, git: &Git<I>) -> Result<WriteReport> {
    let collected = collect_events(workspace, git)?;

    if !collected.missing_authors.is_empty() {
        print!("{}", missing_authors_report(&collected.missing_authors));
    }
    if collected.malformed_records > 0 {
        tracing::warn!(
            count = collected.malformed_records,
            "skipped malformed history records"
        );
    }

    let output = workspace.output_path();
    println!("Writing {}...", output.display());
    let events = gp_core::write_events(&output, collected.events)
        .with_context(|| format!("failed to write event stream to {}", output.display()))?;
    println!("... done ({events} events).");

    Ok(WriteReport {
        repos: workspace.repos().count(),
        events,
        malformed_records: collected.malformed_records,
        missing_authors: collected.missing_authors,
        output,
    })
}

/// Renders the list of unmapped authors for the operator.
pub fn missing_authors_report(missing: &MissingAuthors) -> String {
    let mut out = String::from("\nMissing authors:\n\n");
    for author in missing.iter() {
        out.push_str(&serde_json::Value::from(author).to_string());
        out.push('\n');
    }
    out.push_str(&format!(
        "\nPlease add them to userMap in {}.\n",
        CONFIG_FILE_NAMES[0]
    ));
    out
}
