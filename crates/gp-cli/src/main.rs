use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gp_cli::commands::{update_repos, write_events};
use gp_cli::{Cli, Commands, Workspace};
use gp_git::Git;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        // Skipped history records are reported at warn level.
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let workspace = Workspace::load(&cli.work_dir).context("failed to load configuration")?;
    tracing::debug!(root = %workspace.root.display(), config = ?workspace.config, "loaded configuration");

    let git = Git::new(workspace.config.git.clone());

    match cli.command {
        Commands::WriteEvents => {
            let report = write_events::run(&workspace, &git)?;
            tracing::debug!(?report, "write-events finished");
        }
        Commands::UpdateRepos => {
            let report = update_repos::run(&workspace, &git)?;
            println!(
                "Updated {} repositories ({} pulled, {} cloned).",
                report.pulled + report.cloned,
                report.pulled,
                report.cloned
            );
        }
    }

    Ok(())
}
