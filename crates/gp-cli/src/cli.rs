//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Repository activity extractor.
///
/// Turns the commit history of many git repositories into a single
/// time-sorted stream of "file touched by author" events.
#[derive(Debug, Parser)]
#[command(name = "gp", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Work directory holding config.json; receives the event stream.
    #[arg(value_parser = parse_work_dir)]
    pub work_dir: PathBuf,

    /// Operation to run.
    #[arg(value_enum)]
    pub command: Commands,
}

/// Available operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Commands {
    /// Scan all configured repositories and write the sorted event stream.
    #[value(name = "write-events", alias = "writeEvents")]
    WriteEvents,

    /// Pull (or clone) all configured repository checkouts.
    #[value(name = "update-repos", alias = "updateRepos")]
    UpdateRepos,
}

/// Accepts only existing directories, returned as absolute paths.
fn parse_work_dir(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if !path.exists() {
        return Err(format!("path {value} does not exist"));
    }
    if !path.is_dir() {
        return Err(format!("path {value} is not a directory"));
    }
    path.canonicalize()
        .map_err(|e| format!("cannot resolve {value}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_work_dir_and_command() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().to_str().unwrap();

        let cli = Cli::try_parse_from(["gp", dir, "write-events"]).unwrap();

        assert_eq!(cli.command, Commands::WriteEvents);
        assert_eq!(cli.work_dir, temp.path().canonicalize().unwrap());
        assert!(!cli.verbose);
    }

    #[test]
    fn accepts_camel_case_aliases() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().to_str().unwrap();

        let write = Cli::try_parse_from(["gp", dir, "writeEvents"]).unwrap();
        let update = Cli::try_parse_from(["gp", "-v", dir, "updateRepos"]).unwrap();

        assert_eq!(write.command, Commands::WriteEvents);
        assert_eq!(update.command, Commands::UpdateRepos);
        assert!(update.verbose);
    }

    #[test]
    fn rejects_unknown_command() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().to_str().unwrap();

        assert!(Cli::try_parse_from(["gp", dir, "deleteEverything"]).is_err());
    }

    #[test]
    fn rejects_missing_arguments() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().to_str().unwrap();

        assert!(Cli::try_parse_from(["gp"]).is_err());
        assert!(Cli::try_parse_from(["gp", dir]).is_err());
    }

    #[test]
    fn rejects_missing_or_non_directory_work_dir() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("config.json");
        std::fs::write(&file, "{}").unwrap();
        let missing = temp.path().join("nope");

        let err = Cli::try_parse_from(["gp", missing.to_str().unwrap(), "write-events"])
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));

        let err =
            Cli::try_parse_from(["gp", file.to_str().unwrap(), "write-events"]).unwrap_err();
        assert!(err.to_string().contains("is not a directory"));
    }
}
