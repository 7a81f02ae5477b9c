//! gitpulse CLI library.
//!
//! This crate provides the CLI interface: configuration, repository
//! discovery and the `write-events` / `update-repos` commands.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::{CONFIG_FILE_NAMES, Config, ConfigError, ProjectConfig, RepoEntry, Workspace};
