//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml};
use gp_core::{AuthorMap, ExclusionRules, ProjectName, RepoId, TimeBasis};
use gp_git::DEFAULT_GIT_PROGRAM;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration file names looked up in the work directory, in merge order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["config.json", "config.toml"];

const DEFAULT_OUTPUT: &str = "events.stream";
const DEFAULT_CLONE_URL_TEMPLATE: &str = "https://github.com/{repo}.git";

/// Configuration errors. All of them are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Neither configuration file exists in the work directory.
    #[error("no {} found in {}", CONFIG_FILE_NAMES.join(" or "), .0.display())]
    NotFound(PathBuf),

    /// A configuration file could not be parsed or has invalid values.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),

    /// No checkout of a configured repository exists.
    #[error("cannot find checkout of {repo} (looked in: {searched})")]
    RepoNotFound { repo: RepoId, searched: String },

    /// A repository needs cloning but there is no directory to clone into.
    #[error("reposDirs is empty, nowhere to clone {repo}")]
    NoCloneTarget { repo: RepoId },
}

/// A project and the repositories that belong to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: ProjectName,
    #[serde(default)]
    pub repos: Vec<RepoId>,
}

/// Application configuration, read from the work directory.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Projects and their member repositories.
    pub projects: Vec<ProjectConfig>,
    /// Directories searched for repository checkouts. Relative entries are
    /// resolved against the work directory.
    pub repos_dirs: Vec<PathBuf>,
    /// Raw author identifier to canonical identity.
    pub user_map: AuthorMap,
    /// Paths containing any of these substrings are dropped.
    pub ignore_if_containing: ExclusionRules,
    /// Event stream file, relative to the work directory unless absolute.
    pub output: PathBuf,
    /// How commit times are turned into timestamps.
    pub time_basis: TimeBasis,
    /// URL used to clone missing repositories; `{repo}` is replaced by the
    /// repository identifier.
    pub clone_url_template: String,
    /// Git program to run.
    pub git: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("projects", &self.projects.len())
            .field("repos_dirs", &self.repos_dirs)
            .field("user_map", &self.user_map.len())
            .field("ignore_if_containing", &self.ignore_if_containing.len())
            .field("output", &self.output)
            .field("time_basis", &self.time_basis.as_str())
            .field("clone_url_template", &self.clone_url_template)
            .field("git", &self.git)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            projects: Vec::new(),
            repos_dirs: Vec::new(),
            user_map: AuthorMap::default(),
            ignore_if_containing: ExclusionRules::default(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            time_basis: TimeBasis::default(),
            clone_url_template: DEFAULT_CLONE_URL_TEMPLATE.to_string(),
            git: DEFAULT_GIT_PROGRAM.to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from `config.json` and/or `config.toml` in
    /// `work_dir`, then `GP_OUTPUT` / `GP_GIT` from the environment.
    pub fn load(work_dir: &Path) -> Result<Self, ConfigError> {
        let [json_path, toml_path] = CONFIG_FILE_NAMES.map(|name| work_dir.join(name));
        if !json_path.is_file() && !toml_path.is_file() {
            return Err(ConfigError::NotFound(work_dir.to_path_buf()));
        }

        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Json::file(json_path))
            .merge(Toml::file(toml_path))
            .merge(Env::prefixed("GP_").only(&["output", "git"]))
            .extract()
            .map_err(Box::new)?;
        Ok(config)
    }
}

/// Configuration bound to the work directory it was loaded from.
///
/// Built once at startup and passed by reference to the commands.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: PathBuf,
    pub config: Config,
}

/// A configured repository together with its project.
#[derive(Debug, Clone, Copy)]
pub struct RepoEntry<'a> {
    pub project: &'a ProjectName,
    pub repo: &'a RepoId,
}

impl Workspace {
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        Ok(Self::new(root, Config::load(root)?))
    }

    pub fn new(root: &Path, config: Config) -> Self {
        Self {
            root: root.to_path_buf(),
            config,
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// All repositories, in configuration order.
    pub fn repos(&self) -> impl Iterator<Item = RepoEntry<'_>> {
        self.config.projects.iter().flat_map(|project| {
            project.repos.iter().map(move |repo| RepoEntry {
                project: &project.name,
                repo,
            })
        })
    }

    pub fn repos_dirs(&self) -> Vec<PathBuf> {
        self.config
            .repos_dirs
            .iter()
            .map(|dir| self.resolve(dir))
            .collect()
    }

    pub fn output_path(&self) -> PathBuf {
        self.resolve(&self.config.output)
    }

    /// First existing checkout of `repo` across the repository directories.
    pub fn find_checkout(&self, repo: &RepoId) -> Option<PathBuf> {
        self.repos_dirs()
            .into_iter()
            .map(|dir| dir.join(repo.checkout_name()))
            .find(|candidate| candidate.exists())
    }

    /// Like [`Self::find_checkout`], but a missing checkout is an error.
    pub fn locate(&self, repo: &RepoId) -> Result<PathBuf, ConfigError> {
        self.find_checkout(repo)
            .ok_or_else(|| ConfigError::RepoNotFound {
                repo: repo.clone(),
                searched: self
                    .repos_dirs()
                    .iter()
                    .map(|dir| dir.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// Directory new clones go into: the first repository directory.
    pub fn clone_target(&self, repo: &RepoId) -> Result<PathBuf, ConfigError> {
        self.repos_dirs()
            .into_iter()
            .next()
            .ok_or_else(|| ConfigError::NoCloneTarget { repo: repo.clone() })
    }

    pub fn clone_url(&self, repo: &RepoId) -> String {
        self.config
            .clone_url_template
            .replace("{repo}", repo.as_str())
    }
}
