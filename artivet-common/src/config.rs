// artivet-common/src/config.rs
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use directories::UserDirs;
use serde::Deserialize;
use tracing::debug;

use super::error::{ArtivetError, Result};
use crate::repository::LocalRepository;

const DEFAULT_REMOTE_REPOSITORY: &str = "https://repo.maven.apache.org/maven2";
const DEFAULT_MAX_ATTEMPTS: i32 = 3;
const CONFIG_FILENAME: &str = "artivet.toml";

/// Optional `artivet.toml` contents. Every key may be omitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub local_repository: Option<PathBuf>,
    pub remote_repositories: Option<Vec<String>>,
    pub max_attempts: Option<i32>,
    pub logs_dir: Option<PathBuf>,
    pub allow_insecure: Option<bool>,
}

impl FileConfig {
    pub fn read(path: &Path) -> Result<Self> {
        debug!("Reading configuration file {}", path.display());
        let raw = fs::read_to_string(path).map_err(|e| {
            ArtivetError::Config(format!("Cannot read {}: {e}", path.display()))
        })?;
        Ok(toml::from_str(&raw)?)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub local_repository: PathBuf,
    pub remote_repositories: Vec<String>,
    /// Checked by the resolver, not here.
    pub max_attempts: i32,
    pub logs_dir: PathBuf,
    pub allow_insecure: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        debug!("Loading artivet configuration");

        let file_path = env::var("ARTIVET_CONFIG")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .or_else(|| {
                let local = PathBuf::from(CONFIG_FILENAME);
                local.is_file().then_some(local)
            });

        let file = match file_path {
            Some(path) => FileConfig::read(&path)?,
            None => {
                debug!("No {} found, using defaults", CONFIG_FILENAME);
                FileConfig::default()
            }
        };

        Self::from_sources(file, |key| env::var(key).ok())
    }

    /// Layers `env` over `file` over the built-in defaults.
    pub fn from_sources(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let local_repository = env("ARTIVET_LOCAL_REPO")
            .map(PathBuf::from)
            .or(file.local_repository)
            .unwrap_or_else(default_local_repository);
        debug!("Local repository: {}", local_repository.display());

        let remote_repositories = match env("ARTIVET_REMOTE_REPOS") {
            Some(list) => list
                .split(',')
                .map(|s| s.trim().trim_end_matches('/').to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => file
                .remote_repositories
                .unwrap_or_else(|| vec![DEFAULT_REMOTE_REPOSITORY.to_string()]),
        };
        if remote_repositories.is_empty() {
            return Err(ArtivetError::Config(
                "At least one remote repository is required".to_string(),
            ));
        }

        let max_attempts = match env("ARTIVET_MAX_ATTEMPTS") {
            Some(raw) => raw.trim().parse::<i32>().map_err(|e| {
                ArtivetError::Config(format!("ARTIVET_MAX_ATTEMPTS='{raw}' is not a number: {e}"))
            })?,
            None => file.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS),
        };

        let logs_dir = env("ARTIVET_LOGS_DIR")
            .map(PathBuf::from)
            .or(file.logs_dir)
            .unwrap_or_else(|| {
                local_repository
                    .parent()
                    .map_or_else(|| local_repository.join("logs"), |p| p.join("artivet-logs"))
            });

        debug!("Configuration loaded successfully.");
        Ok(Self {
            local_repository,
            remote_repositories,
            max_attempts,
            logs_dir,
            allow_insecure: file.allow_insecure.unwrap_or(false),
        })
    }

    pub fn repository(&self) -> LocalRepository {
        LocalRepository::new(&self.local_repository)
    }

    pub fn logs_dir(&self) -> &Path {
        &self.logs_dir
    }
}

fn default_local_repository() -> PathBuf {
    UserDirs::new()
        .map_or_else(|| PathBuf::from("/"), |ud| ud.home_dir().to_path_buf())
        .join(".m2")
        .join("repository")
}
