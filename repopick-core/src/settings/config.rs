use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Repository section of the settings file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepoSettings {
    /// Explicit repository root. When unset the root is detected from the
    /// current working directory.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Default branch for updates and the branch list
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Script run with bash after a successful pull. Relative paths are
    /// resolved against the directory holding the settings file.
    #[serde(default)]
    pub post_update: Option<PathBuf>,

    #[serde(default = "default_remote")]
    pub remote: String,

    /// Pass `--prune` to `git fetch`
    #[serde(default)]
    pub prune: bool,
}

fn default_branch() -> String {
    "master".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

impl Default for RepoSettings {
    fn default() -> Self {
        Self {
            path: None,
            branch: default_branch(),
            post_update: None,
            remote: default_remote(),
            prune: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateSettings {
    /// Upper bound for each command of an update
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_timeout_seconds() -> u64 {
    300
}

impl Default for UpdateSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9001
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    #[serde(default)]
    pub repo: RepoSettings,

    #[serde(default)]
    pub update: UpdateSettings,

    #[serde(default)]
    pub server: ServerSettings,
}

impl Settings {
    /// Surrounding whitespace is stripped and blank values count as unset,
    /// matching hand-edited files such as `path = ""`.
    pub(crate) fn normalize(mut self) -> Self {
        self.repo.path = trimmed_path(self.repo.path.take());
        self.repo.post_update = trimmed_path(self.repo.post_update.take());

        let branch = self.repo.branch.trim();
        self.repo.branch = if branch.is_empty() {
            default_branch()
        } else {
            branch.to_string()
        };

        let remote = self.repo.remote.trim();
        self.repo.remote = if remote.is_empty() {
            default_remote()
        } else {
            remote.to_string()
        };

        self
    }
}

fn trimmed_path(path: Option<PathBuf>) -> Option<PathBuf> {
    let path = path?;
    let trimmed = path.to_string_lossy().trim().to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}
