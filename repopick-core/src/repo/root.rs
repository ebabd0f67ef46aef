use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{RepoError, Result};
use crate::process::{current_dir, run_cmd};
use crate::settings::manager::{absolutize, expand_home};
use crate::settings::SettingsManager;

/// Name of the metadata directory that marks a working tree root. Tree views
/// hide every entry whose name starts with it.
pub const VCS_MARKER: &str = ".git";

const TOPLEVEL_TIMEOUT: Duration = Duration::from_secs(30);

/// Absolute path of a working tree top level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRoot(PathBuf);

impl RepoRoot {
    /// Accept `path` as a root if it carries the VCS marker.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = absolutize(path.into());
        if !path.join(VCS_MARKER).exists() {
            return Err(RepoError::NotAGitRepo(path));
        }
        Ok(Self(path))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for RepoRoot {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for RepoRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.display().fmt(f)
    }
}

/// Finds the repository root. Nothing is cached: the repository may move or
/// change between requests, so callers resolve once per operation.
#[derive(Debug, Clone)]
pub struct RootResolver {
    settings: SettingsManager,
    probe_dir: Option<PathBuf>,
}

impl RootResolver {
    pub fn new(settings: SettingsManager) -> Self {
        Self {
            settings,
            probe_dir: None,
        }
    }

    /// Probe for a repository from `dir` instead of the process working
    /// directory.
    pub fn with_probe_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.probe_dir = Some(dir.into());
        self
    }

    pub async fn resolve(&self) -> Result<RepoRoot> {
        if let Some(path) = &self.settings.settings().repo.path {
            return RepoRoot::new(expand_home(path));
        }
        self.detect().await
    }

    async fn detect(&self) -> Result<RepoRoot> {
        let dir = self.probe_dir.clone().unwrap_or_else(current_dir);
        let args = ["rev-parse".to_string(), "--show-toplevel".to_string()];

        let result = match run_cmd(&dir, "git", &args, TOPLEVEL_TIMEOUT).await {
            Ok(result) if result.success() => result,
            Ok(result) => {
                tracing::debug!(?dir, stderr = %result.err, "No git repository above directory");
                return Err(RepoError::NoRepoFound);
            }
            Err(reason) => {
                tracing::warn!(?dir, %reason, "Unable to run git to detect repository");
                return Err(RepoError::NoRepoFound);
            }
        };

        let toplevel = result.out.trim();
        if toplevel.is_empty() {
            return Err(RepoError::NoRepoFound);
        }
        RepoRoot::new(toplevel)
    }
}
