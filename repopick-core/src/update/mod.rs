//! Fast-forward update of the working tree.
//!
//! An update is an ordered list of [`UpdateStep`]s run one after another by
//! [`run_steps`]. Every step's command line and combined output land in the
//! [`UpdateLog`] before its exit status is checked, so a failed update still
//! returns the full transcript up to and including the failing step.

pub mod log;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{RepoError, Result, UpdateFailure};
use crate::process::{command_line, run_cmd};
use crate::repo::RepoRoot;
use crate::settings::SettingsManager;

pub use log::{LogEntry, UpdateLog};

/// One external command of an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStep {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl UpdateStep {
    pub fn new(program: &str, args: &[&str], cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            cwd: cwd.into(),
        }
    }

    pub fn command_line(&self) -> String {
        command_line(&self.program, &self.args)
    }
}

/// Run `steps` in order, stopping at the first one that does not exit 0.
pub async fn run_steps(
    steps: &[UpdateStep],
    timeout: Duration,
) -> Result<UpdateLog, UpdateFailure> {
    let mut log = UpdateLog::default();

    for step in steps {
        let command = step.command_line();
        tracing::info!(%command, "Running update step");

        let (output, failure) = match run_cmd(&step.cwd, &step.program, &step.args, timeout).await
        {
            Ok(result) => (result.combined_output(), result.failure_reason()),
            Err(reason) => (format!("{reason}\n"), Some(reason)),
        };
        log.push(command.clone(), output);

        if let Some(reason) = failure {
            tracing::warn!(%command, %reason, "Update step failed");
            return Err(UpdateFailure {
                log,
                error: RepoError::CommandFailed { command, reason },
            });
        }
    }

    Ok(log)
}

/// Reject names `git check-ref-format --branch` would refuse, and anything
/// that could be read as a command-line option.
pub fn validate_branch(branch: &str) -> Result<()> {
    let illegal = || Err(RepoError::IllegalBranch(branch.to_string()));

    if branch.is_empty() || branch == "@" || branch.starts_with('-') {
        return illegal();
    }
    if branch.contains("..") || branch.contains("@{") {
        return illegal();
    }
    if branch
        .chars()
        .any(|c| c.is_control() || c.is_whitespace() || "~^:?*[\\".contains(c))
    {
        return illegal();
    }
    if branch.ends_with('.') {
        return illegal();
    }
    let bad_component = |c: &str| c.is_empty() || c.starts_with('.') || c.ends_with(".lock");
    if branch.split('/').any(bad_component) {
        return illegal();
    }

    Ok(())
}

/// Runs updates against a repository root. Clones share one set of per-root
/// locks, so two updates of the same root never overlap.
#[derive(Debug, Clone)]
pub struct UpdateOrchestrator {
    settings: SettingsManager,
    locks: Arc<Mutex<HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>>>,
}

impl UpdateOrchestrator {
    pub fn new(settings: SettingsManager) -> Self {
        Self {
            settings,
            locks: Arc::default(),
        }
    }

    /// Fetch, fast-forward pull of `branch`, then the post-update script when
    /// one is configured.
    pub fn steps(&self, root: &RepoRoot, branch: &str) -> Vec<UpdateStep> {
        let repo = &self.settings.settings().repo;
        let root_arg = root.path().to_string_lossy().to_string();

        let mut fetch = vec!["-C", root_arg.as_str(), "fetch", "--all"];
        if repo.prune {
            fetch.push("--prune");
        }

        let mut steps = vec![
            UpdateStep::new("git", &fetch, root.path()),
            UpdateStep::new(
                "git",
                &[
                    "-C",
                    root_arg.as_str(),
                    "pull",
                    "--ff-only",
                    "--",
                    repo.remote.as_str(),
                    branch,
                ],
                root.path(),
            ),
        ];

        if let Some(script) = self.settings.post_update_script() {
            let script = script.to_string_lossy().to_string();
            steps.push(UpdateStep::new("bash", &[script.as_str()], root.path()));
        }

        steps
    }

    pub async fn update(&self, root: &RepoRoot, branch: &str) -> Result<UpdateLog, UpdateFailure> {
        if let Err(error) = validate_branch(branch) {
            tracing::warn!(%root, branch, "Refusing update");
            return Err(UpdateFailure {
                log: UpdateLog::default(),
                error,
            });
        }

        let lock = self.lock_for(root);
        let _guard = lock.lock().await;

        tracing::info!(%root, branch, "Starting update");
        let timeout = Duration::from_secs(self.settings.settings().update.timeout_seconds);
        let result = run_steps(&self.steps(root, branch), timeout).await;
        match &result {
            Ok(log) => tracing::info!(%root, steps = log.len(), "Update finished"),
            Err(failure) => tracing::warn!(%root, error = %failure.error, "Update aborted"),
        }
        result
    }

    fn lock_for(&self, root: &RepoRoot) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.entry(root.path().to_path_buf()).or_default().clone()
    }
}
