//! Throwaway git repositories for integration tests.
//!
//! Layout inside one temp dir:
//! - `origin.git`: bare repository acting as the remote
//! - `work`: the clone repopick serves and updates
//! - `upstream`: a second clone used to push new commits to `origin`

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

use repopick_core::{RepoRoot, Settings, SettingsManager, UpdateOrchestrator};
use tempfile::TempDir;

pub struct GitFixture {
    pub temp: TempDir,
    pub origin: PathBuf,
    pub work: PathBuf,
    pub upstream: PathBuf,
}

pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(["-c", "user.email=test@test.com", "-c", "user.name=Test"])
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

impl GitFixture {
    pub fn new() -> Self {
        let temp = tempfile::tempdir().unwrap();
        let base = temp.path().canonicalize().unwrap();
        let origin = base.join("origin.git");
        let work = base.join("work");
        let upstream = base.join("upstream");

        std::fs::create_dir(&origin).unwrap();
        git(&origin, &["init", "-q", "--bare"]);
        git(&origin, &["symbolic-ref", "HEAD", "refs/heads/master"]);

        std::fs::create_dir(&work).unwrap();
        git(&work, &["init", "-q"]);
        git(&work, &["symbolic-ref", "HEAD", "refs/heads/master"]);
        std::fs::write(work.join("README.md"), "# demo\n").unwrap();
        git(&work, &["add", "."]);
        git(&work, &["commit", "-q", "-m", "initial"]);
        git(&work, &["remote", "add", "origin", &origin.to_string_lossy()]);
        git(&work, &["push", "-q", "-u", "origin", "master"]);

        git(
            &base,
            &["clone", "-q", &origin.to_string_lossy(), &upstream.to_string_lossy()],
        );

        Self {
            temp,
            origin,
            work,
            upstream,
        }
    }

    pub fn config_dir(&self) -> PathBuf {
        self.temp.path().canonicalize().unwrap()
    }

    pub fn root(&self) -> RepoRoot {
        RepoRoot::new(&self.work).unwrap()
    }

    /// Commit `content` to `file` in the upstream clone and push it.
    pub fn push_upstream(&self, file: &str, content: &str) {
        std::fs::write(self.upstream.join(file), content).unwrap();
        git(&self.upstream, &["add", "."]);
        git(&self.upstream, &["commit", "-q", "-m", &format!("add {file}")]);
        git(&self.upstream, &["push", "-q", "origin", "HEAD"]);
    }

    /// Commit `content` to `file` in the served clone without pushing.
    pub fn commit_local(&self, file: &str, content: &str) {
        std::fs::write(self.work.join(file), content).unwrap();
        git(&self.work, &["add", "."]);
        git(&self.work, &["commit", "-q", "-m", &format!("local {file}")]);
    }

    pub fn settings(&self, configure: impl FnOnce(&mut Settings)) -> SettingsManager {
        let mut settings = Settings::default();
        settings.repo.path = Some(self.work.clone());
        settings.update.timeout_seconds = 60;
        configure(&mut settings);
        SettingsManager::from_settings(settings, &self.config_dir())
    }

    pub fn orchestrator(&self, configure: impl FnOnce(&mut Settings)) -> UpdateOrchestrator {
        UpdateOrchestrator::new(self.settings(configure))
    }
}
