use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::update::UpdateLog;

#[derive(Error, Debug)]
pub enum RepoError {
    #[error("\"{}\" is not a Git repo", .0.display())]
    NotAGitRepo(PathBuf),

    #[error("Not inside a Git repo and no path set in the config")]
    NoRepoFound,

    #[error("Illegal path {0}")]
    IllegalPath(String),

    #[error("Illegal branch name {0:?}")]
    IllegalBranch(String),

    #[error("{command} failed ({reason})")]
    CommandFailed {
        command: String,
        reason: FailureReason,
    },
}

impl RepoError {
    /// True for errors caused by the request rather than the environment.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RepoError::IllegalPath(_) | RepoError::IllegalBranch(_)
        )
    }
}

/// Why an external command was considered failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    Exit(i32),
    /// Terminated by a signal, no exit code available
    Signal,
    TimedOut(Duration),
    Spawn(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Exit(code) => write!(f, "{code}"),
            FailureReason::Signal => write!(f, "killed by signal"),
            FailureReason::TimedOut(timeout) => write!(f, "timed out after {timeout:?}"),
            FailureReason::Spawn(err) => write!(f, "could not start: {err}"),
        }
    }
}

/// A failed update: the transcript collected up to and including the failing
/// step, plus the error that stopped it.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct UpdateFailure {
    pub log: UpdateLog,
    #[source]
    pub error: RepoError,
}

pub type Result<T, E = RepoError> = std::result::Result<T, E>;
