use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::error::FailureReason;

/// Captured result of one finished external command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub command: String,
    /// None when the process was terminated by a signal
    pub code: Option<i32>,
    pub out: String,
    pub err: String,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// stdout followed by stderr
    pub fn combined_output(&self) -> String {
        format!("{}{}", self.out, self.err)
    }

    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self.code {
            Some(0) => None,
            Some(code) => Some(FailureReason::Exit(code)),
            None => Some(FailureReason::Signal),
        }
    }
}

/// Render a program and its arguments the way a shell user would type them.
pub fn command_line(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run `program args..` in `dir` and capture its output. The child is killed
/// if it outlives `timeout`.
pub async fn run_cmd(
    dir: &Path,
    program: &str,
    args: &[String],
    timeout: Duration,
) -> Result<CommandResult, FailureReason> {
    let command = command_line(program, args);
    tracing::debug!(?dir, %command, "Attempting to run_cmd");

    let child = Command::new(program)
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| FailureReason::Spawn(e.to_string()))?;

    // Dropping the wait future on timeout drops the child, which kills it
    let output = tokio::time::timeout(timeout, child.wait_with_output())
        .await
        .map_err(|_| FailureReason::TimedOut(timeout))?
        .map_err(|e| FailureReason::Spawn(e.to_string()))?;

    Ok(CommandResult {
        command,
        code: output.status.code(),
        out: String::from_utf8_lossy(&output.stdout).to_string(),
        err: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// Working directory used when no better one is known.
pub fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
