use std::collections::BTreeSet;
use std::time::Duration;

use crate::process::run_cmd;
use crate::repo::root::RepoRoot;

const LIST_TIMEOUT: Duration = Duration::from_secs(30);

/// Remote branch names known locally for `remote`, always including
/// `default_branch`, sorted ascending.
///
/// The list is advisory: if git cannot be run or fails, only the default
/// branch is returned.
pub async fn list_branches(root: &RepoRoot, default_branch: &str, remote: &str) -> Vec<String> {
    let args: Vec<String> = ["branch", "-r", "--format", "%(refname:short)"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let output = match run_cmd(root.path(), "git", &args, LIST_TIMEOUT).await {
        Ok(result) if result.success() => result.out,
        Ok(result) => {
            tracing::warn!(%root, code = ?result.code, stderr = %result.err, "git branch -r failed");
            return vec![default_branch.to_string()];
        }
        Err(reason) => {
            tracing::warn!(%root, %reason, "Unable to list remote branches");
            return vec![default_branch.to_string()];
        }
    };

    let mut names = parse_remote_branches(&output, remote);
    names.insert(default_branch.to_string());
    names.into_iter().collect()
}

/// Short branch names from `git branch -r --format %(refname:short)` output,
/// without the symbolic HEAD entry.
fn parse_remote_branches(output: &str, remote: &str) -> BTreeSet<String> {
    let prefix = format!("{remote}/");
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.ends_with("HEAD"))
        .filter_map(|line| line.strip_prefix(&prefix))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
