use std::path::{Component, Path, PathBuf};

use crate::error::{RepoError, Result};
use crate::repo::RepoRoot;

/// Resolve a caller-supplied path against the repository root.
///
/// The joined path is normalised lexically and must stay inside the root.
/// An absolute input replaces the root entirely (as `Path::join` does) and so
/// is only accepted when it already points inside the root. If the target
/// exists, its canonical form must also be inside the canonical root so a
/// symlink cannot lead out of the repository.
pub fn resolve_safe(root: &RepoRoot, relative: &str) -> Result<PathBuf> {
    let illegal = || RepoError::IllegalPath(relative.to_string());

    let root_path = normalize(root.path());
    let joined = normalize(&root_path.join(relative));
    if !joined.starts_with(&root_path) {
        return Err(illegal());
    }

    if let Ok(real) = joined.canonicalize() {
        let real_root = root_path.canonicalize().unwrap_or_else(|_| root_path.clone());
        if !real.starts_with(&real_root) {
            return Err(illegal());
        }
    }

    Ok(joined)
}

/// Lexical normalisation: drops `.` and resolves `..` against the preceding
/// component without touching the filesystem. `..` at the filesystem root
/// stays at the root.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}
