use tokio::fs;

use crate::error::Result;
use crate::file::resolver::resolve_safe;
use crate::repo::RepoRoot;

/// Concatenate the files at `relatives`, in the given order, each preceded by
/// a `--- <path> ---` delimiter line.
///
/// Every path is checked before anything is read, so one illegal path fails
/// the whole call. Paths that are missing or not regular files are skipped so
/// callers can pass directory nodes straight from the tree. Invalid UTF-8 is
/// replaced with U+FFFD.
pub async fn bundle(root: &RepoRoot, relatives: &[String]) -> Result<String> {
    let resolved = relatives
        .iter()
        .map(|rel| resolve_safe(root, rel).map(|path| (rel, path)))
        .collect::<Result<Vec<_>>>()?;

    let mut merged = String::new();
    for (rel, path) in resolved {
        match fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => {}
            _ => continue,
        }

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(?path, error = %e, "Failed to read file, skipping");
                continue;
            }
        };

        merged.push_str(&format!(
            "\n\n--- {rel} ---\n{}",
            String::from_utf8_lossy(&bytes)
        ));
    }

    Ok(merged)
}
