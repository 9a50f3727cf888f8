//! Work directory management for Backdrop.
//!
//! The work directory holds one short-lived `request-*` directory per photo
//! job. Nothing in it outlives a request, except after a hard crash; those
//! leftovers are swept on the next start.

use std::path::{Path, PathBuf};

/// Prefix shared by every per-request workspace directory.
const REQUEST_DIR_PREFIX: &str = "request-";

/// Resolve the work directory from an explicit setting or platform defaults.
///
/// Priority:
/// 1. `explicit` (from `--work-dir` / `BACKDROP_WORK_DIR`)
/// 2. Platform cache directory (e.g., `~/.cache/backdrop` on Linux)
/// 3. `.backdrop-work` in the current directory
pub fn resolve_work_dir(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir;
    }

    if let Some(cache) = dirs::cache_dir() {
        return cache.join("backdrop");
    }

    // Last resort: current directory
    PathBuf::from(".backdrop-work")
}

/// Create the work directory and remove stale request workspaces.
///
/// Returns the number of stale workspaces removed. Only directories named
/// `request-*` are touched; anything else in the directory is left alone.
pub async fn prepare_work_dir(path: &Path) -> Result<usize, std::io::Error> {
    tokio::fs::create_dir_all(path).await?;

    let mut removed = 0;
    let mut entries = tokio::fs::read_dir(path).await?;
    while let Some(entry) = entries.next_entry().await? {
        let is_request_dir = entry.file_type().await?.is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(REQUEST_DIR_PREFIX));
        if !is_request_dir {
            continue;
        }

        match tokio::fs::remove_dir_all(entry.path()).await {
            Ok(()) => removed += 1,
            Err(err) => tracing::warn!(
                "Failed to remove stale workspace {}: {err}",
                entry.path().display()
            ),
        }
    }

    if removed > 0 {
        tracing::info!(removed, "Swept stale request workspaces from {}", path.display());
    }
    Ok(removed)
}
