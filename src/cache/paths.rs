// Cache path utilities.
// One JSON file per repository key, derived deterministically from owner and
// name.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::types::RepoId;

/// Default cache root (~/.cache/gitdigest on macOS/Linux).
pub fn default_cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "gitdigest").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path of the cached digest for a repository.
pub fn digest_path(root: &Path, id: &RepoId) -> PathBuf {
    root.join(format!(
        "{}_{}.json",
        sanitize_name(&id.owner),
        sanitize_name(&id.name)
    ))
}

/// Sanitize a name for use in filesystem paths.
/// Replaces problematic characters with underscores.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}
