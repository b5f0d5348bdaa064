//! Filesystem side of path handling.
//!
//! - `normalize_path` - absolute form of a config/CLI path (canonicalize + fallback)
//! - `resolve_source` - map a root-relative URL reference onto the document root

use std::path::{Path, PathBuf};

use super::url::split_query;

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to the path itself when absolute, or joined onto the current
/// directory when relative, so that not-yet-existing paths still resolve.
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Resolve a root-relative URL reference (`/deep/a.js?t=1`) to a file under
/// `fs_root`.
///
/// The query is dropped and leading slashes are stripped, so the result never
/// escapes to the filesystem root.
pub fn resolve_source(fs_root: &Path, reference: &str) -> PathBuf {
    let (path, _) = split_query(reference);
    fs_root.join(path.trim_start_matches('/'))
}
