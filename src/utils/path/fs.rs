//! Path normalization utilities.
//!
//! - `normalize_path` - absolute form of a filesystem path (canonicalize + fallback)
//! - `resolve_path` - resolve a config-relative path against a base directory
//! - `to_posix` - render a relative path with `/` separators for routes and URLs

use std::path::{Component, Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
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

/// Resolve `path` against `base` unless it is already absolute.
///
/// The result is normalized, so routes and watch roots compare equal
/// regardless of how they were spelled in `joy.toml` or on the command line.
#[inline]
pub fn resolve_path(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        return normalize_path(path);
    }
    normalize_path(&base.join(path))
}

/// Join the normal components of a relative path with `/`.
///
/// `.` components are dropped; anything else (root, prefix, `..`) is kept
/// verbatim so callers can detect escapes.
pub fn to_posix(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        let part = match component {
            Component::CurDir => continue,
            Component::Normal(s) => s.to_string_lossy(),
            Component::ParentDir => "..".into(),
            Component::RootDir | Component::Prefix(_) => continue,
        };
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(&part);
    }
    out
}
