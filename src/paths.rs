//! Path normalization helpers
//!
//! Eligibility tests compare directories component by component, so both
//! sides must be absolute and free of `.`/`..` segments before comparison.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Make `path` absolute against `base` and lexically drop `.` and `..`.
///
/// Does not touch the filesystem. A `..` at the root stays at the root.
pub fn absolute(path: &Path, base: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    normalize(&joined)
}

/// Lexically normalize a path
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Resolve symlinks when the path exists, fall back to the lexical form.
///
/// Only a missing path falls back; any other failure (permissions, a file
/// used as a directory) is returned so it cannot silently match nothing.
pub fn resolve(path: &Path) -> io::Result<PathBuf> {
    match fs::canonicalize(path) {
        Ok(resolved) => Ok(resolved),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(normalize(path)),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "cannot resolve path");
            Err(e)
        }
    }
}

/// Like `resolve`, but leaves the final component alone.
///
/// Used for paths that are about to be replaced: a symlink sitting at
/// `path` must stay a symlink, not turn into the directory it points at.
pub fn resolve_parent(path: &Path) -> io::Result<PathBuf> {
    let path = normalize(path);
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => Ok(resolve(parent)?.join(name)),
        _ => resolve(&path),
    }
}

/// True if `dir` is `ancestor` itself or nested under it
pub fn is_within(dir: &Path, ancestor: &Path) -> bool {
    dir.starts_with(ancestor)
}
