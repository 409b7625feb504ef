//! Target directory lifecycle
//!
//! `reset` is the destructive step: a previous target directory (or a
//! symlink standing in for one) is removed and an empty directory takes its
//! place. Any other entry at the target path is refused, never deleted.
//! `prepare` only makes sure the directory exists, leaving earlier contents
//! alone.

use crate::error::{AggregateError, Result};
use std::fs;
use std::io;
use std::path::Path;

/// Look at what currently sits at `target` before a reset.
///
/// Returns `None` when nothing is there. Directories and symlinks may be
/// replaced; anything else (such as a regular file) is a `Setup` error.
pub fn check_resettable(target: &Path) -> Result<Option<fs::FileType>> {
    match fs::symlink_metadata(target) {
        Ok(meta) if meta.is_dir() || meta.file_type().is_symlink() => Ok(Some(meta.file_type())),
        Ok(_) => Err(AggregateError::setup(
            target,
            io::Error::new(
                io::ErrorKind::AlreadyExists,
                "target exists and is not a directory, refusing to remove it",
            ),
        )),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(AggregateError::setup(target, e)),
    }
}

/// Remove `target` recursively (if present) and recreate it empty.
///
/// Returns `true` if something was removed.
pub fn reset(target: &Path) -> Result<bool> {
    let cleared = match check_resettable(target)? {
        Some(file_type) => {
            // A symlink at the target path is removed, never followed
            let removed = if file_type.is_dir() {
                fs::remove_dir_all(target)
            } else {
                fs::remove_file(target)
            };
            removed.map_err(|e| AggregateError::setup(target, e))?;
            tracing::debug!(path = %target.display(), "removed previous target");
            true
        }
        None => false,
    };

    fs::create_dir_all(target).map_err(|e| AggregateError::setup(target, e))?;
    Ok(cleared)
}

/// Create `target` if missing, keeping existing entries
pub fn prepare(target: &Path) -> Result<()> {
    match fs::symlink_metadata(target) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(AggregateError::setup(
            target,
            io::Error::new(io::ErrorKind::AlreadyExists, "target exists and is not a directory"),
        )),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(target).map_err(|e| AggregateError::setup(target, e))
        }
        Err(e) => Err(AggregateError::setup(target, e)),
    }
}

/// True if an entry named `name` already exists in `target`.
///
/// Uses `symlink_metadata` so a dangling link still counts as taken.
pub fn entry_exists(target: &Path, name: &std::ffi::OsStr) -> bool {
    fs::symlink_metadata(target.join(name)).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reset_creates_missing_target() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("a/b/lnInclude");

        let cleared = reset(&target).unwrap();
        assert!(!cleared);
        assert!(target.is_dir());
    }

    #[test]
    fn test_reset_empties_existing_target() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("lnInclude");
        fs::create_dir_all(target.join("nested")).unwrap();
        fs::write(target.join("stale.h"), "old").unwrap();
        fs::write(target.join("nested/deep.h"), "old").unwrap();

        let cleared = reset(&target).unwrap();
        assert!(cleared);
        assert!(target.is_dir());
        assert_eq!(fs::read_dir(&target).unwrap().count(), 0);
    }

    #[test]
    fn test_reset_refuses_plain_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("lnInclude");
        fs::write(&target, "not a dir").unwrap();

        let err = reset(&target).unwrap_err();
        assert!(matches!(err, AggregateError::Setup { .. }));
        assert_eq!(err.path(), Some(target.as_path()));
        assert_eq!(fs::read_to_string(&target).unwrap(), "not a dir");
    }

    #[test]
    fn test_check_resettable_kinds() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");
        assert!(check_resettable(&missing).unwrap().is_none());

        let folder = dir.path().join("folder");
        fs::create_dir(&folder).unwrap();
        assert!(check_resettable(&folder).unwrap().unwrap().is_dir());

        let link = dir.path().join("link");
        std::os::unix::fs::symlink(dir.path().join("missing"), &link).unwrap();
        assert!(check_resettable(&link).unwrap().unwrap().is_symlink());

        let file = dir.path().join("file.h");
        fs::write(&file, "").unwrap();
        assert!(check_resettable(&file).is_err());
    }

    #[test]
    fn test_reset_does_not_follow_symlinked_target() {
        let dir = TempDir::new().unwrap();
        let keep = dir.path().join("keep");
        fs::create_dir(&keep).unwrap();
        fs::write(keep.join("precious.h"), "data").unwrap();
        let target = dir.path().join("lnInclude");
        std::os::unix::fs::symlink(&keep, &target).unwrap();

        assert!(reset(&target).unwrap());
        assert!(keep.join("precious.h").exists());
        assert!(!fs::symlink_metadata(&target).unwrap().file_type().is_symlink());
    }

    #[test]
    fn test_prepare_keeps_contents() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("lnInclude");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep.h"), "x").unwrap();

        prepare(&target).unwrap();
        assert!(target.join("keep.h").exists());
    }

    #[test]
    fn test_prepare_creates_missing() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("new/lnInclude");
        prepare(&target).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn test_prepare_rejects_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("lnInclude");
        fs::write(&target, "x").unwrap();
        assert!(matches!(
            prepare(&target),
            Err(AggregateError::Setup { .. })
        ));
    }

    #[test]
    fn test_entry_exists_counts_dangling_links() {
        let dir = TempDir::new().unwrap();
        std::os::unix::fs::symlink("/nonexistent/file.h", dir.path().join("file.h")).unwrap();
        assert!(entry_exists(dir.path(), std::ffi::OsStr::new("file.h")));
        assert!(!entry_exists(dir.path(), std::ffi::OsStr::new("other.h")));
    }
}
