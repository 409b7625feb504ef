//! Whitelist of source subfolders whose files get linked

use crate::error::{AggregateError, Result};
use crate::paths;
use std::path::{Path, PathBuf};

/// Resolved, immutable set of include directories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeSet {
    dirs: Vec<PathBuf>,
}

impl IncludeSet {
    /// Resolve each subfolder against `source_root`.
    ///
    /// `source_root` must already be canonical. Entries that exist are
    /// canonicalized, missing ones keep their lexical form and will never
    /// match a walked directory. An entry that exists but cannot be
    /// resolved is a `Setup` error.
    pub fn resolve<S: AsRef<str>>(source_root: &Path, subfolders: &[S]) -> Result<Self> {
        let mut dirs: Vec<PathBuf> = Vec::with_capacity(subfolders.len());
        for sub in subfolders {
            let abs = paths::absolute(Path::new(sub.as_ref()), source_root);
            let dir = paths::resolve(&abs).map_err(|e| AggregateError::setup(&abs, e))?;
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }
        Ok(Self { dirs })
    }

    /// True if `dir` is an include directory or nested under one
    pub fn contains(&self, dir: &Path) -> bool {
        self.dirs.iter().any(|d| paths::is_within(dir, d))
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }
}
