//! Aggregator configuration
//!
//! A run is described by three values: the source tree, the flat target
//! directory, and the whitelisted subfolders. They can come from a TOML
//! file, from the command line, or both (flags win).
//!
//! # Example lninclude.toml
//!
//! ```toml
//! source_folder = "Utilities"
//! target_folder = "Utilities/lnInclude"
//! subfolders = ["includeHeaders"]
//! ```

use crate::error::{AggregateError, Result};
use crate::include_set::IncludeSet;
use crate::paths;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Unvalidated configuration record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AggregatorConfig {
    /// Root of the tree to scan
    pub source_folder: Option<PathBuf>,

    /// Flat directory that receives the links
    pub target_folder: Option<PathBuf>,

    /// Subfolders of `source_folder` whose files are linked
    #[serde(default)]
    pub subfolders: Vec<String>,
}

impl AggregatorConfig {
    pub fn new(
        source_folder: impl Into<PathBuf>,
        target_folder: impl Into<PathBuf>,
        subfolders: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            source_folder: Some(source_folder.into()),
            target_folder: Some(target_folder.into()),
            subfolders: subfolders.into_iter().map(Into::into).collect(),
        }
    }

    /// Load a configuration from a TOML file.
    ///
    /// Relative `source_folder`/`target_folder` values are anchored at the
    /// directory containing the file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let mut config = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;

        let base = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        config.source_folder = config.source_folder.map(|p| base.join(p));
        config.target_folder = config.target_folder.map(|p| base.join(p));
        Ok(config)
    }

    /// Parse a configuration from a TOML string
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("Failed to parse TOML")
    }

    /// Overlay `other` on top of `self`: set fields of `other` win, a
    /// non-empty subfolder list replaces ours entirely.
    pub fn merged_with(mut self, other: AggregatorConfig) -> Self {
        if other.source_folder.is_some() {
            self.source_folder = other.source_folder;
        }
        if other.target_folder.is_some() {
            self.target_folder = other.target_folder;
        }
        if !other.subfolders.is_empty() {
            self.subfolders = other.subfolders;
        }
        self
    }

    /// Validate against the current working directory
    pub fn validate(&self) -> Result<ResolvedConfig> {
        let cwd = std::env::current_dir().map_err(|e| AggregateError::setup(".", e))?;
        self.validate_in(&cwd)
    }

    /// Validate, resolving relative paths against `base`
    pub fn validate_in(&self, base: &Path) -> Result<ResolvedConfig> {
        let source = self
            .source_folder
            .as_deref()
            .ok_or_else(|| AggregateError::InvalidConfig("missing source_folder".into()))?;
        let target = self
            .target_folder
            .as_deref()
            .ok_or_else(|| AggregateError::InvalidConfig("missing target_folder".into()))?;

        for sub in &self.subfolders {
            if Path::new(sub).is_absolute() {
                return Err(AggregateError::InvalidConfig(format!(
                    "subfolder '{}' must be relative to source_folder",
                    sub
                )));
            }
        }

        let source_abs = paths::absolute(source, base);
        let source_folder =
            fs::canonicalize(&source_abs).map_err(|e| AggregateError::setup(&source_abs, e))?;
        if !source_folder.is_dir() {
            return Err(AggregateError::InvalidConfig(format!(
                "source_folder {} is not a directory",
                source_folder.display()
            )));
        }

        let target_abs = paths::absolute(target, base);
        let target_folder = paths::resolve_parent(&target_abs)
            .map_err(|e| AggregateError::setup(&target_abs, e))?;
        if paths::is_within(&source_folder, &target_folder) {
            return Err(AggregateError::InvalidConfig(format!(
                "target_folder {} would contain source_folder {}",
                target_folder.display(),
                source_folder.display()
            )));
        }

        let include_set = IncludeSet::resolve(&source_folder, &self.subfolders)?;

        Ok(ResolvedConfig {
            source_folder,
            target_folder,
            subfolders: self.subfolders.clone(),
            include_set,
        })
    }
}

/// Validated configuration with absolute, normalized paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub source_folder: PathBuf,
    pub target_folder: PathBuf,
    pub subfolders: Vec<String>,
    pub include_set: IncludeSet,
}
