//! Run events and the report built from them
//!
//! Each event renders as exactly one human-readable line; the report
//! serializes to JSON for `--format json`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A (link name, source file) pair placed in the target directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEntry {
    pub link_name: String,
    pub source: PathBuf,
}

/// Something observable that happened during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LinkEvent {
    /// A previous target directory was removed
    TargetCleared { path: PathBuf },
    /// A symlink was created (or would be, in a dry run)
    Created { link_path: PathBuf, source: PathBuf },
    /// The link name was already taken; `source` was skipped
    Conflict { link_name: String, source: PathBuf },
}

impl fmt::Display for LinkEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkEvent::TargetCleared { path } => {
                write!(f, "cleared target folder: {}", path.display())
            }
            LinkEvent::Created { link_path, source } => {
                write!(f, "created {} -> {}", link_path.display(), source.display())
            }
            LinkEvent::Conflict { link_name, source } => write!(
                f,
                "conflict: {} already exists, skipped {}",
                link_name,
                source.display()
            ),
        }
    }
}

impl LinkEvent {
    /// Render as an output line, marking dry runs
    pub fn to_line(&self, dry_run: bool) -> String {
        if dry_run {
            format!("[dry-run] {}", self)
        } else {
            self.to_string()
        }
    }
}

/// Outcome of an aggregation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateReport {
    pub source_folder: PathBuf,
    pub target_folder: PathBuf,
    pub dry_run: bool,
    /// Number of `Created` events
    pub created: usize,
    /// Number of `Conflict` events
    pub conflicts: usize,
    pub events: Vec<LinkEvent>,
}

impl AggregateReport {
    pub fn new(source_folder: &Path, target_folder: &Path, dry_run: bool) -> Self {
        Self {
            source_folder: source_folder.to_path_buf(),
            target_folder: target_folder.to_path_buf(),
            dry_run,
            ..Default::default()
        }
    }

    pub fn record(&mut self, event: LinkEvent) {
        match &event {
            LinkEvent::Created { .. } => self.created += 1,
            LinkEvent::Conflict { .. } => self.conflicts += 1,
            LinkEvent::TargetCleared { .. } => {}
        }
        self.events.push(event);
    }

    /// Links placed during the run, in creation order
    pub fn links(&self) -> Vec<LinkEntry> {
        self.events
            .iter()
            .filter_map(|e| match e {
                LinkEvent::Created { link_path, source } => Some(LinkEntry {
                    link_name: link_path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    source: source.clone(),
                }),
                _ => None,
            })
            .collect()
    }

    pub fn target_cleared(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, LinkEvent::TargetCleared { .. }))
    }

    /// One-line totals for the end of text output
    pub fn summary_line(&self) -> String {
        let verb = if self.dry_run { "would be created" } else { "created" };
        format!(
            "{} link{} {}, {} conflict{}",
            self.created,
            if self.created == 1 { "" } else { "s" },
            verb,
            self.conflicts,
            if self.conflicts == 1 { "" } else { "s" }
        )
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
