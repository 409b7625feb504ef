//! Include aggregation: walk the source tree and link whitelisted files
//!
//! The walk is a single pre-order pass over `source_folder`. Inside each
//! directory, files come before subdirectories and siblings are sorted by
//! name, so which of two same-named headers wins is stable across runs.
//!
//! Eligibility is decided per directory: a file is linked when its parent
//! directory is an include directory or nested under one. Descent never
//! stops at a non-eligible directory, because a whitelisted folder can sit
//! below it.

use crate::config::ResolvedConfig;
use crate::error::{AggregateError, Result};
use crate::report::{AggregateReport, LinkEvent};
use crate::target;
use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// How the target directory is treated before populating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetMode {
    /// Delete and recreate the target (default)
    #[default]
    Reset,
    /// Keep existing entries; they block same-named links
    Merge,
}

/// Links whitelisted files of a source tree into one flat directory
#[derive(Debug, Clone)]
pub struct Aggregator {
    config: ResolvedConfig,
    dry_run: bool,
}

/// Per-run bookkeeping for the populate pass
struct PopulateState {
    claimed: HashSet<OsString>,
    consult_disk: bool,
    /// Target as it appears during the walk (canonical once it exists)
    prune: Vec<PathBuf>,
}

impl Aggregator {
    pub fn new(config: ResolvedConfig) -> Self {
        Self {
            config,
            dry_run: false,
        }
    }

    /// Report what would happen without touching the filesystem
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Prepare the target according to `mode`, then populate it.
    ///
    /// `on_event` sees every event as it happens, so a caller can stream
    /// output even if the run aborts part way.
    pub fn run<F>(&self, mode: TargetMode, mut on_event: F) -> Result<AggregateReport>
    where
        F: FnMut(&LinkEvent),
    {
        let mut report = AggregateReport::new(
            &self.config.source_folder,
            &self.config.target_folder,
            self.dry_run,
        );

        let consult_disk = match mode {
            TargetMode::Reset => {
                if let Some(event) = self.reset_target()? {
                    emit(&mut report, &mut on_event, event);
                }
                // After a real reset the disk check is trivially empty; a
                // dry-run reset must ignore what is still there.
                !self.dry_run
            }
            TargetMode::Merge => {
                if !self.dry_run {
                    target::prepare(&self.config.target_folder)?;
                }
                true
            }
        };

        self.populate_into(&mut report, &mut on_event, consult_disk)?;
        Ok(report)
    }

    /// Destructive step: clear and recreate the target directory.
    ///
    /// Returns the `TargetCleared` event when something was removed. In a
    /// dry run nothing is removed, but the event is still reported if the
    /// target exists, and a target that reset would refuse still fails.
    pub fn reset_target(&self) -> Result<Option<LinkEvent>> {
        let path = &self.config.target_folder;
        let cleared = if self.dry_run {
            target::check_resettable(path)?.is_some()
        } else {
            target::reset(path)?
        };

        if cleared {
            tracing::info!(path = %path.display(), "cleared target folder");
            Ok(Some(LinkEvent::TargetCleared { path: path.clone() }))
        } else {
            Ok(None)
        }
    }

    /// Populate an already prepared target without clearing it.
    ///
    /// Existing entries in the target count as taken names.
    pub fn populate<F>(&self, mut on_event: F) -> Result<AggregateReport>
    where
        F: FnMut(&LinkEvent),
    {
        let mut report = AggregateReport::new(
            &self.config.source_folder,
            &self.config.target_folder,
            self.dry_run,
        );
        self.populate_into(&mut report, &mut on_event, true)?;
        Ok(report)
    }

    fn populate_into(
        &self,
        report: &mut AggregateReport,
        on_event: &mut dyn FnMut(&LinkEvent),
        consult_disk: bool,
    ) -> Result<()> {
        let source = &self.config.source_folder;
        let target = &self.config.target_folder;

        if self.config.include_set.is_empty() {
            tracing::warn!("include set is empty, no links will be created");
        }

        let mut prune = vec![target.clone()];
        if let Ok(real) = fs::canonicalize(target) {
            if &real != target {
                prune.push(real);
            }
        }

        let mut state = PopulateState {
            claimed: HashSet::new(),
            consult_disk,
            prune,
        };

        let mut walker = WalkDir::new(source)
            .follow_links(false)
            .sort_by(|a, b| {
                a.file_type()
                    .is_dir()
                    .cmp(&b.file_type().is_dir())
                    .then_with(|| a.file_name().cmp(b.file_name()))
            })
            .into_iter();

        while let Some(entry) = walker.next() {
            let entry = entry.map_err(|e| {
                let path = e.path().map_or_else(|| source.clone(), Path::to_path_buf);
                AggregateError::Traversal { path, source: e }
            })?;

            if entry.file_type().is_dir() {
                if state.prune.iter().any(|p| p == entry.path()) {
                    tracing::debug!(dir = %entry.path().display(), "skipping target folder");
                    walker.skip_current_dir();
                }
                continue;
            }

            let Some(parent) = entry.path().parent() else {
                continue;
            };
            if !self.config.include_set.contains(parent) {
                tracing::trace!(file = %entry.path().display(), "outside include set");
                continue;
            }
            if !is_linkable(&entry) {
                tracing::debug!(file = %entry.path().display(), "not a regular file, skipped");
                continue;
            }

            let event = self.place(entry.path(), entry.file_name(), &mut state)?;
            emit(report, on_event, event);
        }

        Ok(())
    }

    /// Link one file into the target, first writer wins
    fn place(&self, source: &Path, name: &OsStr, state: &mut PopulateState) -> Result<LinkEvent> {
        let target = &self.config.target_folder;
        let taken = state.claimed.contains(name)
            || (state.consult_disk && target::entry_exists(target, name));

        if taken {
            let link_name = name.to_string_lossy().into_owned();
            tracing::debug!(
                link = %link_name,
                source = %source.display(),
                "link name already taken"
            );
            return Ok(LinkEvent::Conflict {
                link_name,
                source: source.to_path_buf(),
            });
        }

        let link_path = target.join(name);
        if !self.dry_run {
            symlink(source, &link_path).map_err(|e| AggregateError::Link {
                link: link_path.clone(),
                target: source.to_path_buf(),
                source: e,
            })?;
        }
        state.claimed.insert(name.to_os_string());

        tracing::info!(
            link = %link_path.display(),
            source = %source.display(),
            "created symlink"
        );
        Ok(LinkEvent::Created {
            link_path,
            source: source.to_path_buf(),
        })
    }
}

fn emit(report: &mut AggregateReport, on_event: &mut dyn FnMut(&LinkEvent), event: LinkEvent) {
    on_event(&event);
    report.record(event);
}

/// Regular files, or symlinks that resolve to one
fn is_linkable(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    if file_type.is_file() {
        return true;
    }
    file_type.is_symlink()
        && fs::metadata(entry.path())
            .map(|m| m.is_file())
            .unwrap_or(false)
}
