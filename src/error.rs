//! Error taxonomy for include aggregation
//!
//! Every variant except `InvalidConfig` carries the offending path so the
//! caller can report where the run aborted. Name collisions are not errors;
//! they surface as `LinkEvent::Conflict` and the run continues.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort an aggregation run
#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to set up {}: {source}", path.display())]
    Setup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to traverse {}: {source}", path.display())]
    Traversal {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to create symlink {} -> {}: {source}", link.display(), target.display())]
    Link {
        link: PathBuf,
        target: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AggregateError {
    /// Path the error refers to, if any
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            AggregateError::InvalidConfig(_) => None,
            AggregateError::Setup { path, .. } | AggregateError::Traversal { path, .. } => {
                Some(path)
            }
            AggregateError::Link { link, .. } => Some(link),
        }
    }

    pub(crate) fn setup(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AggregateError::Setup {
            path: path.into(),
            source,
        }
    }
}

/// Result type for aggregation operations
pub type Result<T> = std::result::Result<T, AggregateError>;
