//! lninclude - flat include directories from nested source trees
//!
//! Walks a source tree and places one symbolic link per file found under a
//! whitelist of subfolders into a single target directory, the way an
//! `lnInclude` directory feeds a compiler's include search path.
//!
//! ```no_run
//! use lninclude::{Aggregator, AggregatorConfig, TargetMode};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = AggregatorConfig::new("Utilities", "Utilities/lnInclude", ["includeHeaders"])
//!     .validate()?;
//! let report = Aggregator::new(config).run(TargetMode::Reset, |event| println!("{}", event))?;
//! println!("{}", report.summary_line());
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod cli;
pub mod config;
pub mod error;
pub mod include_set;
pub mod paths;
pub mod report;
pub mod target;

pub use crate::aggregator::{Aggregator, TargetMode};
pub use crate::config::{AggregatorConfig, ResolvedConfig};
pub use crate::error::{AggregateError, Result};
pub use crate::include_set::IncludeSet;
pub use crate::report::{AggregateReport, LinkEntry, LinkEvent};
