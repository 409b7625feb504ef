//! CLI argument parsing for lninclude

use crate::config::AggregatorConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for run events
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per event (default)
    Text,
    /// JSON report printed at the end of the run
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "lninclude")]
#[command(version)]
#[command(
    about = "Link headers from whitelisted subfolders into one flat include directory",
    long_about = None
)]
pub struct Cli {
    /// TOML file providing source_folder, target_folder and subfolders
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Root of the source tree to scan
    #[arg(short = 's', long = "source", value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Flat directory receiving the links (cleared on every run)
    #[arg(short = 't', long = "target", value_name = "DIR")]
    pub target: Option<PathBuf>,

    /// Subfolder of the source tree to include, relative to --source (repeatable)
    #[arg(short = 'i', long = "subfolder", value_name = "REL")]
    pub subfolders: Vec<String>,

    /// Keep the existing target contents instead of clearing them
    #[arg(long = "no-reset")]
    pub no_reset: bool,

    /// Show what would be linked without changing the filesystem
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug tracing on stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Configuration given directly on the command line
    pub fn overrides(&self) -> AggregatorConfig {
        AggregatorConfig {
            source_folder: self.source.clone(),
            target_folder: self.target.clone(),
            subfolders: self.subfolders.clone(),
        }
    }

    /// Load the config file (if any) and overlay command-line values
    pub fn aggregator_config(&self) -> anyhow::Result<AggregatorConfig> {
        let base = match &self.config {
            Some(path) => AggregatorConfig::from_file(path)?,
            None => AggregatorConfig::default(),
        };
        Ok(base.merged_with(self.overrides()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_paths_and_subfolders() {
        let cli = Cli::parse_from([
            "lninclude",
            "--source",
            "Utilities",
            "--target",
            "Utilities/lnInclude",
            "-i",
            "includeHeaders",
            "-i",
            "boundary",
        ]);
        assert_eq!(cli.source, Some(PathBuf::from("Utilities")));
        assert_eq!(cli.target, Some(PathBuf::from("Utilities/lnInclude")));
        assert_eq!(cli.subfolders, vec!["includeHeaders", "boundary"]);
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["lninclude"]);
        assert!(cli.config.is_none());
        assert!(cli.subfolders.is_empty());
        assert!(!cli.no_reset);
        assert!(!cli.dry_run);
        assert!(!cli.debug);
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from(["lninclude", "--no-reset", "-n", "--format", "json", "--debug"]);
        assert!(cli.no_reset);
        assert!(cli.dry_run);
        assert!(cli.debug);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["lninclude", "--format", "xml"]).is_err());
    }

    #[test]
    fn test_overrides_without_config_file() {
        let cli = Cli::parse_from(["lninclude", "-s", "/src", "-t", "/out", "-i", "inc"]);
        let config = cli.aggregator_config().unwrap();
        assert_eq!(config, AggregatorConfig::new("/src", "/out", ["inc"]));
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("lninclude.toml");
        std::fs::write(
            &file,
            "source_folder = \"/from/file\"\ntarget_folder = \"/file/out\"\nsubfolders = [\"a\"]\n",
        )
        .unwrap();

        let cli = Cli::parse_from([
            "lninclude".into(),
            "--config".into(),
            file.into_os_string(),
            "--target".into(),
            "/flag/out".into(),
        ]);
        let config = cli.aggregator_config().unwrap();
        assert_eq!(config.source_folder, Some(PathBuf::from("/from/file")));
        assert_eq!(config.target_folder, Some(PathBuf::from("/flag/out")));
        assert_eq!(config.subfolders, vec!["a"]);
    }
}
