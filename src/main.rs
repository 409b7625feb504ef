use anyhow::{Context, Result};
use clap::Parser;
use lninclude::cli::{Cli, OutputFormat};
use lninclude::{Aggregator, TargetMode};
use tracing_subscriber::EnvFilter;

/// Initialize the stderr tracing subscriber.
///
/// Warnings are always shown; `--debug` raises the level to TRACE.
fn init_tracing(debug: bool) {
    let level = if debug {
        tracing::Level::TRACE
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .with_target(debug)
        .without_time()
        .init();
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let config = args
        .aggregator_config()?
        .validate()
        .context("Cannot start aggregation")?;

    tracing::debug!(
        source_folder = %config.source_folder.display(),
        target_folder = %config.target_folder.display(),
        subfolders = ?config.subfolders,
        "resolved configuration"
    );

    let mode = if args.no_reset {
        TargetMode::Merge
    } else {
        TargetMode::Reset
    };
    let aggregator = Aggregator::new(config).with_dry_run(args.dry_run);

    match args.format {
        OutputFormat::Text => {
            let dry_run = args.dry_run;
            let report = aggregator.run(mode, |event| println!("{}", event.to_line(dry_run)))?;
            println!("{}", report.summary_line());
        }
        OutputFormat::Json => {
            let report = aggregator.run(mode, |_| {})?;
            println!("{}", report.to_json()?);
        }
    }

    Ok(())
}
