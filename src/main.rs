use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use trace_uploader::app::{App, RunOutcome};
use trace_uploader::config::Config;
use trace_uploader::ingest::{CompanionCli, DryRun, Ingestor};
use trace_uploader::ui::console::Console;
use trace_uploader::ui::drives::HostVolumes;

/// Pick a trace folder on a removable drive, patch its metadata and
/// hand it to the companion CLI for ingestion.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "TRACE_UPLOADER_CONFIG")]
    config: Option<PathBuf>,

    /// Year assumed for log timestamps (overrides the config file)
    #[arg(long)]
    year: Option<i32>,

    /// Patch metadata but do not launch ingestion
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    // Initialize logging; stdout belongs to the menus
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("trace_uploader=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let mut config =
        Config::load_or_default(args.config.as_deref()).context("Cannot load configuration")?;
    if let Some(year) = args.year {
        config.assumed_year = year;
    }
    tracing::info!(
        "trace-uploader starting (assumed year {}, extension match {:?})",
        config.assumed_year,
        config.extension_match
    );

    let volumes = HostVolumes::new(config.system_volume.as_deref());
    let mut ingestor: Box<dyn Ingestor> = if args.dry_run {
        Box::new(DryRun)
    } else {
        Box::new(CompanionCli::new(config.ingest.clone()))
    };
    let mut console = Console::stdio();

    let outcome = App::new(&config, &volumes, ingestor.as_mut()).run(&mut console)?;
    match outcome {
        RunOutcome::HandedOff(summary) => {
            tracing::info!("Handed off {}", summary.folder.display());
        }
        RunOutcome::NothingSelected => tracing::info!("No trace folder selected, exiting"),
        RunOutcome::Aborted => tracing::info!("Aborted by operator"),
    }

    Ok(())
}
