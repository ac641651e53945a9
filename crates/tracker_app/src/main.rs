mod config;
mod dates;
mod logging;
mod render;
mod shell;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use tracker_core::TrackerState;
use tracker_engine::{ReqwestGateway, SyncEngine};
use tracker_logging::tracker_info;

use config::{TrackerConfig, API_URL_ENV};
use logging::LogDestination;

/// Keep track of job applications from the terminal.
#[derive(Debug, Parser)]
#[command(name = "job-tracker", version)]
struct Cli {
    /// Base address of the job API, e.g. http://localhost:5000/api.
    #[arg(long)]
    api_url: Option<String>,

    /// Settings file (RON). Defaults to ./tracker.ron when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where log output goes.
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    log: LogDestination,

    /// Log debug detail.
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::initialize(cli.log, level);

    let config = TrackerConfig::load(cli.config.as_deref())?
        .with_overrides(std::env::var(API_URL_ENV).ok(), cli.api_url);
    config.validate()?;

    let gateway = ReqwestGateway::new(&config.gateway_settings())
        .with_context(|| format!("cannot use API address {}", config.api_url))?;
    tracker_info!("Using job API at {}", gateway.jobs_url());

    let state = TrackerState::new().with_notification_duration(config.notification_duration());
    let engine = SyncEngine::with_state(Arc::new(gateway), state);

    engine.load().await;
    shell::run(&engine).await
}
