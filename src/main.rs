use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};

mod config;
mod console;
mod error;
mod live_scores;
mod models;
mod scheduler;

use config::Config;
use live_scores::{ApiFootballClient, FootballDataSource};
use scheduler::SyncScheduler;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    if !config.has_api_key() {
        warn!("RAPIDAPI_KEY is not set: every fetch will fail as unauthorized");
    }

    let source: Arc<dyn FootballDataSource> = Arc::new(ApiFootballClient::new(
        config.api_key.as_deref(),
        &config.api_host,
        config.api_base_url.as_deref(),
        config.request_timeout(),
    )?);
    info!("Using {} at {}", source.name(), config.api_host);

    let mut scheduler = SyncScheduler::new(source, config.refresh_interval());
    scheduler.select_league(config.league.as_deref());
    scheduler.start()?;

    // Run the console renderer until the user quits or Ctrl-C
    tokio::select! {
        _ = console::run(scheduler.handle()) => {}
        res = tokio::signal::ctrl_c() => {
            if let Err(e) = res {
                warn!("Failed to listen for Ctrl-C: {}", e);
            }
        }
    }

    scheduler.stop();
    let last = scheduler.snapshot();
    info!(
        "Shutting down ({:?}): {} matches, {} leagues in last snapshot",
        scheduler.phase(),
        last.matches.len(),
        last.leagues.len()
    );
    Ok(())
}
