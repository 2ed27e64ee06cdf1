use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use dining_status::{
    Clock, LocationRegistry, RefreshReport, RetryPolicy, SystemClock, config::AppConfig,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "dining-status")]
#[command(about = "Track which dining locations are open - daemon or one-shot mode")]
struct Args {
    /// Evaluate once, print the report as JSON and exit
    #[arg(long)]
    once: bool,

    /// Locations file (overrides locations.path)
    #[arg(long)]
    locations: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::builder()
        .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
        .parse_lossy("dining_status=debug");

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let path = args.locations.unwrap_or(config.locations.path);

    let (mut registry, summary) = LocationRegistry::from_path(&path)?;
    if summary.skipped_count() + summary.replaced_count() > 0 {
        tracing::warn!(
            "{} of {} records in {} were skipped, {} replaced by duplicates",
            summary.skipped_count(),
            summary.loaded + summary.skipped_count() + summary.replaced_count(),
            path.display(),
            summary.replaced_count()
        );
    }

    let retry = RetryPolicy::from(&config.telemetry);
    tracing::info!(
        "Sensor retry policy: {} attempt(s), {} ms apart",
        retry.max_attempts,
        retry.delay.as_millis()
    );

    let clock = SystemClock;

    if args.once {
        let report = registry.refresh_with_clock(&clock);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    run_daemon(rt, registry, &clock, config.refresh.interval_secs)
}

/// Re-evaluate every location on a fixed interval.
fn run_daemon(
    rt: tokio::runtime::Runtime,
    mut registry: LocationRegistry,
    clock: &dyn Clock,
    interval_secs: u64,
) -> Result<()> {
    rt.block_on(async {
        tracing::info!("Starting refresh loop with interval: {} seconds", interval_secs);

        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let report = registry.refresh_with_clock(clock);
                    log_report(&report);
                }
                result = &mut shutdown => {
                    result.context("Failed to listen for shutdown signal")?;
                    tracing::info!("Shutting down");
                    return Ok::<_, anyhow::Error>(());
                }
            }
        }
    })
}

fn log_report(report: &RefreshReport) {
    let open = report.open_count();
    tracing::info!("{} open, {} closed", open, report.statuses.len() - open);
    if report.failed > 0 {
        tracing::warn!("{} locations have unreadable hours", report.failed);
    }
}
