//! Lobby status poller
//!
//! Usage: cargo run --bin status_poller -- --config config/sources.toml --once
//!
//! Polls every enabled source on an interval and logs each snapshot. With
//! `--once` the snapshots are printed as pretty JSON and the process exits.

use adapter_service::{poll_all, HttpFetcher, PollReport};
use anyhow::{bail, Context, Result};
use clap::Parser;
use status_config::PollerConfig;
use std::path::PathBuf;
use std::time::Duration;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(name = "status_poller")]
struct Args {
    /// Source configuration file (defaults to the built-in title presets)
    #[clap(long)]
    config: Option<PathBuf>,

    /// Poll once, print snapshots as JSON and exit
    #[clap(long)]
    once: bool,

    /// Override the configured poll interval
    #[clap(long)]
    interval_secs: Option<u64>,

    /// Only poll these source ids (repeatable)
    #[clap(long = "source")]
    sources: Vec<String>,

    /// Default log filter; RUST_LOG takes precedence
    #[clap(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[clap(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .context("Invalid log filter")?;
    if args.json_logs {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let mut config = match &args.config {
        Some(path) => PollerConfig::load(path)?,
        None => PollerConfig::from_env()?,
    };
    if let Some(secs) = args.interval_secs {
        config.poll_interval_ms = interval_override_ms(secs)?;
    }

    let sources = config.active_sources(&args.sources);
    if sources.is_empty() {
        bail!("No enabled sources match {:?}", args.sources);
    }

    let http = HttpFetcher::new(config.request_timeout())?;
    let cancel = CancellationToken::new();

    if args.once {
        let reports = poll_all(&sources, &http, &cancel).await;
        log_failures(&reports);
        let snapshots: Vec<_> = reports.into_iter().map(|report| report.snapshot).collect();
        println!("{}", serde_json::to_string_pretty(&snapshots)?);
        return Ok(());
    }

    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            shutdown.cancel();
        }
    });

    info!(
        "Polling {} sources every {:?}, press Ctrl+C to stop",
        sources.len(),
        config.poll_interval()
    );
    run_loop(&sources, &http, &cancel, config.poll_interval()).await;

    info!("Status poller stopped");
    Ok(())
}

/// Convert `--interval-secs` to milliseconds
fn interval_override_ms(secs: u64) -> Result<u64> {
    if secs == 0 {
        bail!("--interval-secs must be greater than 0");
    }
    secs.checked_mul(1000)
        .with_context(|| format!("--interval-secs {} is too large", secs))
}

async fn run_loop(
    sources: &[status_config::SourceConfig],
    http: &HttpFetcher,
    cancel: &CancellationToken,
    period: Duration,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        let reports = poll_all(sources, http, cancel).await;
        if cancel.is_cancelled() {
            break;
        }
        log_failures(&reports);
    }
}

fn log_failures(reports: &[PollReport]) {
    for report in reports {
        match &report.error {
            Some(e) if e.is_cancelled() => {
                warn!("{}: poll cancelled", report.snapshot.source)
            }
            Some(e) => error!(
                "{}: serving empty snapshot at {}: {}",
                report.snapshot.source,
                report.polled_at.to_rfc3339(),
                e
            ),
            None => {}
        }
    }
}
