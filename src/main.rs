//! tripdeck - replay driver for the itinerary app controller
//!
//! Reads a JSONL script of UI events, applies it to the controller and
//! writes one state snapshot per event.
//!
//! Module structure:
//! - `domain/` - Screens, trips, bookings
//! - `services/` - Navigator, wizard, controller
//! - `io/` - Scripts, snapshots, egress
//! - `infra/` - Config, metrics

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;
use tripdeck::infra::{Config, Metrics};
use tripdeck::io::{load_script, run_realtime, run_virtual, SnapshotWriter};
use tripdeck::services::extractor::TemplateExtractor;
use tripdeck::services::{AppController, ManualClock, SystemClock};

/// Replay UI events against the itinerary controller
#[derive(Parser, Debug)]
#[command(name = "tripdeck", version, about)]
struct Args {
    /// Path to TOML configuration file (default: $CONFIG_FILE, then config/dev.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// JSONL script of UI events
    #[arg(short, long)]
    script: PathBuf,

    /// Run waits on the wall clock instead of virtual time
    #[arg(long)]
    realtime: bool,

    /// Seed for the screenshot template picker (overrides config)
    #[arg(long)]
    seed: Option<u64>,

    /// Write snapshots to this file instead of stdout (overrides config)
    #[arg(short, long)]
    out: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!(version = %env!("CARGO_PKG_VERSION"), git = %env!("GIT_HASH"), "tripdeck starting");

    let args = Args::parse();

    let config_path = Config::resolve_config_path(args.config.as_deref());
    let mut config = Config::load_from_path(&config_path);
    if let Some(seed) = args.seed {
        config = config.with_extraction_seed(seed);
    }
    if let Some(out) = &args.out {
        config = config.with_snapshots_file(out);
    }

    info!(
        config_file = %config.config_file(),
        transition_delay_ms = %config.transition_delay_ms(),
        extraction_delay_ms = %config.extraction_delay_ms(),
        refresh_delay_ms = %config.refresh_delay_ms(),
        seed = ?config.extraction_seed(),
        realtime = %args.realtime,
        "config_loaded"
    );

    let events = load_script(&args.script)?;
    info!(script = %args.script.display(), events = %events.len(), "script_loaded");

    let metrics = Arc::new(Metrics::new());
    let extractor = Box::new(TemplateExtractor::new(config.extraction_seed()));
    let mut writer = SnapshotWriter::new(config.snapshots_file());

    let report = if args.realtime {
        // Periodic metrics while waits run on the wall clock
        let metrics_clone = metrics.clone();
        let metrics_interval = config.metrics_interval_secs().max(1);
        let reporter = tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(std::time::Duration::from_secs(metrics_interval));
            interval.tick().await;
            loop {
                interval.tick().await;
                metrics_clone.report().log();
            }
        });

        let clock = Arc::new(SystemClock::new());
        let mut app = AppController::new(config, clock, extractor, metrics.clone());
        let report = run_realtime(&mut app, &events, &mut writer).await;
        reporter.abort();
        report
    } else {
        let clock = ManualClock::new();
        let mut app = AppController::new(config, Arc::new(clock.clone()), extractor, metrics.clone());
        run_virtual(&mut app, &clock, &events, &mut writer)
    };

    metrics.report().log();
    info!(
        applied = %report.applied,
        rejected = %report.rejected,
        snapshots = %writer.written(),
        "tripdeck replay complete"
    );
    Ok(())
}
