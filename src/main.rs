//! DustVision host runner.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                   │
//! │                                                          │
//! │  HostClock    SeededNoise    LogEventSink  JsonConfigStore│
//! │  (ClockPort)  (NoiseSource)  (EventSink)   (ConfigPort)   │
//! │                                                          │
//! │  ─────────────── Port Trait Boundary ─────────────────   │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │          AppService (pure logic)                   │  │
//! │  │  gates · ESM · TFP · session                        │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `dustvision [CONFIG.json] [SECONDS]`.  Runs a ~60 Hz frame loop
//! for the given duration and prints the final dashboard snapshot as JSON.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use log::info;

use dustvision::adapters::config_file::JsonConfigStore;
use dustvision::adapters::log_sink::LogEventSink;
use dustvision::adapters::noise::SeededNoise;
use dustvision::adapters::time::HostClock;
use dustvision::app::ports::{ClockPort, ConfigPort};
use dustvision::app::service::AppService;

const DEFAULT_CONFIG_PATH: &str = "dustvision.json";
const DEFAULT_RUN_SECS: u64 = 30;
const FRAME_PERIOD: Duration = Duration::from_millis(16);

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_owned());
    let run_secs = match args.next() {
        Some(s) => s
            .parse::<u64>()
            .with_context(|| format!("invalid duration in seconds: {s}"))?,
        None => DEFAULT_RUN_SECS,
    };

    let store = JsonConfigStore::new(&config_path);
    let config = store
        .load()
        .with_context(|| format!("loading {}", store.path().display()))?;

    let seed = config
        .rng_seed
        .unwrap_or_else(|| Utc::now().timestamp_millis().unsigned_abs());
    let noise = SeededNoise::new(seed);
    info!(
        "DustVision starting: seed={} duration={run_secs}s",
        noise.seed()
    );

    let clock = HostClock::new();
    let mut sink = LogEventSink::new();
    let mut app = AppService::new(config, noise, &clock);
    app.start(&mut sink);

    let deadline_ms = run_secs.saturating_mul(1_000);
    while clock.now_ms() < deadline_ms {
        app.frame(&clock, &mut sink);
        std::thread::sleep(FRAME_PERIOD);
    }

    let snapshot = app.snapshot();
    info!(
        "Run finished: {} ticks, {} syncs, {} alerts, final state {}",
        snapshot.stats.ticks,
        snapshot.stats.syncs,
        snapshot.stats.alerts_raised,
        snapshot.status.state
    );
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
