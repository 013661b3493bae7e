//! Telemetry & forecast pipeline.
//!
//! Consumes at most one [`SimulationSample`] per second and owns every
//! display-facing window: PM10 history, forecast trajectory, event log and
//! the virtual node registry.  Nothing here writes back into the
//! environment machine.
//!
//! Sync order:
//!
//! ```text
//!  sample ──▶ forecast ──▶ trajectory ──▶ alert edge ──▶ history ──▶ node jitter ──▶ log
//! ```

pub mod alerts;
pub mod forecast;
pub mod nodes;

use chrono::{DateTime, Duration, Utc};
use heapless::Deque;
use log::{debug, info, warn};
use serde::Serialize;

use crate::app::ports::NoiseSource;
use crate::config::SimConfig;
use crate::environment::SimulationSample;

use alerts::{AlertEdge, AlertMonitor, EventLog, LogEntry, LogKind};
use forecast::Trajectory;
use nodes::{NodeError, NodeRegistry, SensorNode};

/// Maximum points kept in the PM10 history window.
pub const HISTORY_CAPACITY: usize = 40;

const BOOT_MESSAGE: &str = "System Online. Connected to Digital Twin.";
const STABILIZED_MESSAGE: &str = "Mitigation Complete. Air Quality Stabilized.";

/// A monotonic instant paired with the wall-clock time used for labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub ms: u64,
    pub wall: DateTime<Utc>,
}

impl Timestamp {
    pub fn new(ms: u64, wall: DateTime<Utc>) -> Self {
        Self { ms, wall }
    }

    /// `HH:MM:SS`.
    pub fn label(&self) -> String {
        self.wall.format("%H:%M:%S").to_string()
    }

    pub fn plus_minutes(&self, minutes: i64) -> Self {
        Self {
            ms: self
                .ms
                .saturating_add(u64::try_from(minutes).unwrap_or(0).saturating_mul(60_000)),
            wall: self.wall + Duration::minutes(minutes),
        }
    }
}

/// Push onto a bounded deque, evicting the oldest entry when full.
pub(crate) fn push_evicting<T, const N: usize>(window: &mut Deque<T, N>, item: T) {
    if window.is_full() {
        window.pop_front();
    }
    let pushed = window.push_back(item).is_ok();
    debug_assert!(pushed, "bounded window overflow");
}

/// One entry of the PM10 history window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryPoint {
    pub time: String,
    pub pm10: f32,
    pub forecast: f32,
}

/// Result of one sync.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub forecast: f32,
    /// ALERT or SUCCESS entry appended by this sync, if any.
    pub log_entry: Option<LogEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    Applied(SyncReport),
    /// Sample came from another session and was ignored.
    Stale { sample_epoch: u64, pipeline_epoch: u64 },
    /// Sync gate closed; the sample was not consumed.
    Throttled,
}

pub struct TelemetryPipeline {
    epoch: u64,
    history: Deque<TelemetryPoint, HISTORY_CAPACITY>,
    trajectory: Trajectory,
    log: EventLog,
    alerts: AlertMonitor,
    nodes: NodeRegistry,
}

impl TelemetryPipeline {
    /// Fresh pipeline for `epoch`, seeded with the site nodes and the boot
    /// log entry.
    pub fn new(epoch: u64, config: &SimConfig, at: &Timestamp) -> Self {
        let mut pipeline = Self {
            epoch,
            history: Deque::new(),
            trajectory: Trajectory::new(),
            log: EventLog::new(),
            alerts: AlertMonitor::new(config.alert_threshold_pm10, config.alert_cooldown_ms),
            nodes: NodeRegistry::with_site_defaults(),
        };
        pipeline.record(LogKind::Success, BOOT_MESSAGE, at);
        pipeline
    }

    /// Consume one sample.  Samples from another epoch are rejected
    /// without touching any window.
    pub fn sync(
        &mut self,
        sample: &SimulationSample,
        at: &Timestamp,
        noise: &mut impl NoiseSource,
    ) -> SyncOutcome {
        if sample.epoch != self.epoch {
            warn!(
                "Dropping stale sample from epoch {} (current {})",
                sample.epoch, self.epoch
            );
            return SyncOutcome::Stale {
                sample_epoch: sample.epoch,
                pipeline_epoch: self.epoch,
            };
        }

        let forecast = forecast::short_term_forecast(sample.pm10, noise);
        self.trajectory =
            forecast::project_trajectory(forecast, sample.wind.angle_rad(), at, noise);

        let message = match self.alerts.evaluate(forecast, at.ms) {
            Some(AlertEdge::Raised) => {
                info!("Dust alert: forecast {forecast:.1} ug/m3");
                Some((
                    LogKind::Alert,
                    format!("PREDICTION: High Dust Inbound ({forecast:.0} µg/m³)"),
                ))
            }
            Some(AlertEdge::Stabilized) => {
                info!("Dust alert cleared at forecast {forecast:.1}");
                Some((LogKind::Success, STABILIZED_MESSAGE.to_owned()))
            }
            None => None,
        };

        push_evicting(
            &mut self.history,
            TelemetryPoint {
                time: at.label(),
                pm10: sample.pm10,
                forecast,
            },
        );

        self.nodes.apply_jitter(sample.pm10, noise);

        let log_entry = message.map(|(kind, text)| self.log.append(at.label(), kind, text));
        debug!(
            "Sync epoch={} pm10={:.1} forecast={:.1} state={}",
            self.epoch, sample.pm10, forecast, sample.state
        );
        SyncOutcome::Applied(SyncReport {
            forecast,
            log_entry,
        })
    }

    /// Append an entry stamped with `at`.
    pub fn record(&mut self, kind: LogKind, message: &str, at: &Timestamp) -> LogEntry {
        self.log.append(at.label(), kind, message.to_owned())
    }

    /// Register a node and log the deployment.
    pub fn deploy_sensor(
        &mut self,
        id: &str,
        location: &str,
        at: &Timestamp,
        noise: &mut impl NoiseSource,
    ) -> Result<(SensorNode, LogEntry), NodeError> {
        let node = self.nodes.deploy(id, location, noise)?.clone();
        let entry = self.record(
            LogKind::Action,
            &format!("Deployed sensor {} at {}", node.id, node.location),
            at,
        );
        Ok((node, entry))
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Oldest first.
    pub fn history(&self) -> impl Iterator<Item = &TelemetryPoint> {
        self.history.iter()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Empty until the first sync, then exactly 16 points.
    pub fn trajectory(&self) -> &[forecast::ForecastPoint] {
        &self.trajectory
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn nodes(&self) -> &NodeRegistry {
        &self.nodes
    }

    pub fn is_hazardous(&self) -> bool {
        self.alerts.is_hazardous()
    }
}
