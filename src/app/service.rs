//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the configuration, the noise source and the current
//! [`Session`].  It exposes a clean, host-agnostic API.  Time comes in
//! through [`ClockPort`] on every call and everything outbound leaves
//! through [`EventSink`], so the whole service runs under test with mock
//! adapters.
//!
//! ```text
//!  ClockPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                │          AppService           │
//!  AppCommand ──▶│  gates · ESM · TFP · session  │ ──▶ snapshot()
//!                └──────────────────────────────┘
//! ```

use log::{debug, info};

use crate::config::SimConfig;
use crate::diagnostics::SessionStats;
use crate::environment::SimulationSample;
use crate::error::Result;
use crate::telemetry::alerts::{LogEntry, LogKind};
use crate::telemetry::{SyncOutcome, TelemetryPipeline, Timestamp};

use super::commands::AppCommand;
use super::events::{AppEvent, TelemetryUpdate};
use super::ports::{ClockPort, EventSink, NoiseSource};
use super::session::Session;
use super::snapshot::{DashboardSnapshot, StatusView};

/// What a single host frame did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The service is paused; the frame was ignored.
    Paused,
    /// Too soon after the previous tick; dropped.
    Dropped,
    /// An ESM tick ran; `synced` tells whether the pipeline ran too.
    Ticked { synced: bool },
}

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService<N: NoiseSource> {
    config: SimConfig,
    noise: N,
    session: Session,
    paused: bool,
}

impl<N: NoiseSource> AppService<N> {
    /// Construct the service with a first session (epoch 1) anchored at
    /// the clock's current time.
    ///
    /// Does **not** announce anything; call [`start`](Self::start) next.
    pub fn new(config: SimConfig, noise: N, clock: &impl ClockPort) -> Self {
        let session = Session::new(1, &config, now(clock));
        Self {
            config,
            noise,
            session,
            paused: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Announce the running session.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        let state = self.session.esm.state();
        sink.emit(&AppEvent::Started {
            epoch: self.session.epoch,
            state,
        });
        info!(
            "AppService started: epoch {} in {}",
            self.session.epoch, state
        );
    }

    // ── Per-frame orchestration ───────────────────────────────

    /// Offer one host frame.  At most one ESM tick and one sync run.
    pub fn frame(&mut self, clock: &impl ClockPort, sink: &mut impl EventSink) -> FrameOutcome {
        if self.paused {
            return FrameOutcome::Paused;
        }

        let now_ms = clock.now_ms();
        let accepted = self.session.tick_gate.poll(now_ms);
        self.session.stats.record_frame(accepted);
        if !accepted {
            return FrameOutcome::Dropped;
        }

        // 1. ESM tick
        let prev_state = self.session.esm.state();
        let sample = self.session.esm.tick(&mut self.noise);
        self.session.latest = Some(sample);
        if sample.state != prev_state {
            sink.emit(&AppEvent::StateChanged {
                from: prev_state,
                to: sample.state,
            });
        }

        // 2. Sync, gated separately and only on accepted ticks
        let synced = self.session.sync_gate.poll(now_ms);
        if synced {
            let at = Timestamp::new(now_ms, clock.wall_clock());
            self.sync_sample(&sample, &at, sink);
        }
        FrameOutcome::Ticked { synced }
    }

    /// Deliver a sample to the pipeline outside the frame loop, e.g. from
    /// a deferred callback.  Samples from a previous session are rejected.
    ///
    /// Current-session samples share the sync gate with [`frame`](Self::frame),
    /// so at most one sync per interval reaches the pipeline.
    pub fn deliver_sample(
        &mut self,
        sample: &SimulationSample,
        clock: &impl ClockPort,
        sink: &mut impl EventSink,
    ) -> SyncOutcome {
        let now_ms = clock.now_ms();
        if sample.epoch == self.session.epoch && !self.session.sync_gate.poll(now_ms) {
            debug!("Deferred sample at {now_ms} ms throttled by sync gate");
            return SyncOutcome::Throttled;
        }
        let at = Timestamp::new(now_ms, clock.wall_clock());
        self.sync_sample(sample, &at, sink)
    }

    fn sync_sample(
        &mut self,
        sample: &SimulationSample,
        at: &Timestamp,
        sink: &mut impl EventSink,
    ) -> SyncOutcome {
        let outcome = self.session.pipeline.sync(sample, at, &mut self.noise);
        match &outcome {
            SyncOutcome::Applied(report) => {
                self.session.stats.syncs += 1;
                sink.emit(&AppEvent::Telemetry(TelemetryUpdate {
                    epoch: sample.epoch,
                    pm10: sample.pm10,
                    predicted_pm25: sample.predicted_pm25,
                    state: sample.state,
                    wind: sample.wind,
                }));
                if let Some(entry) = &report.log_entry {
                    if entry.kind == LogKind::Alert {
                        self.session.stats.alerts_raised += 1;
                    }
                    sink.emit(&AppEvent::Log(entry.clone()));
                }
            }
            SyncOutcome::Stale { .. } => {
                self.session.stats.stale_samples += 1;
            }
            SyncOutcome::Throttled => {}
        }
        outcome
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command.  Only deploy requests can fail.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        clock: &impl ClockPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        match cmd {
            AppCommand::DeploySensor { id, location } => {
                let at = now(clock);
                let (_, entry) =
                    self.session
                        .pipeline
                        .deploy_sensor(&id, &location, &at, &mut self.noise)?;
                sink.emit(&AppEvent::Log(entry));
            }
            AppCommand::Restart => self.restart(clock, sink),
            AppCommand::Pause => {
                if !self.paused {
                    self.paused = true;
                    let entry = self.record(LogKind::Info, "Simulation paused.", clock);
                    sink.emit(&AppEvent::Paused);
                    sink.emit(&AppEvent::Log(entry));
                    info!("Simulation paused (epoch {})", self.session.epoch);
                }
            }
            AppCommand::Resume => {
                if self.paused {
                    self.paused = false;
                    self.session.rearm_gates(clock.now_ms());
                    let entry = self.record(LogKind::Info, "Simulation resumed.", clock);
                    sink.emit(&AppEvent::Resumed);
                    sink.emit(&AppEvent::Log(entry));
                    info!("Simulation resumed (epoch {})", self.session.epoch);
                }
            }
        }
        Ok(())
    }

    /// Discard the session and start epoch + 1.  The noise source carries
    /// on; it is not reseeded.
    fn restart(&mut self, clock: &impl ClockPort, sink: &mut impl EventSink) {
        let epoch = self.session.epoch + 1;
        let old = core::mem::replace(
            &mut self.session,
            Session::new(epoch, &self.config, now(clock)),
        );
        self.paused = false;
        debug!(
            "Discarded epoch {} (started {}) after {} ticks",
            old.epoch,
            old.started.label(),
            old.stats.ticks
        );
        info!("Session restarted: epoch {epoch}");
        sink.emit(&AppEvent::Restarted { epoch });
    }

    fn record(&mut self, kind: LogKind, message: &str, clock: &impl ClockPort) -> LogEntry {
        self.session.pipeline.record(kind, message, &now(clock))
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn status(&self) -> StatusView {
        let esm = &self.session.esm;
        StatusView {
            epoch: self.session.epoch,
            state: esm.state(),
            intensity: esm.intensity(),
            wind: esm.wind(),
            spray_intensity: esm.spray_intensity(),
            paused: self.paused,
        }
    }

    /// Last sample of the current session, `None` before its first tick.
    pub fn latest_sample(&self) -> Option<SimulationSample> {
        self.session.latest
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        let pipeline = &self.session.pipeline;
        DashboardSnapshot {
            status: self.status(),
            latest: self.session.latest,
            history: pipeline.history().cloned().collect(),
            trajectory: pipeline.trajectory().to_vec(),
            log: pipeline.log().iter().cloned().collect(),
            nodes: pipeline.nodes().iter().cloned().collect(),
            hazardous: pipeline.is_hazardous(),
            stats: self.session.stats,
        }
    }

    pub fn epoch(&self) -> u64 {
        self.session.epoch
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn stats(&self) -> SessionStats {
        self.session.stats
    }

    pub fn pipeline(&self) -> &TelemetryPipeline {
        &self.session.pipeline
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }
}

fn now(clock: &impl ClockPort) -> Timestamp {
    Timestamp::new(clock.now_ms(), clock.wall_clock())
}
