//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade.  A chart or 3D-view adapter would implement the same
//! trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::telemetry::alerts::LogKind;

/// Adapter that logs every [`AppEvent`].
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | epoch={} | state={} | PM10={:.1}\u{00b5}g/m\u{00b3} | \
                     PM2.5 pred={:.1} | wind={} {:.0}\u{00b0}",
                    t.epoch, t.state, t.pm10, t.predicted_pm25, t.wind.name, t.wind.angle_deg,
                );
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {} -> {}", from, to);
            }
            AppEvent::Log(entry) => match entry.kind {
                LogKind::Alert => {
                    warn!("LOG   | #{} {} ALERT {}", entry.id, entry.time, entry.message);
                }
                kind => info!("LOG   | #{} {} {:?} {}", entry.id, entry.time, kind, entry.message),
            },
            AppEvent::Started { epoch, state } => {
                info!("START | epoch={} initial_state={}", epoch, state);
            }
            AppEvent::Restarted { epoch } => {
                info!("RESET | epoch={}", epoch);
            }
            AppEvent::Paused => info!("PAUSE"),
            AppEvent::Resumed => info!("RESUME"),
        }
    }
}
