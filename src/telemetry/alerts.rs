//! Alert edge detection and the bounded event log.
//!
//! The alert monitor is edge-triggered with a latch: crossing above the
//! threshold raises an ALERT (at most one per cooldown window) and sets
//! the hazardous latch; dropping back to or below the threshold while
//! latched records a single SUCCESS and clears it.  Ticks that neither
//! cross nor change the latch produce nothing.

use heapless::Deque;
use serde::Serialize;

use super::push_evicting;

/// Maximum entries kept in the event log.
pub const LOG_CAPACITY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogKind {
    Success,
    Alert,
    Action,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    /// Monotonic within a session.
    pub id: u64,
    pub time: String,
    pub kind: LogKind,
    pub message: String,
}

// ───────────────────────────────────────────────────────────────
// Event log
// ───────────────────────────────────────────────────────────────

/// Append-only log, oldest entry evicted on overflow.
pub struct EventLog {
    entries: Deque<LogEntry, LOG_CAPACITY>,
    next_id: u64,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            entries: Deque::new(),
            next_id: 1,
        }
    }

    /// Append an entry and return a copy of it.
    pub fn append(&mut self, time: String, kind: LogKind, message: String) -> LogEntry {
        let entry = LogEntry {
            id: self.next_id,
            time,
            kind,
            message,
        };
        self.next_id += 1;
        push_evicting(&mut self.entries, entry.clone());
        entry
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// Alert monitor
// ───────────────────────────────────────────────────────────────

/// What the monitor decided for one forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertEdge {
    /// Forecast above threshold and the cooldown has elapsed.
    Raised,
    /// Forecast back at or below threshold after a latched alert.
    Stabilized,
}

pub struct AlertMonitor {
    threshold: f32,
    cooldown_ms: u64,
    last_alert_ms: Option<u64>,
    hazardous: bool,
}

impl AlertMonitor {
    pub fn new(threshold: f32, cooldown_ms: u64) -> Self {
        Self {
            threshold,
            cooldown_ms,
            last_alert_ms: None,
            hazardous: false,
        }
    }

    /// Evaluate one forecast taken at `now_ms`.
    pub fn evaluate(&mut self, forecast: f32, now_ms: u64) -> Option<AlertEdge> {
        if forecast > self.threshold {
            let cooled = self
                .last_alert_ms
                .is_none_or(|last| now_ms.saturating_sub(last) > self.cooldown_ms);
            if !cooled {
                return None;
            }
            self.last_alert_ms = Some(now_ms);
            self.hazardous = true;
            return Some(AlertEdge::Raised);
        }

        if self.hazardous {
            self.hazardous = false;
            return Some(AlertEdge::Stabilized);
        }
        None
    }

    /// True between a raised alert and the matching stabilization.
    pub fn is_hazardous(&self) -> bool {
        self.hazardous
    }
}
