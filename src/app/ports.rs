//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (clock, noise, event sinks, config storage) implement
//! these traits.  The [`AppService`](super::service::AppService) consumes
//! them via generics, so the simulation core never reads the system clock
//! or an entropy source directly and every run can be replayed in tests.

use chrono::{DateTime, Utc};

use crate::config::SimConfig;

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: time → domain)
// ───────────────────────────────────────────────────────────────

/// Time source for frame throttling and time labels.
pub trait ClockPort {
    /// Monotonic milliseconds since an arbitrary origin.
    fn now_ms(&self) -> u64;

    /// Wall-clock time, used only for human-readable labels.
    fn wall_clock(&self) -> DateTime<Utc>;
}

// ───────────────────────────────────────────────────────────────
// Noise port (driven adapter: entropy → domain)
// ───────────────────────────────────────────────────────────────

/// The single source of randomness for a simulation.
///
/// Every stochastic term (sensor noise, PM10 ratio, forecast noise,
/// trajectory drift, node jitter, node placement) is drawn from here.
pub trait NoiseSource {
    /// Uniform sample from the half-open range `[low, high)`.
    /// Returns `low` when the range is empty.
    fn uniform(&mut self, low: f32, high: f32) -> f32;
}

impl<N: NoiseSource + ?Sized> NoiseSource for &mut N {
    fn uniform(&mut self, low: f32, high: f32) -> f32 {
        (**self).uniform(low, high)
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → display / logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Calls are made in order from the single simulation
/// thread and never overlap.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists simulation configuration.
///
/// Implementations MUST validate config values before persisting and
/// reject invalid ranges with [`ConfigError::ValidationFailed`].
pub trait ConfigPort {
    /// Load configuration.  Returns [`SimConfig::default()`] if no stored
    /// config exists.
    fn load(&self) -> Result<SimConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SimConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// No config found at the requested location.
    NotFound,
    /// Stored config could not be deserialized.
    Corrupted(String),
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError(std::io::ErrorKind),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted(msg) => write!(f, "config corrupted: {}", msg),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError(kind) => write!(f, "I/O error: {}", kind),
        }
    }
}

impl std::error::Error for ConfigError {}
