//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (dashboard
//! controls, a scripted scenario, the host runner) that the
//! [`AppService`](super::service::AppService) interprets and acts upon.

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Register a virtual sensor node at a random site position.
    DeploySensor { id: String, location: String },

    /// Discard the whole session and start a fresh one with a new epoch.
    Restart,

    /// Stop doing work on frames until resumed.
    Pause,

    /// Continue after a pause without a catch-up burst.
    Resume,
}
