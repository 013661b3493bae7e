//! Unified error type for the DustVision core.
//!
//! The simulation itself has no recoverable failure modes: clamps and
//! bounded windows are invariants checked with debug assertions.  The
//! recoverable errors live at the edges (configuration and inbound
//! commands) and all funnel into [`Error`].

use core::fmt;

use crate::app::ports::ConfigError;
use crate::telemetry::nodes::NodeError;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug)]
pub enum Error {
    /// Configuration could not be loaded, saved or validated.
    Config(ConfigError),
    /// A deploy-sensor request was rejected.
    Node(NodeError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Node(e) => write!(f, "node: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Node(e) => Some(e),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<NodeError> for Error {
    fn from(e: NodeError) -> Self {
        Self::Node(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
