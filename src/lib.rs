//! DustVision simulation core.
//!
//! A construction-site dust "digital twin": an environmental state machine
//! that drives sprinkler output from simulated particulate readings, and a
//! telemetry pipeline that forecasts, alerts and maintains the bounded
//! windows a dashboard renders.  Hosts drive it frame by frame through
//! [`app::service::AppService`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod diagnostics;
pub mod environment;
pub mod error;
pub mod fsm;
pub mod scheduler;
pub mod sensors;
pub mod telemetry;

pub use error::{Error, Result};
