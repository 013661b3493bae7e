//! Application core: pure domain logic, zero I/O.
//!
//! Orchestrates the environment machine and the telemetry pipeline behind
//! frame throttling and session management.  All interaction with the
//! host happens through **port traits** defined in [`ports`], keeping this
//! layer fully testable without a real clock or entropy source.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
pub mod session;
pub mod snapshot;
