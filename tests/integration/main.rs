//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters.  Everything runs on a manual clock with
//! deterministic noise, so no test sleeps.

mod app_service_tests;
mod pipeline_tests;
