//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements   | Connects to                    |
//! |---------------|--------------|--------------------------------|
//! | `config_file` | ConfigPort   | JSON file on disk              |
//! | `log_sink`    | EventSink    | `log` facade (env_logger)      |
//! | `noise`       | NoiseSource  | ChaCha8 PRNG                   |
//! | `time`        | ClockPort    | `std::time::Instant` + `chrono`|

pub mod config_file;
pub mod log_sink;
pub mod noise;
pub mod time;
