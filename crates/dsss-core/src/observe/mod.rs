//! # Observability
//!
//! Structured logging for the simulator via `tracing`. Library code only
//! emits events; installing a subscriber is left to the binary.

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
