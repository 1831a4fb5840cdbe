//! Observability for Fruit-Pack clients.
//!
//! This crate provides:
//! - `LoggingConfig` / `init` - installs the `tracing` subscriber
//! - `RequestTimer` - latency logging for outbound requests

mod logging;
mod timer;

pub use logging::*;
pub use timer::*;
