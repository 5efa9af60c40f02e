//! Installs the global `tracing` subscriber from the `[log]` settings.

pub mod constants;
pub mod errors;
pub mod functions;

pub use errors::LoggingError;
pub use functions::{build_filter, init_logging};
