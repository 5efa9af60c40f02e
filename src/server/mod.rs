//! HTTP surface of the exporter.
//!
//! Serves the Prometheus registry on a single path, over plain HTTP or over
//! TLS with mandatory client certificates, behind the common-name gate.

pub mod auth;
pub mod constants;
pub mod errors;
pub mod functions;
pub mod tls;
pub mod types;

pub use errors::ServerError;
pub use functions::{build_router, serve_plain, serve_tls};
pub use types::{AccessPolicy, PeerIdentity};
