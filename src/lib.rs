//! Prometheus exporter reporting the liveness of groups of DNS servers.
//!
//! Each scrape of the metrics endpoint sends one `A` query to every
//! non-maintenance server of every configured group and exports four gauges
//! per group: `all_servers`, `available_servers`, `unavailable_servers` and
//! `maintenance_servers`.

pub mod checks;
pub mod functions;
pub mod metrics;
pub mod probes;
pub mod server;
pub mod settings;
pub mod utility;
