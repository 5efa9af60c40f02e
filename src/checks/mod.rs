//! Check-and-aggregate engine.
//!
//! A scrape fans out one task per group, each group fans out one probe per
//! non-maintenance target, and the per-group counters are merged into a
//! [`types::ScrapeSnapshot`].

pub mod functions;
pub mod impls;
pub mod types;

pub use functions::check_group;
pub use types::{Group, GroupSummary, ScrapeOrchestrator, ScrapeSnapshot, Target};

#[cfg(test)]
pub(crate) mod testing;
