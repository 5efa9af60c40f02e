// 3rd party crates
use prometheus::core::Desc;
use tokio::runtime::Handle;

// Project imports
use crate::checks::types::ScrapeOrchestrator;

/// Prometheus collector running a full scrape on every collection.
///
/// Nothing is cached between collections: each call to `collect` probes
/// every non-maintenance target again.
pub struct DnsGroupCollector {
    /// One descriptor per exported series, in emission order
    pub(super) descs: Vec<Desc>,
    pub(super) orchestrator: ScrapeOrchestrator,
    /// Runtime the scrape tasks are spawned on
    pub(super) runtime: Handle,
}
