// Standard library
use std::collections::HashMap;

// 3rd party crates
use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::Registry;
use tokio::runtime::Handle;
use tracing::{debug, error};

// Project imports
use crate::checks::types::{GroupSummary, ScrapeOrchestrator, ScrapeSnapshot};

// Current module imports
use super::constants::{GROUP_LABEL, SERIES};
use super::functions::{build_metric_families, dedup_first_seen};
use super::types::DnsGroupCollector;

impl DnsGroupCollector {
    /// Creates a collector that spawns its scrapes on `runtime`.
    pub fn new(
        orchestrator: ScrapeOrchestrator,
        runtime: Handle,
    ) -> Result<Self, prometheus::Error> {
        let descs = SERIES
            .iter()
            .map(|(name, help)| {
                Desc::new(
                    name.to_string(),
                    help.to_string(),
                    vec![GROUP_LABEL.to_string()],
                    HashMap::new(),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            descs,
            orchestrator,
            runtime,
        })
    }

    /// Registers the collector in a fresh registry.
    pub fn into_registry(self) -> Result<Registry, prometheus::Error> {
        let registry = Registry::new();
        registry.register(Box::new(self))?;
        Ok(registry)
    }

    /// Runs one scrape and returns the deduplicated summaries.
    ///
    /// Blocks the calling thread, so it must not be called from within an
    /// async context.
    pub fn scrape_blocking(&self) -> Vec<GroupSummary> {
        debug!("Checking DNS server availability");
        let snapshot: ScrapeSnapshot = match self.orchestrator.dispatch(&self.runtime).blocking_recv() {
            Ok(snapshot) => snapshot,
            Err(_) => {
                error!("Scrape task ended without delivering a snapshot");
                ScrapeSnapshot::default()
            }
        };
        dedup_first_seen(snapshot)
    }
}

impl Collector for DnsGroupCollector {
    fn desc(&self) -> Vec<&Desc> {
        debug!("Describing DNS metrics");
        self.descs.iter().collect()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        debug!("Starting collection of DNS metrics");
        let summaries: Vec<GroupSummary> = self.scrape_blocking();
        debug!(groups = summaries.len(), "Sending metrics for groups");
        build_metric_families(&summaries)
    }
}
