// Standard library
use std::sync::Arc;

// 3rd party crates
use serde::Deserialize;

// Project imports
use crate::probes::traits::Prober;
use crate::settings::constants::default_dns_port;

/// A DNS server under watch.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct Target {
    #[serde(alias = "serverID", alias = "serverid")]
    pub id: String,
    /// IP address or hostname of the server
    #[serde(alias = "IP", alias = "ip")]
    pub address: String,
    #[serde(default = "default_dns_port", alias = "dnsPort", alias = "dnsport")]
    pub port: u16,
    /// Name queried for an `A` record
    #[serde(alias = "requestedRecord", alias = "requestedrecord")]
    pub record: String,
    /// Maintenance targets are counted but never probed
    #[serde(default)]
    pub maintenance: bool,
    #[serde(default)]
    pub description: String,
}

/// A named, ordered set of targets monitored together.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct Group {
    #[serde(alias = "groupName", alias = "groupname")]
    pub name: String,
    #[serde(default, alias = "dnsServers", alias = "dnsservers")]
    pub targets: Vec<Target>,
}

/// Availability counters of one group for one scrape.
///
/// `available + unavailable + maintenance == total` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSummary {
    pub group: String,
    pub total: u32,
    pub available: u32,
    pub unavailable: u32,
    pub maintenance: u32,
}

/// Per-group summaries of one scrape, in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeSnapshot {
    pub summaries: Vec<GroupSummary>,
}

/// Runs one scrape across every configured group.
#[derive(Clone)]
pub struct ScrapeOrchestrator {
    pub(super) groups: Arc<[Arc<Group>]>,
    pub(super) prober: Arc<dyn Prober>,
    pub(super) max_in_flight: usize,
}
