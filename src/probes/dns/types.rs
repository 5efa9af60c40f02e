// Standard library
use std::time::Duration;

/// Fixed deadlines applied to each stage of a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeTimeouts {
    pub connect: Duration,
    pub write: Duration,
    pub read: Duration,
}

/// Probes DNS servers with a single UDP query per call.
#[derive(Debug, Clone)]
pub struct DnsProber {
    pub timeouts: ProbeTimeouts,
}
