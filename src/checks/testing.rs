//! Test doubles shared by the engine and metrics tests.

// Standard library
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

// 3rd party crates
use async_trait::async_trait;

// Project imports
use crate::probes::traits::Prober;
use crate::probes::types::ProbeOutcome;

// Current module imports
use super::types::{Group, Target};

/// Prober answering from a script instead of the network.
///
/// Targets listed as unreachable are reported unavailable, everything else
/// available. Each call sleeps for a few milliseconds that vary with the
/// call order so completions interleave differently from dispatch.
#[derive(Default)]
pub struct ScriptedProber {
    unreachable: HashSet<String>,
    pub calls: AtomicUsize,
    pub peak_in_flight: AtomicUsize,
    in_flight: AtomicUsize,
    probed: Mutex<Vec<String>>,
}

impl ScriptedProber {
    pub fn new(unreachable: &[&str]) -> Self {
        Self {
            unreachable: unreachable.iter().map(|id| id.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn probed_ids(&self) -> Vec<String> {
        let mut ids = self.probed.lock().unwrap().clone();
        ids.sort();
        ids
    }
}

#[async_trait]
impl Prober for ScriptedProber {
    async fn probe(&self, target: &Target) -> ProbeOutcome {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.probed.lock().unwrap().push(target.id.clone());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(((call * 7) % 5) as u64 + 1)).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.unreachable.contains(&target.id) {
            ProbeOutcome::unavailable(&target.id, Duration::from_millis(1))
        } else {
            ProbeOutcome {
                target_id: target.id.clone(),
                available: true,
                response_time: Duration::from_millis(1),
                response: None,
            }
        }
    }

    fn get_name(&self) -> &str {
        "scripted"
    }
}

pub fn target(id: &str, maintenance: bool) -> Target {
    Target {
        id: id.to_string(),
        address: "192.0.2.1".to_string(),
        port: 53,
        record: "example.com".to_string(),
        maintenance,
        description: String::new(),
    }
}

pub fn group(name: &str, targets: Vec<Target>) -> Group {
    Group {
        name: name.to_string(),
        targets,
    }
}
