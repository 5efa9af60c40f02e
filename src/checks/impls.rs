// Standard library
use std::sync::Arc;

// 3rd party crates
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot, Semaphore};
use tracing::{debug, error, info};

// Project imports
use crate::probes::traits::Prober;
use crate::settings::types::Settings;

// Current module imports
use super::functions::check_group;
use super::types::{Group, GroupSummary, ScrapeOrchestrator, ScrapeSnapshot};

impl GroupSummary {
    /// Creates an empty summary for a group of `total` targets.
    pub fn new(group: &str, total: usize) -> Self {
        Self {
            group: group.to_string(),
            total: total as u32,
            available: 0,
            unavailable: 0,
            maintenance: 0,
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.available + self.unavailable + self.maintenance == self.total
    }
}

impl ScrapeSnapshot {
    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }
}

impl ScrapeOrchestrator {
    pub fn new(groups: Vec<Group>, prober: Arc<dyn Prober>, max_in_flight: usize) -> Self {
        Self {
            groups: groups.into_iter().map(Arc::new).collect(),
            prober,
            max_in_flight: max_in_flight.max(1),
        }
    }

    pub fn from_settings(settings: &Settings, prober: Arc<dyn Prober>) -> Self {
        Self::new(
            settings.groups.clone(),
            prober,
            settings.probe.max_in_flight,
        )
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Checks all groups concurrently and returns their summaries in
    /// configuration order.
    ///
    /// Every group check runs in its own task and sends exactly one summary
    /// over a channel; this function is the only reader and returns once all
    /// groups have reported.
    pub async fn run_scrape(&self) -> ScrapeSnapshot {
        let expected: usize = self.groups.len();
        info!(
            groups = expected,
            prober = self.prober.get_name(),
            "Starting to check availability for all DNS groups"
        );

        // Shared by every probe of this scrape only.
        let limiter: Arc<Semaphore> = Arc::new(Semaphore::new(self.max_in_flight));
        let (tx, mut rx) = mpsc::channel::<(usize, GroupSummary)>(expected.max(1));

        for (index, group) in self.groups.iter().enumerate() {
            let tx = tx.clone();
            let group: Arc<Group> = Arc::clone(group);
            let prober: Arc<dyn Prober> = Arc::clone(&self.prober);
            let limiter: Arc<Semaphore> = Arc::clone(&limiter);

            tokio::spawn(async move {
                let summary: GroupSummary = check_group(prober.as_ref(), &group, &limiter).await;
                if tx.send((index, summary)).await.is_err() {
                    debug!(group = %group.name, "Scrape receiver dropped before group reported");
                }
            });
        }
        // Only the spawned tasks hold senders now.
        drop(tx);

        let mut collected: Vec<(usize, GroupSummary)> = Vec::with_capacity(expected);
        while collected.len() < expected {
            match rx.recv().await {
                Some(result) => collected.push(result),
                None => break,
            }
        }

        if collected.len() != expected {
            error!(
                expected,
                received = collected.len(),
                "Some DNS group checks did not report"
            );
        }

        collected.sort_by_key(|(index, _)| *index);

        info!(
            groups = collected.len(),
            "Finished checking availability for all DNS groups"
        );

        ScrapeSnapshot {
            summaries: collected.into_iter().map(|(_, summary)| summary).collect(),
        }
    }

    /// Starts a scrape on `runtime` and returns the channel its snapshot will
    /// be delivered on.
    pub fn dispatch(&self, runtime: &Handle) -> oneshot::Receiver<ScrapeSnapshot> {
        let (tx, rx) = oneshot::channel();
        let orchestrator: ScrapeOrchestrator = self.clone();
        runtime.spawn(async move {
            let snapshot: ScrapeSnapshot = orchestrator.run_scrape().await;
            if tx.send(snapshot).is_err() {
                debug!("Scrape requester went away before the snapshot was ready");
            }
        });
        rx
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::checks::testing::{group, target, ScriptedProber};

    #[tokio::test]
    async fn test_snapshot_keeps_configuration_order() {
        let prober = Arc::new(ScriptedProber::new(&["b-1"]));
        let groups = vec![
            group("a", vec![target("a-1", false), target("a-2", false)]),
            group("b", vec![target("b-1", false)]),
            group("c", vec![target("c-1", true)]),
        ];
        let orchestrator = ScrapeOrchestrator::new(groups, prober, 8);

        let snapshot = orchestrator.run_scrape().await;

        let names: Vec<&str> = snapshot.summaries.iter().map(|s| s.group.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(snapshot.summaries[1].unavailable, 1);
        assert_eq!(snapshot.summaries[2].maintenance, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_every_probe_is_observed_exactly_once() {
        let prober = Arc::new(ScriptedProber::new(&["g3-t1", "g7-t4"]));
        let mut groups = Vec::new();
        let mut expected_probes = 0;
        for g in 0..12 {
            let targets = (0..(g % 5 + 1))
                .map(|t| {
                    let maintenance = (g + t) % 4 == 0;
                    if !maintenance {
                        expected_probes += 1;
                    }
                    target(&format!("g{}-t{}", g, t), maintenance)
                })
                .collect();
            groups.push(group(&format!("group-{}", g), targets));
        }
        let orchestrator = ScrapeOrchestrator::new(groups, prober.clone(), 3);

        let snapshot = orchestrator.run_scrape().await;

        assert_eq!(snapshot.len(), 12);
        assert_eq!(prober.calls.load(Ordering::SeqCst), expected_probes);
        let observed: u32 = snapshot
            .summaries
            .iter()
            .map(|s| s.available + s.unavailable)
            .sum();
        assert_eq!(observed as usize, expected_probes);
        assert!(snapshot.summaries.iter().all(GroupSummary::is_consistent));
        assert!(prober.peak_in_flight.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_duplicate_group_names_are_not_merged() {
        let prober = Arc::new(ScriptedProber::new(&["second"]));
        let groups = vec![
            group("shared", vec![target("first", false)]),
            group("shared", vec![target("second", false)]),
        ];
        let orchestrator = ScrapeOrchestrator::new(groups, prober, 8);

        let snapshot = orchestrator.run_scrape().await;

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.summaries[0].available, 1);
        assert_eq!(snapshot.summaries[1].available, 0);
    }

    #[tokio::test]
    async fn test_no_groups_yields_empty_snapshot() {
        let orchestrator = ScrapeOrchestrator::new(Vec::new(), Arc::new(ScriptedProber::new(&[])), 8);
        assert!(orchestrator.run_scrape().await.is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_delivers_snapshot() {
        let orchestrator = ScrapeOrchestrator::new(
            vec![group("edge", vec![target("edge-1", false)])],
            Arc::new(ScriptedProber::new(&[])),
            8,
        );

        let snapshot = orchestrator.dispatch(&Handle::current()).await.unwrap();

        assert_eq!(snapshot.summaries[0].available, 1);
    }
}
