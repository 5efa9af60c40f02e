// 3rd party crates
use futures::{stream::FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use tracing::{debug, error, info};

// Project imports
use crate::probes::traits::Prober;
use crate::probes::types::ProbeOutcome;

// Current module imports
use super::types::{Group, GroupSummary};

/// Checks every target of `group` and returns its availability counters.
///
/// Maintenance targets are counted without being probed. All other targets
/// are probed concurrently, each probe holding a permit of `limiter` while it
/// runs, and the summary is only built once every dispatched probe reported.
pub async fn check_group(prober: &dyn Prober, group: &Group, limiter: &Semaphore) -> GroupSummary {
    info!(
        group = %group.name,
        servers = group.targets.len(),
        "Processing DNS group"
    );

    let mut summary: GroupSummary = GroupSummary::new(&group.name, group.targets.len());

    // Create a FuturesUnordered to hold one probe per target.
    let mut probes = FuturesUnordered::new();
    for target in &group.targets {
        if target.maintenance {
            summary.maintenance += 1;
            debug!(
                group = %group.name,
                target = %target.id,
                address = %target.address,
                "Server is under maintenance"
            );
            continue;
        }

        probes.push(async move {
            // The semaphore is never closed, a failed acquire only means no limit.
            let _permit = limiter.acquire().await.ok();
            prober.probe(target).await
        });
    }

    let dispatched: usize = probes.len();
    let mut received: usize = 0;

    // Tally outcomes as they complete, in any order.
    while let Some(outcome) = probes.next().await {
        received += 1;
        record_outcome(&mut summary, &outcome);
    }

    if received != dispatched {
        error!(
            group = %group.name,
            dispatched,
            received,
            "Probe results missing for DNS group"
        );
    }

    info!(
        group = %summary.group,
        all_servers = summary.total,
        available_servers = summary.available,
        unavailable_servers = summary.unavailable,
        maintenance_servers = summary.maintenance,
        "Finished processing DNS group"
    );

    summary
}

fn record_outcome(summary: &mut GroupSummary, outcome: &ProbeOutcome) {
    if outcome.available {
        summary.available += 1;
        debug!(
            group = %summary.group,
            target = %outcome.target_id,
            response_time_ms = outcome.response_time.as_millis() as u64,
            "Server is available"
        );
    } else {
        summary.unavailable += 1;
        debug!(
            group = %summary.group,
            target = %outcome.target_id,
            "Server is unavailable"
        );
    }
}
