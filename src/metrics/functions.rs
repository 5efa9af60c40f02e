// Standard library
use std::collections::HashSet;

// 3rd party crates
use prometheus::proto::{Gauge, LabelPair, Metric, MetricFamily, MetricType};
use prometheus::{Encoder, Registry, TextEncoder};
use tracing::debug;

// Project imports
use crate::checks::types::{GroupSummary, ScrapeSnapshot};

// Current module imports
use super::constants::{GROUP_LABEL, SERIES};

/// Keeps the first summary seen for every group name, in snapshot order.
pub fn dedup_first_seen(snapshot: ScrapeSnapshot) -> Vec<GroupSummary> {
    let mut seen: HashSet<String> = HashSet::new();
    snapshot
        .summaries
        .into_iter()
        .filter(|summary| {
            let first = seen.insert(summary.group.clone());
            if !first {
                debug!(group = %summary.group, "Skipping duplicate group");
            }
            first
        })
        .collect()
}

/// Value of series `index` of [`SERIES`] for `summary`.
fn series_value(index: usize, summary: &GroupSummary) -> u32 {
    match index {
        0 => summary.total,
        1 => summary.available,
        2 => summary.unavailable,
        _ => summary.maintenance,
    }
}

/// Builds one gauge family per exported series with one sample per group.
pub fn build_metric_families(summaries: &[GroupSummary]) -> Vec<MetricFamily> {
    SERIES
        .iter()
        .enumerate()
        .map(|(index, (name, help))| {
            let mut family = MetricFamily::default();
            family.set_name(name.to_string());
            family.set_help(help.to_string());
            family.set_field_type(MetricType::GAUGE);

            for summary in summaries {
                let mut label = LabelPair::default();
                label.set_name(GROUP_LABEL.to_string());
                label.set_value(summary.group.clone());

                let mut gauge = Gauge::default();
                gauge.set_value(f64::from(series_value(index, summary)));

                let mut metric = Metric::default();
                metric.mut_label().push(label);
                metric.set_gauge(gauge);
                family.mut_metric().push(metric);
            }

            family
        })
        .collect()
}

/// Gathers `registry` and encodes it in the Prometheus text format.
pub fn render(registry: &Registry) -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(group: &str, total: u32, available: u32) -> GroupSummary {
        GroupSummary {
            group: group.to_string(),
            total,
            available,
            unavailable: total - available,
            maintenance: 0,
        }
    }

    #[test]
    fn test_first_summary_wins_for_duplicate_names() {
        let snapshot = ScrapeSnapshot {
            summaries: vec![
                summary("shared", 1, 1),
                summary("edge", 3, 2),
                summary("shared", 1, 0),
            ],
        };

        let kept = dedup_first_seen(snapshot);

        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0], summary("shared", 1, 1));
        assert_eq!(kept[1], summary("edge", 3, 2));
    }

    #[test]
    fn test_families_follow_series_order() {
        let families = build_metric_families(&[summary("edge", 3, 2)]);

        let names: Vec<&str> = families.iter().map(|f| f.get_name()).collect();
        assert_eq!(
            names,
            vec![
                "all_servers",
                "available_servers",
                "unavailable_servers",
                "maintenance_servers"
            ]
        );

        let values: Vec<f64> = families
            .iter()
            .map(|f| f.get_metric()[0].get_gauge().get_value())
            .collect();
        assert_eq!(values, vec![3.0, 2.0, 1.0, 0.0]);

        for family in &families {
            assert_eq!(family.get_field_type(), MetricType::GAUGE);
            let label = &family.get_metric()[0].get_label()[0];
            assert_eq!(label.get_name(), "group");
            assert_eq!(label.get_value(), "edge");
        }
    }

    #[test]
    fn test_one_sample_per_group() {
        let families = build_metric_families(&[summary("a", 1, 1), summary("b", 2, 0)]);
        assert!(families.iter().all(|f| f.get_metric().len() == 2));
    }
}
