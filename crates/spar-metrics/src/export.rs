//! Metrics export and snapshot functionality

use crate::Metrics;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Snapshot of all metrics at a point in time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Counter values
    pub counters: BTreeMap<String, u64>,
    /// Histogram summaries
    pub histograms: BTreeMap<String, HistogramSummary>,
}

/// Summary of a histogram
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramSummary {
    /// Mean value
    pub mean: f64,
    /// Total observation count
    pub count: u64,
    /// Upper bound and count per bucket
    pub buckets: Vec<(f64, u64)>,
    /// Observations above the last bound
    pub overflow: u64,
}

impl MetricsSnapshot {
    /// Create a snapshot from a Metrics instance
    pub fn from_metrics(metrics: &Metrics) -> Self {
        let counters = metrics.all_counters().into_iter().collect();
        let histograms = metrics
            .all_histograms()
            .into_iter()
            .map(|(name, h)| {
                let summary = HistogramSummary {
                    mean: h.mean(),
                    count: h.total_count(),
                    buckets: h.bucket_counts(),
                    overflow: h.overflow_count(),
                };
                (name, summary)
            })
            .collect();

        Self {
            counters,
            histograms,
        }
    }

    /// Export snapshot as JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FREE_FRACTION, LEDGERS_ANALYZED};

    #[test]
    fn test_snapshot_json() {
        let metrics = Metrics::new();
        metrics.counter(LEDGERS_ANALYZED, 100);
        metrics.histogram(FREE_FRACTION, 0.5);

        let snapshot = MetricsSnapshot::from_metrics(&metrics);
        let json = snapshot.to_json().unwrap();

        assert!(json.contains("ledgers_analyzed"));
        assert!(json.contains("100"));
        assert!(json.contains("free_fraction"));
        assert_eq!(snapshot.histograms[FREE_FRACTION].count, 1);
        assert_eq!(snapshot.histograms[FREE_FRACTION].buckets[4], (0.5, 1));
    }
}
