//! Histogram over fractions in `[0, 1]`

use std::sync::atomic::{AtomicU64, Ordering};

// Sums are kept as integers in millionths.
const SCALE: f64 = 1_000_000.0;

/// Histogram for tracking value distributions
pub struct Histogram {
    /// Inclusive upper bound of each bucket, ascending
    bounds: Vec<f64>,
    /// Counts per bucket
    counts: Vec<AtomicU64>,
    /// Observations above the last bound
    overflow: AtomicU64,
    /// Sum of all values, scaled
    sum: AtomicU64,
    /// Total count
    count: AtomicU64,
}

impl Histogram {
    /// Create histogram with ten equal-width buckets over `[0, 1]`
    pub fn new() -> Self {
        Self::with_bounds(Self::default_bounds())
    }

    /// Deciles `0.1, 0.2, .., 1.0`
    pub fn default_bounds() -> Vec<f64> {
        (1..=10).map(|i| i as f64 / 10.0).collect()
    }

    /// Create histogram with custom bucket bounds
    ///
    /// Bounds are sorted; duplicates are dropped.
    pub fn with_bounds(mut bounds: Vec<f64>) -> Self {
        bounds.retain(|b| b.is_finite());
        bounds.sort_by(|a, b| a.total_cmp(b));
        bounds.dedup();
        let counts = bounds.iter().map(|_| AtomicU64::new(0)).collect();
        Histogram {
            bounds,
            counts,
            overflow: AtomicU64::new(0),
            sum: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Record a value
    pub fn observe(&self, value: f64) {
        if value.is_nan() {
            tracing::warn!("ignoring NaN histogram observation");
            return;
        }
        self.sum
            .fetch_add((value.max(0.0) * SCALE).round() as u64, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        match self.bounds.iter().position(|bound| value <= *bound) {
            Some(i) => self.counts[i].fetch_add(1, Ordering::Relaxed),
            None => self.overflow.fetch_add(1, Ordering::Relaxed),
        };
    }

    /// Get mean value
    pub fn mean(&self) -> f64 {
        let count = self.count.load(Ordering::Relaxed);
        if count == 0 {
            return 0.0;
        }
        self.sum.load(Ordering::Relaxed) as f64 / SCALE / count as f64
    }

    /// Get total count
    pub fn total_count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Upper bound and count of each bucket
    pub fn bucket_counts(&self) -> Vec<(f64, u64)> {
        self.bounds
            .iter()
            .zip(&self.counts)
            .map(|(bound, count)| (*bound, count.load(Ordering::Relaxed)))
            .collect()
    }

    /// Observations above the last bound
    pub fn overflow_count(&self) -> u64 {
        self.overflow.load(Ordering::Relaxed)
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}
