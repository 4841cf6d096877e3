//! # spar-metrics
//!
//! Counters and histograms collected while analyzing many ledgers.
//!
//! Features:
//! - Histogram of per-ledger conflict-free fractions
//! - Named counters shared between analysis workers
//! - JSON export

#![warn(missing_docs)]
#![warn(clippy::all)]

mod collector;
mod export;
mod histogram;

pub use collector::Metrics;
pub use export::{HistogramSummary, MetricsSnapshot};
pub use histogram::Histogram;

/// Counter: ledgers analyzed
pub const LEDGERS_ANALYZED: &str = "ledgers_analyzed";
/// Counter: ledgers without transactions
pub const LEDGERS_EMPTY: &str = "ledgers_empty";
/// Counter: conflict-free transactions
pub const TRANSACTIONS_FREE: &str = "transactions_free";
/// Counter: conflicted transactions
pub const TRANSACTIONS_CONFLICTED: &str = "transactions_conflicted";
/// Histogram: per-ledger conflict-free fraction
pub const FREE_FRACTION: &str = "free_fraction";
