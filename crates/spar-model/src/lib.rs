//! # spar-model
//!
//! Conflict model estimating how many transactions of a ledger would have
//! collided had they been scheduled in parallel.
//!
//! Transactions are replayed in their committed order against a
//! [`ConflictModel`] that accumulates every resource touched so far in the
//! batch. Each transaction is first checked against that state, then its
//! full footprint is committed regardless of the check result.
//!
//! Features:
//! - Resource footprint tracking (balances, markets, identities, data entries)
//! - Per-operation access patterns
//! - Check-then-commit replay with short-circuiting checks
//! - Mergeable conflict statistics

#![warn(missing_docs)]
#![warn(clippy::all)]

mod access;
mod conflict;
mod error;
mod replay;
mod resource;
mod tracker;

pub use access::ResolvedOperation;
pub use conflict::{Conflict, ConflictKey, ConflictReason, ConflictStats};
pub use error::{ModelError, ModelResult};
pub use replay::{analyze_batch, replay_transaction, BatchReport, ConflictAnalyzer, TxOutcome};
pub use resource::{BalanceKey, DataKey, Direction, MarketKey};
pub use tracker::ConflictModel;
